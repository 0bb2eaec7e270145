pub mod grouping;
pub mod matcher;
pub mod similarity;
pub mod users;

pub use grouping::{group_by_attribute, GroupIndex, GroupingError};
pub use matcher::PreferenceMatcher;
pub use similarity::{cosine_similarity, SimilarityModel, VectorAlignment};
pub use users::{FileUserStore, InMemoryUserStore, UserStore};

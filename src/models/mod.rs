pub mod cheese;
pub mod preferences;
pub mod recommendation;
pub mod user;

pub use cheese::{CheeseRecord, SENTINEL};
pub use preferences::{PreferenceQuery, NO_PREFERENCE};
pub use recommendation::{RecommendationResponse, RecommendationResult};
pub use user::{Credentials, UserRecord};

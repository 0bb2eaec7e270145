use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a query vector and a document vector are lined up before comparing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorAlignment {
    /// Each side lists its own terms by descending tf-idf and entries are
    /// compared by rank position, whatever the terms are. The query is
    /// vectorized as a separate one-document model. Term case is preserved.
    #[default]
    Positional,
    /// Both sides are projected onto the corpus vocabulary, so only shared
    /// terms contribute. Terms are case-folded and unknown query terms dropped.
    SharedVocabulary,
}

/// One entry of a document's term listing
#[derive(Debug, Clone, PartialEq)]
pub struct TermWeight {
    pub term: String,
    /// Raw count of the term in the document
    pub tf: f64,
    pub tfidf: f64,
}

/// A document's terms ordered by descending tf-idf (ties keep first appearance)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<TermWeight>,
}

impl TermVector {
    pub fn entries(&self) -> &[TermWeight] {
        &self.entries
    }

    /// Term frequencies in listing order
    pub fn frequencies(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.tf).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Term-frequency model over a corpus of feature texts
///
/// Built once per catalog; documents are addressed by their index in the
/// corpus, which matches the catalog's record order.
#[derive(Debug, Clone)]
pub struct SimilarityModel {
    alignment: VectorAlignment,
    documents: Vec<TermVector>,
    vocabulary: HashMap<String, usize>,
    /// Per-document vectors in the form `alignment` compares them
    vectors: Vec<Vec<f64>>,
}

impl SimilarityModel {
    /// Builds the model; every input text becomes one document
    pub fn build<'a, I>(texts: I, alignment: VectorAlignment) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = texts
            .into_iter()
            .map(|text| tokenize(text, alignment))
            .collect();

        let documents = term_listings(&tokenized);

        let mut vocabulary = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                let next = vocabulary.len();
                vocabulary.entry(token.clone()).or_insert(next);
            }
        }

        let vectors = match alignment {
            VectorAlignment::Positional => documents.iter().map(TermVector::frequencies).collect(),
            VectorAlignment::SharedVocabulary => tokenized
                .iter()
                .map(|tokens| project(tokens, &vocabulary))
                .collect(),
        };

        Self {
            alignment,
            documents,
            vocabulary,
            vectors,
        }
    }

    pub fn alignment(&self) -> VectorAlignment {
        self.alignment
    }

    /// Number of documents in the corpus
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of distinct terms across the corpus
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Term listing of a corpus document
    pub fn document(&self, index: usize) -> Option<&TermVector> {
        self.documents.get(index)
    }

    /// Vectorizes a free-text query so it can be compared with [`Self::score`]
    pub fn query_vector(&self, query: &str) -> Vec<f64> {
        let tokens = tokenize(query, self.alignment);
        match self.alignment {
            VectorAlignment::Positional => term_listings(std::slice::from_ref(&tokens))
                .pop()
                .map(|listing| listing.frequencies())
                .unwrap_or_default(),
            VectorAlignment::SharedVocabulary => project(&tokens, &self.vocabulary),
        }
    }

    /// Cosine similarity between a query vector and a corpus document;
    /// 0 for an index outside the corpus
    pub fn score(&self, query_vector: &[f64], index: usize) -> f64 {
        self.vectors
            .get(index)
            .map(|vector| cosine_similarity(query_vector, vector))
            .unwrap_or(0.0)
    }
}

/// Dot product divided by the product of the Euclidean norms
///
/// Vectors of different lengths are compared over their common prefix, the
/// remaining entries only count toward the norms. Returns 0 when either norm
/// is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn tokenize(text: &str, alignment: VectorAlignment) -> Vec<String> {
    text.split_whitespace()
        .map(|token| match alignment {
            VectorAlignment::Positional => token.to_string(),
            VectorAlignment::SharedVocabulary => token.to_lowercase(),
        })
        .collect()
}

/// Builds every document's term listing with corpus-level idf
fn term_listings(tokenized: &[Vec<String>]) -> Vec<TermVector> {
    let total_docs = tokenized.len() as f64;

    let counts: Vec<Vec<(String, f64)>> = tokenized.iter().map(|tokens| count_terms(tokens)).collect();

    let mut doc_freq: HashMap<&str, f64> = HashMap::new();
    for terms in &counts {
        for (term, _) in terms {
            *doc_freq.entry(term.as_str()).or_insert(0.0) += 1.0;
        }
    }

    counts
        .iter()
        .map(|terms| {
            let mut entries: Vec<TermWeight> = terms
                .iter()
                .map(|(term, tf)| {
                    let df = doc_freq.get(term.as_str()).copied().unwrap_or(0.0);
                    let idf = 1.0 + (total_docs / (1.0 + df)).ln();
                    TermWeight {
                        term: term.clone(),
                        tf: *tf,
                        tfidf: tf * idf,
                    }
                })
                .collect();
            // Stable sort keeps first-appearance order among equal weights
            entries.sort_by(|a, b| b.tfidf.total_cmp(&a.tfidf));
            TermVector { entries }
        })
        .collect()
}

/// Term counts in order of first appearance
fn count_terms(tokens: &[String]) -> Vec<(String, f64)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, f64)> = Vec::new();

    for token in tokens {
        match positions.get(token.as_str()) {
            Some(&idx) => counts[idx].1 += 1.0,
            None => {
                positions.insert(token, counts.len());
                counts.push((token.clone(), 1.0));
            }
        }
    }

    counts
}

fn project(tokens: &[String], vocabulary: &HashMap<String, usize>) -> Vec<f64> {
    let mut vector = vec![0.0; vocabulary.len()];
    for token in tokens {
        if let Some(&idx) = vocabulary.get(token) {
            vector[idx] += 1.0;
        }
    }
    vector
}

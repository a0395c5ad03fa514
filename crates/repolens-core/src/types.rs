use serde::{Deserialize, Serialize};

/// Number of consecutive lines grouped into one chunk for duplication
/// estimation.
pub const CHUNK_SIZE: usize = 4;

/// A fixed-size group of consecutive partition lines. The trailing chunk of
/// a partition is padded with `None`, which no real line can equal.
pub type Chunk<'a> = [Option<&'a str>; CHUNK_SIZE];

/// Result of a heuristic line extractor. The extractors are best-effort
/// pattern matchers: when a line cannot be parsed with confidence they
/// report `Ambiguous` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Names(Vec<String>),
    Ambiguous,
}

impl Extraction {
    /// Extracted names, or an empty list for an ambiguous line.
    pub fn into_names(self) -> Vec<String> {
        match self {
            Extraction::Names(names) => names,
            Extraction::Ambiguous => Vec::new(),
        }
    }

    /// Number of extracted names (0 for an ambiguous line).
    pub fn count(&self) -> usize {
        match self {
            Extraction::Names(names) => names.len(),
            Extraction::Ambiguous => 0,
        }
    }
}

/// Per-repository metric record, built once after all partitions are merged
/// and immutable thereafter. A record exists iff the repository's normalized
/// line stream was non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryMetrics {
    pub repository: String,
    #[serde(rename = "repository_url")]
    pub url: String,
    #[serde(rename = "number_of_lines")]
    pub line_count: usize,
    /// Distinct imported package names, sorted for stable output.
    pub libraries: Vec<String>,
    pub nesting_factor: f64,
    #[serde(rename = "code_duplication")]
    pub duplication: f64,
    #[serde(rename = "average_parameters")]
    pub avg_parameters: f64,
    #[serde(rename = "average_variables")]
    pub avg_variables: f64,
}

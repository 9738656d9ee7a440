use serde::{Deserialize, Serialize};

/// Qualitative feedback produced by the insight gateway. Held in memory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub score: f64,
    pub summary: String,
    pub tips: Vec<String>,
}

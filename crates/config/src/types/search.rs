//! Search option types.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MINIMUM_SIMILARITY;

/// Options for the tiered item search.
///
/// Every field has a default so partial JSON objects deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Candidates scoring below this are dropped from similarity ranking.
    pub minimum_similarity: f64,
    /// Compare without folding case.
    pub case_sensitive: bool,
    /// Add `0.1 * len(query)` to candidates that contain the query verbatim.
    pub boost_exact_inclusion: bool,
    /// Score long candidates by their best whitespace-separated token.
    pub member_similarity: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            minimum_similarity: DEFAULT_MINIMUM_SIMILARITY,
            case_sensitive: false,
            boost_exact_inclusion: false,
            member_similarity: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: SearchOptions = serde_json::from_str(r#"{"case_sensitive":true}"#).unwrap();
        assert!(options.case_sensitive);
        assert_eq!(options.minimum_similarity, 0.5);
        assert!(options.member_similarity);
        assert!(!options.boost_exact_inclusion);
    }
}

//! Resolution strategies

use std::fmt;

/// How answers from several sources combine into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    /// First source holding the key wins; later sources are not consulted
    #[default]
    Priority,
    /// Every matching source contributes one element to a sequence
    ArrayMerge,
    /// Hash answers are merged; keys from earlier sources win
    HashMerge,
}

impl ResolutionStrategy {
    /// Parse a strategy name as passed by resolver hosts
    ///
    /// Accepts `priority`, `array`/`array_merge` and `hash`/`hash_merge`,
    /// case-insensitively and with an optional leading colon. Anything else
    /// is treated as a priority lookup.
    pub fn from_str(s: &str) -> Self {
        match s.trim().trim_start_matches(':').to_lowercase().as_str() {
            "array" | "array_merge" => ResolutionStrategy::ArrayMerge,
            "hash" | "hash_merge" => ResolutionStrategy::HashMerge,
            _ => ResolutionStrategy::Priority,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::Priority => "priority",
            ResolutionStrategy::ArrayMerge => "array",
            ResolutionStrategy::HashMerge => "hash",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(ResolutionStrategy::from_str("array"), ResolutionStrategy::ArrayMerge);
        assert_eq!(ResolutionStrategy::from_str(":hash"), ResolutionStrategy::HashMerge);
        assert_eq!(ResolutionStrategy::from_str("HASH_MERGE"), ResolutionStrategy::HashMerge);
        assert_eq!(ResolutionStrategy::from_str("priority"), ResolutionStrategy::Priority);
        assert_eq!(ResolutionStrategy::from_str("whatever"), ResolutionStrategy::Priority);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResolutionStrategy::ArrayMerge.to_string(), "array");
        assert_eq!(ResolutionStrategy::default().to_string(), "priority");
    }
}

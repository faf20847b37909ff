//! Gender vocabulary used by the feature encoder.

use serde::{Deserialize, Serialize};

/// Canonical gender vocabulary. Input is matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Vocabulary in code order. The first entry doubles as the fallback.
    pub const VOCABULARY: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Parse free-text input. Returns `None` for anything outside the vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = raw.trim().to_ascii_lowercase();
        Self::VOCABULARY
            .into_iter()
            .find(|g| g.as_str() == canonical)
    }

    /// Canonical lowercase spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Numeric feature code.
    pub fn code(self) -> f64 {
        match self {
            Self::Male => 0.0,
            Self::Female => 1.0,
        }
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::VOCABULARY[0]
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("MALE"), Some(Gender::Male));
        assert_eq!(Gender::parse(" Female "), Some(Gender::Female));
    }

    #[test]
    fn test_unknown_values_do_not_parse() {
        assert_eq!(Gender::parse(""), None);
        assert_eq!(Gender::parse("other"), None);
        assert_eq!(Gender::parse("m"), None);
    }

    #[test]
    fn test_default_is_first_vocabulary_entry() {
        assert_eq!(Gender::default(), Gender::Male);
        assert_ne!(Gender::Male.code(), Gender::Female.code());
    }
}

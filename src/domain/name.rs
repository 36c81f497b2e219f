use serde::Serialize;

/// A validated signup name. Construction is the only way to get one, so any
/// `FullName` held by the rest of the pipeline is already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Parse a raw name: trim, collapse internal whitespace runs to a single
    /// space, then enforce length 2..=100 and the allowed character set
    /// (letters, spaces, hyphens, apostrophes, periods).
    pub fn parse(raw: &str) -> Result<FullName, String> {
        let normalized = raw.trim().split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.chars().count() < 2 {
            return Err("Name must be at least 2 characters".to_string());
        }
        if normalized.chars().count() > 100 {
            return Err("Name must be at most 100 characters".to_string());
        }

        let allowed = |c: char| c.is_ascii_alphabetic() || matches!(c, ' ' | '-' | '\'' | '.');
        if !normalized.chars().all(allowed) {
            return Err(
                "Name can only contain letters, spaces, hyphens, apostrophes, and periods"
                    .to_string(),
            );
        }

        Ok(FullName(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_character_minimum() {
        assert_eq!(FullName::parse("Jo").unwrap().as_str(), "Jo");
    }

    #[test]
    fn rejects_single_character() {
        let err = FullName::parse("J").unwrap_err();
        assert!(err.contains("at least 2 characters"));
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(
            FullName::parse("  Mary   Jane  Watson ").unwrap().as_str(),
            "Mary Jane Watson"
        );
    }

    #[test]
    fn whitespace_only_input_is_too_short() {
        assert!(FullName::parse("   ").is_err());
    }

    #[test]
    fn accepts_hyphen_apostrophe_period() {
        assert!(FullName::parse("Jean-Luc O'Brien Jr.").is_ok());
    }

    #[test]
    fn rejects_digits_and_symbols() {
        assert!(FullName::parse("R2D2").is_err());
        assert!(FullName::parse("Jo<script>").is_err());
        assert!(FullName::parse("Jo@home").is_err());
    }

    #[test]
    fn rejects_over_100_characters() {
        let long = "a".repeat(101);
        let err = FullName::parse(&long).unwrap_err();
        assert!(err.contains("at most 100"));
        assert!(FullName::parse(&"a".repeat(100)).is_ok());
    }
}

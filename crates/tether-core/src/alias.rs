use crate::error::ValidationError;
use crate::keyspace::KeySpace;
use crate::shortcode::ShortCode;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 20;

/// Words that collide with service routes and can never be used as aliases.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "admin",
    "api",
    "health",
    "analytics",
    "dashboard",
    "login",
    "logout",
    "register",
    "settings",
    "help",
    "about",
    "contact",
    "privacy",
    "terms",
    "docs",
];

/// Validates user-chosen aliases.
///
/// Rules run in a fixed order and the first failure wins:
///
/// 1. length is 3-20 characters
/// 2. only ASCII letters, digits and `-`
/// 3. no leading or trailing `-`
/// 4. not a reserved keyword (case-insensitive)
/// 5. not already bound in the key space
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasValidator;

impl AliasValidator {
    /// Runs every rule and returns the alias as a [`ShortCode`] on success.
    ///
    /// Callers that go on to insert the alias must hold the same lock that
    /// guards `keyspace` until the insert completes.
    pub fn validate<K: KeySpace + ?Sized>(
        alias: &str,
        keyspace: &K,
    ) -> Result<ShortCode, ValidationError> {
        Self::validate_format(alias)?;

        if keyspace.contains(alias) {
            return Err(ValidationError::AliasTaken(alias.to_string()));
        }

        Ok(ShortCode::alias(alias))
    }

    /// Rules 1-4, which do not depend on store state.
    pub fn validate_format(alias: &str) -> Result<(), ValidationError> {
        let len = alias.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
            return Err(ValidationError::InvalidLength {
                len,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }

        if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::InvalidCharacters(alias.to_string()));
        }

        if alias.starts_with('-') || alias.ends_with('-') {
            return Err(ValidationError::InvalidFormat(alias.to_string()));
        }

        if Self::is_reserved(alias) {
            return Err(ValidationError::ReservedKeyword(alias.to_string()));
        }

        Ok(())
    }

    pub fn is_reserved(alias: &str) -> bool {
        RESERVED_KEYWORDS
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn empty() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn accepts_valid_aliases() {
        let code = AliasValidator::validate("my-page", &empty()).unwrap();
        assert_eq!(code, ShortCode::Alias("my-page".to_string()));

        assert!(AliasValidator::validate("abc", &empty()).is_ok());
        assert!(AliasValidator::validate(&"a".repeat(20), &empty()).is_ok());
        assert!(AliasValidator::validate("Promo-2024-Q1", &empty()).is_ok());
    }

    #[test]
    fn rejects_bad_lengths() {
        let long = "a".repeat(21);
        for alias in ["", "ab", long.as_str()] {
            let err = AliasValidator::validate(alias, &empty()).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidLength { .. }),
                "{alias:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_characters() {
        for alias in ["abc def", "abc/def", "abc_def", "héllo", "a.b.c"] {
            let err = AliasValidator::validate(alias, &empty()).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidCharacters(_)),
                "{alias:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_edge_hyphens() {
        for alias in ["-abc", "abc-", "-ab-"] {
            let err = AliasValidator::validate(alias, &empty()).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat(_)),
                "{alias:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_reserved_keywords_in_any_case() {
        for keyword in RESERVED_KEYWORDS {
            let err = AliasValidator::validate(keyword, &empty()).unwrap_err();
            assert!(matches!(err, ValidationError::ReservedKeyword(_)));

            let upper = keyword.to_uppercase();
            let err = AliasValidator::validate(&upper, &empty()).unwrap_err();
            assert!(matches!(err, ValidationError::ReservedKeyword(_)));
        }
        assert!(AliasValidator::is_reserved("Api"));
        assert!(!AliasValidator::is_reserved("apis"));
    }

    #[test]
    fn rejects_taken_alias() {
        let mut taken = HashSet::new();
        taken.insert("my-page".to_string());

        let err = AliasValidator::validate("my-page", &taken).unwrap_err();
        assert_eq!(err, ValidationError::AliasTaken("my-page".to_string()));
    }

    #[test]
    fn first_failing_rule_wins() {
        // too short and contains an invalid character
        let err = AliasValidator::validate("a_", &empty()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLength { .. }));

        // bad characters checked before hyphen placement
        let err = AliasValidator::validate("-a_b", &empty()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCharacters(_)));

        // reserved is reported even when the key is also taken
        let mut taken = HashSet::new();
        taken.insert("admin".to_string());
        let err = AliasValidator::validate("admin", &taken).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedKeyword(_)));
    }
}

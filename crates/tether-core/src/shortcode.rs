use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Alphabet used for generated short codes.
pub const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every generated short code.
pub const GENERATED_LENGTH: usize = 7;

/// A key in the short-code namespace.
///
/// Generated codes and custom aliases share one namespace; the variant only
/// records where the key came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortCode {
    /// A system-generated short code.
    Generated(String),
    /// A user-chosen alias that passed [`AliasValidator`](crate::AliasValidator).
    Alias(String),
}

impl ShortCode {
    /// Wraps a code produced by a trusted generator.
    ///
    /// No validation is performed. Use this only for codes produced by
    /// internal generators.
    pub fn generated(code: impl Into<String>) -> Self {
        Self::Generated(code.into())
    }

    /// Alias codes are only built by the validator.
    pub(crate) fn alias(code: impl Into<String>) -> Self {
        Self::Alias(code.into())
    }

    /// Returns `true` when `code` has the shape of a generated code:
    /// exactly [`GENERATED_LENGTH`] characters from [`CHARSET`].
    pub fn is_generated_shape(code: &str) -> bool {
        code.len() == GENERATED_LENGTH && code.bytes().all(|b| CHARSET.contains(&b))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            ShortCode::Generated(s) | ShortCode::Alias(s) => s.as_str(),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, ShortCode::Alias(_))
    }

    pub fn into_string(self) -> String {
        match self {
            ShortCode::Generated(s) | ShortCode::Alias(s) => s,
        }
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_shape() {
        assert!(ShortCode::is_generated_shape("aB3dE9z"));
        assert!(!ShortCode::is_generated_shape("aB3dE9"));
        assert!(!ShortCode::is_generated_shape("aB3dE9zz"));
        assert!(!ShortCode::is_generated_shape("aB3-E9z"));
    }

    #[test]
    fn display_matches_as_str() {
        let code = ShortCode::generated("abc1234");
        assert_eq!(code.to_string(), "abc1234");
        assert!(!code.is_alias());

        let alias = ShortCode::alias("my-page");
        assert_eq!(alias.to_string(), "my-page");
        assert!(alias.is_alias());
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let code = ShortCode::generated("abc1234");
        assert_eq!(
            code.to_url("http://localhost:8080"),
            "http://localhost:8080/abc1234"
        );
        assert_eq!(
            code.to_url("http://localhost:8080/"),
            "http://localhost:8080/abc1234"
        );
    }
}

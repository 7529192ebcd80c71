use crate::error::ValidationError;
use crate::shortcode::ShortCode;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// How long an alias stays resolvable after it is created.
pub const ALIAS_TTL: SignedDuration = SignedDuration::from_hours(24 * 30);

/// A binding from a short code (generated or alias) to an original URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    /// Set only for mappings created through the alias path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    pub created_at: Timestamp,
    /// Always `created_at + ALIAS_TTL` for aliases, `None` for generated codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    /// Per-day deduplicated click counter.
    pub click_count: u64,
    pub is_active: bool,
}

impl Mapping {
    /// Builds a fresh, active mapping for `code`.
    ///
    /// Alias codes get an expiration of `created_at + ALIAS_TTL`; generated
    /// codes never expire.
    pub fn new(
        id: impl Into<String>,
        original_url: impl Into<String>,
        code: ShortCode,
        created_at: Timestamp,
    ) -> Self {
        let (custom_alias, expires_at) = if code.is_alias() {
            (Some(code.as_str().to_string()), Some(created_at + ALIAS_TTL))
        } else {
            (None, None)
        };

        Self {
            id: id.into(),
            original_url: original_url.into(),
            short_code: code.into_string(),
            custom_alias,
            created_at,
            expires_at,
            click_count: 0,
            is_active: true,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.custom_alias.is_some()
    }

    /// Whether the mapping's expiration has been reached at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Reconstructs the typed key for this mapping.
    pub fn code(&self) -> ShortCode {
        match self.custom_alias {
            Some(_) => ShortCode::Alias(self.short_code.clone()),
            None => ShortCode::Generated(self.short_code.clone()),
        }
    }
}

/// Checks that `url` is an absolute http(s) URL with something after the
/// scheme.
pub fn validate_original_url(url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            ValidationError::InvalidUrl(format!("URL must start with http:// or https://: {url}"))
        })?;

    if rest.trim().is_empty() {
        return Err(ValidationError::InvalidUrl(format!(
            "URL must have a host: {url}"
        )));
    }

    Ok(())
}

/// One resolution of a short code. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub timestamp: Timestamp,
    pub ip: String,
    pub user_agent: String,
    pub short_code: String,
}

/// Aggregated click view for one short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub short_code: String,
    pub original_url: String,
    /// The mapping's deduplicated `click_count`.
    pub total_clicks: u64,
    /// Distinct client IPs over the whole history of the code.
    pub unique_clicks: u64,
    /// Up to the ten most recent clicks, oldest first.
    pub recent_clicks: Vec<ClickEvent>,
    pub created_at: Timestamp,
}

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tether_core::Mapping;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<Timestamp>,
}

impl ShortenResponse {
    pub fn new(mapping: Mapping, base_url: &str) -> Self {
        Self {
            short_url: mapping.code().to_url(base_url),
            short_code: mapping.short_code,
            original_url: mapping.original_url,
            expires_at: mapping.expires_at,
        }
    }
}

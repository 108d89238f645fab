use std::num::NonZeroU32;

use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

use crate::models::granularity::Granularity;

pub const DEFAULT_BASE_URL: &str = "http://api.semetric.com";
pub const TOKEN_ENV_VAR: &str = "SEMETRIC_API_TOKEN";

/// Connection settings for the Semetric timeseries API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemetricSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Artist identifier in any supported ID space (e.g. `lastfm:rihanna`).
    pub artist_id: String,

    #[serde(default)]
    pub granularity: Granularity,

    /// Upper bound on requests started per second.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: NonZeroU32,
}

impl SemetricSettings {
    pub fn new(artist_id: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            artist_id: artist_id.into(),
            granularity: Granularity::default(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_requests_per_second() -> NonZeroU32 {
    nonzero!(5u32)
}

/// Query parameters sent with every series request.
pub fn construct_params(token: &str, granularity: Granularity) -> Vec<(&'static str, String)> {
    vec![
        ("token", token.to_string()),
        ("granularity", granularity.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_carry_token_and_granularity() {
        let params = construct_params("abc", Granularity::Week);
        assert_eq!(
            params,
            vec![("token", "abc".to_string()), ("granularity", "week".to_string())]
        );
    }

    #[test]
    fn settings_defaults() {
        let settings: SemetricSettings = toml::from_str(r#"artist_id = "lastfm:rihanna""#).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.granularity, Granularity::Day);
        assert_eq!(settings.requests_per_second.get(), 5);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let parsed = toml::from_str::<SemetricSettings>(
            r#"
artist_id = "x"
requests_per_second = 0
"#,
        );
        assert!(parsed.is_err());
    }
}

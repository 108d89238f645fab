use serde::Deserialize;

/// Error details the API attaches to failed responses.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// The parts of a failed response body worth reporting.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

impl ErrorBody {
    /// Best-effort human readable message for a failed response body.
    pub fn message_from(body: &[u8]) -> String {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        match parsed.error {
            Some(ApiErrorDetail {
                code: Some(code),
                msg: Some(msg),
            }) => format!("{msg} (code {code})"),
            Some(ApiErrorDetail { msg: Some(msg), .. }) => msg,
            _ if body.is_empty() => "Unknown API error".to_string(),
            _ => String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_structured_error() {
        let body = br#"{"success": false, "error": {"code": 401, "msg": "invalid token"}}"#;
        assert_eq!(ErrorBody::message_from(body), "invalid token (code 401)");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(ErrorBody::message_from(b"Bad Gateway"), "Bad Gateway");
        assert_eq!(ErrorBody::message_from(b""), "Unknown API error");
    }
}

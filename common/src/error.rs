use thiserror::Error;

/// Number of characters of an upstream body kept for diagnostics.
pub const EXCERPT_LEN: usize = 200;

/// Everything that can go wrong between asking for messages and holding a
/// usable `{data: [...]}` payload. Shared by the proxy (which reports it to
/// operators as JSON) and the client poller (which only logs it).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never completed, or completed with a non-success status.
    #[error("Upstream request failed{}: {details}", status_suffix(.status))]
    Network {
        status: Option<u16>,
        status_text: String,
        details: String,
    },

    /// The body was not valid JSON.
    #[error("Invalid JSON response. Content-Type: {content_type}, Response: {excerpt}")]
    Parse {
        content_type: String,
        excerpt: String,
    },

    /// The body was a sign-in page: the script is not deployed for anonymous access.
    #[error(
        "Google Apps Script requires authentication. Set \"Who has access\" to \"Anyone\" \
         in Deploy > Manage deployments, redeploy, and copy the new Web app URL if it changed"
    )]
    AuthMisconfiguration,

    /// Valid JSON, but not the expected structure.
    #[error("Invalid data format: {0}")]
    Shape(String),
}

impl FetchError {
    /// Transport-level failure with no HTTP status.
    pub fn transport(details: impl Into<String>) -> Self {
        FetchError::Network {
            status: None,
            status_text: String::new(),
            details: details.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// First `EXCERPT_LEN` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        let thai = "สวัสดี".repeat(100);
        let cut = excerpt(&thai);
        assert_eq!(cut.chars().count(), EXCERPT_LEN);
        assert!(thai.starts_with(&cut));
    }

    #[test]
    fn network_error_message_mentions_status() {
        let err = FetchError::Network {
            status: Some(404),
            status_text: "Not Found".into(),
            details: "missing".into(),
        };
        assert_eq!(err.to_string(), "Upstream request failed with status 404: missing");
        assert_eq!(
            FetchError::transport("dns").to_string(),
            "Upstream request failed: dns"
        );
    }
}

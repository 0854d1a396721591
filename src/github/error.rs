//! Error types for profile lookups.

use thiserror::Error;

/// The only message a user ever sees for a failed lookup.
pub const USER_NOT_FOUND: &str = "User Not Found";

/// Why a profile lookup failed.
///
/// The variants are kept apart for logging. Callers that face the user
/// collapse them with [`LookupError::user_message`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no GitHub user named '{handle}'")]
    NotFound { handle: String },

    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    /// User-facing text, identical for every cause.
    pub fn user_message(&self) -> &'static str {
        USER_NOT_FOUND
    }

    /// Short machine-readable tag for the cause.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Network { .. } => "network",
            LookupError::Status { .. } => "status",
            LookupError::NotFound { .. } => "not_found",
            LookupError::Parse { .. } => "parse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cause_collapses_to_one_message() {
        let parse_failure = serde_json::from_str::<u32>("nope").unwrap_err();
        let errors = vec![
            LookupError::Status {
                url: "https://api.github.com/users/x".to_string(),
                status: 500,
            },
            LookupError::NotFound {
                handle: "x".to_string(),
            },
            LookupError::Parse {
                url: "https://api.github.com/users/x".to_string(),
                source: parse_failure,
            },
        ];

        for error in &errors {
            assert_eq!(error.user_message(), "User Not Found");
        }
    }

    #[test]
    fn test_display_keeps_cause() {
        let error = LookupError::Status {
            url: "https://api.github.com/users/x".to_string(),
            status: 503,
        };
        assert!(error.to_string().contains("503"));
        assert_eq!(error.kind(), "status");

        let error = LookupError::NotFound {
            handle: "ghost".to_string(),
        };
        assert!(error.to_string().contains("ghost"));
        assert_eq!(error.kind(), "not_found");
    }
}

//! Error types surfaced by the list controller and the lookup providers.
//!
//! Config and storage I/O use `anyhow` with context instead; their failures
//! are either fatal at startup or only logged.

use thiserror::Error;

/// Failure of a single lookup against a weather provider.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },

    #[error("failed to parse {provider} response: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    /// Status 404 (and the 400 OpenWeather sends for garbage queries) mean the city is unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::Status { status: 400 | 404, .. })
    }
}

/// User-visible failure of an add or edit. The list is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("'{city}' is already in the list")]
    Duplicate { city: String },

    #[error("lookup for '{query}' failed: {source}")]
    Lookup {
        query: String,
        #[source]
        source: LookupError,
    },

    #[error("no ids left to assign")]
    IdsExhausted,
}

impl ListError {
    /// Short message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ListError::Duplicate { city } => format!("{city} is already in the list."),
            ListError::IdsExhausted => "The list cannot take more cities.".to_string(),
            ListError::Lookup { query, source } if source.is_not_found() => {
                format!("City '{query}' not found.")
            }
            ListError::Lookup { query, source: LookupError::Status { .. } } => {
                format!("Weather service rejected the request for '{query}'.")
            }
            ListError::Lookup { query, .. } => {
                format!("Could not fetch weather for '{query}'. Check your connection.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> LookupError {
        LookupError::Status { provider: "openweather", status, body: String::new() }
    }

    #[test]
    fn not_found_statuses() {
        assert!(status(404).is_not_found());
        assert!(status(400).is_not_found());
        assert!(!status(401).is_not_found());
        assert!(!status(500).is_not_found());
    }

    #[test]
    fn user_message_for_unknown_city() {
        let err = ListError::Lookup { query: "atlantis".into(), source: status(404) };
        assert_eq!(err.user_message(), "City 'atlantis' not found.");
    }

    #[test]
    fn user_message_for_rejected_request() {
        let err = ListError::Lookup { query: "paris".into(), source: status(401) };
        assert!(err.user_message().contains("rejected"));
    }

    #[test]
    fn user_message_for_duplicate() {
        let err = ListError::Duplicate { city: "Paris".into() };
        assert_eq!(err.user_message(), "Paris is already in the list.");
        assert_eq!(err.to_string(), "'Paris' is already in the list");
    }

    #[test]
    fn parse_failure_is_not_not_found() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LookupError::Parse { provider: "weatherapi", source };
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to parse weatherapi response"));
    }
}

//! Boundary errors for MenuSpy
//!
//! Tracking itself never fails. These cover configuration and host
//! acquisition, which happen before any tracking starts.

/// Errors raised while configuring a spy or attaching it to a host
#[derive(Debug, Clone, PartialEq)]
pub enum SpyError {
    /// A config field holds a value the host would reject
    InvalidConfig { field: &'static str, reason: String },
    /// Config payload could not be parsed
    Config(String),
    /// No global `window` (worker or non-browser context)
    NoWindow,
    /// `window.document` is missing
    NoDocument,
    /// A JS call threw
    Js(String),
}

impl SpyError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SpyError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SpyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpyError::InvalidConfig { field, reason } => {
                write!(f, "Invalid option `{}`: {}", field, reason)
            }
            SpyError::Config(msg) => write!(f, "Failed to parse options: {}", msg),
            SpyError::NoWindow => write!(f, "No global window available"),
            SpyError::NoDocument => write!(f, "Window has no document"),
            SpyError::Js(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

impl std::error::Error for SpyError {}

impl From<serde_json::Error> for SpyError {
    fn from(e: serde_json::Error) -> Self {
        SpyError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display_names_field() {
        let err = SpyError::invalid("activeClass", "must not be empty");
        assert_eq!(err.to_string(), "Invalid option `activeClass`: must not be empty");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: SpyError = parse.unwrap_err().into();
        assert!(matches!(err, SpyError::Config(_)));
    }
}

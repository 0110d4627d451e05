//! Configuration types and defaults for MenuSpy
//!
//! Options arrive from JS as a plain object and are merged over defaults,
//! so every field is optional on the wire.

use serde::{Deserialize, Serialize};

use super::error::SpyError;

// =============================================================================
// Defaults
// =============================================================================

/// Entries that link to an in-page fragment
pub const DEFAULT_MENU_ITEM_SELECTOR: &str = "a[href^=\"#\"]";
pub const DEFAULT_ACTIVE_CLASS: &str = "active";
/// Pixels added to the menu height before a target counts as reached
pub const DEFAULT_THRESHOLD: f64 = 15.0;
/// Milliseconds of quiet before the address fragment is rewritten
pub const DEFAULT_HASH_TIMEOUT: f64 = 600.0;
/// Milliseconds of quiet after the last resize before items are rebuilt
pub const DEFAULT_RESIZE_TIMEOUT: f64 = 100.0;

// =============================================================================
// SpyConfig
// =============================================================================

/// MenuSpy options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpyConfig {
    /// Selector for trackable entries inside the container
    pub menu_item_selector: String,
    /// Class toggled on the parent of each active entry
    pub active_class: String,
    /// Slack in pixels added to the container height. Default: 15
    pub threshold: f64,
    /// Debounce for URL fragment updates, in ms. Default: 600
    pub hash_timeout: f64,
    /// Debounce for resize-triggered rebuilds, in ms. Default: 100
    pub resize_timeout: f64,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            menu_item_selector: DEFAULT_MENU_ITEM_SELECTOR.to_string(),
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            threshold: DEFAULT_THRESHOLD,
            hash_timeout: DEFAULT_HASH_TIMEOUT,
            resize_timeout: DEFAULT_RESIZE_TIMEOUT,
        }
    }
}

impl SpyConfig {
    /// Parse options from JSON, filling anything absent with defaults
    pub fn from_json(json: &str) -> Result<Self, SpyError> {
        let config: SpyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash updates on every activation with no delay
    pub fn immediate() -> Self {
        Self {
            hash_timeout: 0.0,
            resize_timeout: 0.0,
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.menu_item_selector = selector.into();
        self
    }

    pub fn with_active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = class.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_hash_timeout(mut self, ms: f64) -> Self {
        self.hash_timeout = ms;
        self
    }

    pub fn with_resize_timeout(mut self, ms: f64) -> Self {
        self.resize_timeout = ms;
        self
    }

    /// Reject values the DOM would throw on or that make the math meaningless
    pub fn validate(&self) -> Result<(), SpyError> {
        if self.menu_item_selector.trim().is_empty() {
            return Err(SpyError::invalid("menuItemSelector", "must not be empty"));
        }
        if self.active_class.is_empty() {
            return Err(SpyError::invalid("activeClass", "must not be empty"));
        }
        // classList.add throws InvalidCharacterError on whitespace
        if self.active_class.chars().any(char::is_whitespace) {
            return Err(SpyError::invalid(
                "activeClass",
                format!("'{}' contains whitespace", self.active_class),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(SpyError::invalid("threshold", "must be a finite number"));
        }
        for (field, value) in [
            ("hashTimeout", self.hash_timeout),
            ("resizeTimeout", self.resize_timeout),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpyError::invalid(
                    field,
                    format!("expected a non-negative delay, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpyConfig::default();
        assert_eq!(config.menu_item_selector, "a[href^=\"#\"]");
        assert_eq!(config.active_class, "active");
        assert_eq!(config.threshold, 15.0);
        assert_eq!(config.hash_timeout, 600.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config = SpyConfig::from_json(r#"{ "activeClass": "is-current", "threshold": 40 }"#).unwrap();
        assert_eq!(config.active_class, "is-current");
        assert_eq!(config.threshold, 40.0);
        // Untouched fields keep defaults
        assert_eq!(config.hash_timeout, DEFAULT_HASH_TIMEOUT);
        assert_eq!(config.menu_item_selector, DEFAULT_MENU_ITEM_SELECTOR);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SpyConfig::from_json("{}").unwrap(), SpyConfig::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = SpyConfig::from_json(r#"{ "somethingElse": true }"#).unwrap();
        assert_eq!(config, SpyConfig::default());
    }

    #[test]
    fn test_whitespace_class_rejected() {
        let err = SpyConfig::default().with_active_class("is active").validate().unwrap_err();
        assert!(matches!(err, SpyError::InvalidConfig { field: "activeClass", .. }));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let err = SpyConfig::default().with_hash_timeout(-1.0).validate().unwrap_err();
        assert!(matches!(err, SpyError::InvalidConfig { field: "hashTimeout", .. }));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        assert!(SpyConfig::default().with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_negative_threshold_allowed() {
        // A negative slack just delays activation
        assert!(SpyConfig::default().with_threshold(-30.0).validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(SpyConfig::from_json("{"), Err(SpyError::Config(_))));
    }
}

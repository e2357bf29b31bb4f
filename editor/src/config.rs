//! Reconciler configuration.
//!
//! Defaults are usable as-is. A TOML document or `EVENTDESK_*` environment
//! variables can override them:
//!
//! ```toml
//! website_scheme = "https://"
//! duplicate_link_fallback = true
//! require_removal_confirmation = true
//! ```
//!
//! # Example
//!
//! ```
//! use eventdesk_editor::config::ReconcilerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReconcilerConfig::from_toml_str("duplicate_link_fallback = false")?;
//! assert!(!config.duplicate_link_fallback);
//! assert_eq!(config.website_scheme, "https://");
//! # Ok(())
//! # }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Variable overriding [`ReconcilerConfig::website_scheme`].
pub const ENV_WEBSITE_SCHEME: &str = "EVENTDESK_WEBSITE_SCHEME";
/// Variable overriding [`ReconcilerConfig::duplicate_link_fallback`].
pub const ENV_DUPLICATE_LINK_FALLBACK: &str = "EVENTDESK_DUPLICATE_LINK_FALLBACK";
/// Variable overriding [`ReconcilerConfig::require_removal_confirmation`].
pub const ENV_REQUIRE_REMOVAL_CONFIRMATION: &str = "EVENTDESK_REQUIRE_REMOVAL_CONFIRMATION";

/// Tunables for a Save or Publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Prefix added to sponsor websites that carry no scheme.
    pub website_scheme: String,
    /// Retry a rejected duplicate link as a tier update.
    pub duplicate_link_fallback: bool,
    /// Ask before deleting an item that exists server-side.
    pub require_removal_confirmation: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            website_scheme: "https://".to_string(),
            duplicate_link_fallback: true,
            require_removal_confirmation: true,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvValue {
            var,
            value: value.to_string(),
        }),
    }
}

impl ReconcilerConfig {
    /// Set the website scheme.
    #[must_use]
    pub fn with_website_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.website_scheme = scheme.into();
        self
    }

    /// Enable or disable the duplicate-link fallback.
    #[must_use]
    pub const fn with_duplicate_link_fallback(mut self, enabled: bool) -> Self {
        self.duplicate_link_fallback = enabled;
        self
    }

    /// Enable or disable removal confirmation.
    #[must_use]
    pub const fn with_require_removal_confirmation(mut self, enabled: bool) -> Self {
        self.require_removal_confirmation = enabled;
        self
    }

    /// Check that values make sense.
    ///
    /// # Errors
    ///
    /// Returns error if the website scheme is blank or does not end in `://`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scheme = self.website_scheme.trim();
        if scheme.is_empty() {
            return Err(ConfigError::Validation(
                "website_scheme cannot be empty".to_string(),
            ));
        }
        if !scheme.ends_with("://") || scheme.len() == 3 {
            return Err(ConfigError::Validation(format!(
                "website_scheme must look like \"https://\", got {scheme:?}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `EVENTDESK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    ///
    /// # Errors
    ///
    /// Returns error if a value is unusable or the result fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(scheme) = lookup(ENV_WEBSITE_SCHEME) {
            config.website_scheme = scheme;
        }
        if let Some(value) = lookup(ENV_DUPLICATE_LINK_FALLBACK) {
            config.duplicate_link_fallback = parse_flag(ENV_DUPLICATE_LINK_FALLBACK, &value)?;
        }
        if let Some(value) = lookup(ENV_REQUIRE_REMOVAL_CONFIRMATION) {
            config.require_removal_confirmation =
                parse_flag(ENV_REQUIRE_REMOVAL_CONFIRMATION, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

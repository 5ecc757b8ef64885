// Session configuration shared by every request built through the client
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("Missing required config field: {0}")]
    MissingField(&'static str),
}

// Target environment, rendered into the `Target` attribute of every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Target {
    #[default]
    Test,
    Production,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Test => "Test",
            Target::Production => "Production",
        }
    }
}

/// Credentials and locale settings for one API session.
///
/// Built once, handed to the client by value and never mutated afterwards.
/// Per-call changes go through [`SessionConfig::merged`], which returns a copy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub site_id: String,
    pub password: String,
    pub language: String,
    pub currency: String,
    pub target: Target,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            password: String::new(),
            language: "en".to_string(),
            currency: "USD".to_string(),
            target: Target::Test,
        }
    }
}

impl SessionConfig {
    pub fn new(site_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    // Load a session config from JSON; missing optional fields fall back to defaults
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Json(e.to_string()))?;

        if config.site_id.trim().is_empty() {
            return Err(ConfigError::MissingField("site_id"));
        }

        Ok(config)
    }

    /// Returns a copy of this config with every field set in `overrides` shadowing
    /// the session value.
    pub fn merged(&self, overrides: &ConfigOverrides) -> SessionConfig {
        SessionConfig {
            site_id: self.site_id.clone(),
            password: self.password.clone(),
            language: overrides
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
            currency: overrides
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            target: overrides.target.unwrap_or(self.target),
        }
    }
}

// Call-level overrides of the session config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub language: Option<String>,
    pub currency: Option<String>,
    pub target: Option<Target>,
}

// Options specific to the hotel search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u32,
    pub available_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            available_only: true,
        }
    }
}

// Content categories requested by a descriptive info call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptiveInfoOptions {
    pub hotel_info: bool,
    pub facility_info: bool,
    pub policies: bool,
    pub contact_info: bool,
    pub multimedia_objects: bool,
    pub customer_ratings: bool,
    pub customer_reviews: bool,
}

impl Default for DescriptiveInfoOptions {
    fn default() -> Self {
        Self {
            hotel_info: true,
            facility_info: true,
            policies: true,
            contact_info: true,
            multimedia_objects: true,
            customer_ratings: true,
            customer_reviews: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("315", "secret");
        assert_eq!(config.language, "en");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.target, Target::Test);
        assert_eq!(config.target.as_str(), "Test");

        let search = SearchOptions::default();
        assert_eq!(search.limit, 100);
        assert!(search.available_only);
    }

    #[test]
    fn test_merge_shadows_without_mutating() {
        let session = SessionConfig::new("315", "secret");
        let overrides = ConfigOverrides {
            currency: Some("EUR".to_string()),
            target: Some(Target::Production),
            ..Default::default()
        };

        let merged = session.merged(&overrides);
        assert_eq!(merged.currency, "EUR");
        assert_eq!(merged.target, Target::Production);
        assert_eq!(merged.language, "en");
        assert_eq!(merged.site_id, "315");

        // the session copy is untouched
        assert_eq!(session.currency, "USD");
        assert_eq!(session.target, Target::Test);
    }

    #[test]
    fn test_from_json() {
        let config =
            SessionConfig::from_json(r#"{"site_id": "315", "password": "test", "target": "Production"}"#)
                .unwrap();
        assert_eq!(config.site_id, "315");
        assert_eq!(config.target, Target::Production);
        assert_eq!(config.currency, "USD");

        let missing = SessionConfig::from_json(r#"{"password": "test"}"#);
        assert!(matches!(missing, Err(ConfigError::MissingField("site_id"))));

        let broken = SessionConfig::from_json("{not json");
        assert!(matches!(broken, Err(ConfigError::Json(_))));
    }
}

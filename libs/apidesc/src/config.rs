//! Configuration for the API explorer.
//!
//! [`ApiExplorerConfig::from_figment`] extracts the `api_explorer` key from an
//! already merged `Figment` (YAML file, env, defaults...).

use figment::Figment;
use serde::Deserialize;

/// Key of the explorer section in a merged figment.
pub const CONFIG_KEY: &str = "api_explorer";

/// Configuration error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid 'api_explorer' configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProblemResponsesConfig {
    /// Register the problem-responses provider.
    pub enabled: bool,
}

impl Default for ProblemResponsesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// OpenAPI document metadata (title, version, description)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl Default for OpenApiInfo {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_owned(),
            version: "0.1.0".to_owned(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiExplorerConfig {
    pub problem_responses: ProblemResponsesConfig,
    pub openapi: OpenApiInfo,
}

impl ApiExplorerConfig {
    /// Extract the `api_explorer` section; a missing section yields defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Extract` if the section exists but is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        if !figment.contains(CONFIG_KEY) {
            return Ok(Self::default());
        }
        figment
            .extract_inner(CONFIG_KEY)
            .map_err(|e| ConfigError::Extract(Box::new(e)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::{Format, Serialized, Yaml};
    use serde_json::json;

    #[test]
    fn defaults_enable_problem_responses() {
        let cfg = ApiExplorerConfig::default();
        assert!(cfg.problem_responses.enabled);
        assert_eq!(cfg.openapi.title, "API Documentation");
        assert_eq!(cfg.openapi.version, "0.1.0");
    }

    #[test]
    fn figment_yaml_section_is_extracted() {
        let yaml = r"
api_explorer:
  problem_responses:
    enabled: false
  openapi:
    title: Orders API
    description: Public order management
";
        let figment = Figment::new().merge(Yaml::string(yaml));
        let cfg = ApiExplorerConfig::from_figment(&figment).unwrap();

        assert!(!cfg.problem_responses.enabled);
        assert_eq!(cfg.openapi.title, "Orders API");
        assert_eq!(cfg.openapi.version, "0.1.0");
        assert_eq!(
            cfg.openapi.description.as_deref(),
            Some("Public order management")
        );
    }

    #[test]
    fn figment_without_section_yields_defaults() {
        let figment =
            Figment::new().merge(Serialized::defaults(json!({ "server": { "port": 8080 } })));
        let cfg = ApiExplorerConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg, ApiExplorerConfig::default());
    }

    #[test]
    fn figment_rejects_unknown_fields() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "api_explorer": { "problem_respones": { "enabled": true } }
        })));
        let err = ApiExplorerConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let figment = Figment::new()
            .merge(Serialized::defaults(json!({
                "api_explorer": { "openapi": { "title": "Base", "version": "1.0.0" } }
            })))
            .merge(Yaml::string("api_explorer:\n  openapi:\n    title: Orders API\n"));
        let cfg = ApiExplorerConfig::from_figment(&figment).unwrap();

        assert_eq!(cfg.openapi.title, "Orders API");
        assert_eq!(cfg.openapi.version, "1.0.0");
        assert!(cfg.problem_responses.enabled);
    }

    #[test]
    fn extract_error_names_section() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "api_explorer": { "problem_responses": { "enabled": "sometimes" } }
        })));
        let err = ApiExplorerConfig::from_figment(&figment).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("invalid 'api_explorer' configuration:")
        );
    }
}

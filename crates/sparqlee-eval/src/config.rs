//! Serializable evaluator settings

use serde::{Deserialize, Serialize};

/// Default capacity of the shared overload resolution cache
pub const DEFAULT_OVERLOAD_CACHE_CAPACITY: usize = 4096;

/// Evaluator configuration, loadable from JSON
///
/// ```
/// use sparqlee_eval::EvaluatorConfig;
///
/// let config = EvaluatorConfig::from_json(r#"{ "default_timezone_minutes": 60 }"#).unwrap();
/// assert_eq!(config.default_timezone_minutes, 60);
/// assert!(config.overload_cache);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Timezone assumed for date/time values without one, in minutes east of UTC
    pub default_timezone_minutes: i16,
    /// Base IRI used by `IRI()` to resolve relative references
    pub base_iri: Option<String>,
    /// Memoize overload resolution per argument type signature
    pub overload_cache: bool,
    pub overload_cache_capacity: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            default_timezone_minutes: 0,
            base_iri: None,
            overload_cache: true,
            overload_cache_capacity: DEFAULT_OVERLOAD_CACHE_CAPACITY,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EvaluatorConfig::from_json("{}").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = EvaluatorConfig::from_json(
            r#"{
                "default_timezone_minutes": -300,
                "base_iri": "http://example.org/base/",
                "overload_cache": false,
                "overload_cache_capacity": 16
            }"#,
        )
        .unwrap();
        assert_eq!(config.default_timezone_minutes, -300);
        assert_eq!(config.base_iri.as_deref(), Some("http://example.org/base/"));
        assert!(!config.overload_cache);
        assert_eq!(config.overload_cache_capacity, 16);
    }

    #[test]
    fn test_rejects_wrong_field_type() {
        assert!(EvaluatorConfig::from_json(r#"{ "overload_cache": "yes" }"#).is_err());
    }
}

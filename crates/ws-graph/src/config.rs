use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ws_core::errors::{ErrorInfo, WsError};
use ws_core::{OddDegreePolicy, StreamMode, WattsStrogatzParams, DEFAULT_MAX_ATTEMPTS_PER_SLOT};

use crate::serialization::OutputFormat;

/// YAML-configurable parameters governing a generation run.
///
/// `nodes`, `degree` and `rewire_probability` may be left out of the file and
/// supplied on the command line instead; [`to_params`](Self::to_params)
/// reports whichever is still missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of nodes `N`.
    #[serde(default)]
    pub nodes: Option<usize>,
    /// Lattice degree `k`.
    #[serde(default)]
    pub degree: Option<usize>,
    /// Rewiring probability `p`.
    #[serde(default)]
    pub rewire_probability: Option<f64>,
    /// Master seed. Callers pick one (e.g. from the clock) when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Odd degree handling.
    #[serde(default)]
    pub odd_degree: OddDegreePolicy,
    /// Candidate draws allowed per rewired slot.
    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_slot: usize,
    /// Random stream layout for rewiring.
    #[serde(default)]
    pub streams: StreamMode,
    /// Output encoding.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS_PER_SLOT
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nodes: None,
            degree: None,
            rewire_probability: None,
            seed: None,
            odd_degree: OddDegreePolicy::default(),
            max_attempts_per_slot: default_max_attempts(),
            streams: StreamMode::default(),
            format: OutputFormat::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, WsError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            WsError::Config(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, WsError> {
        serde_yaml::from_str(raw)
            .map_err(|err| WsError::Config(ErrorInfo::new("parse-config", err.to_string())))
    }

    /// Validated generation parameters.
    pub fn to_params(&self) -> Result<WattsStrogatzParams, WsError> {
        let nodes = self.nodes.ok_or_else(|| missing("nodes"))?;
        let degree = self.degree.ok_or_else(|| missing("degree"))?;
        let probability = self
            .rewire_probability
            .ok_or_else(|| missing("rewire_probability"))?;
        let params = WattsStrogatzParams::new(nodes, degree, probability)
            .with_odd_degree(self.odd_degree)
            .with_max_attempts(self.max_attempts_per_slot);
        params.validate()?;
        Ok(params)
    }
}

fn missing(field: &str) -> WsError {
    WsError::Config(
        ErrorInfo::new(
            "missing-field",
            format!("`{field}` was given neither in the file nor on the command line"),
        )
        .with_context("field", field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_with_defaults() {
        let config = GeneratorConfig::from_yaml_str("nodes: 100\ndegree: 4\nrewire_probability: 0.2\n")
            .unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.streams, StreamMode::Shared);
        assert_eq!(config.format, OutputFormat::Adjlist);
        assert_eq!(config.max_attempts_per_slot, DEFAULT_MAX_ATTEMPTS_PER_SLOT);
        let params = config.to_params().unwrap();
        assert_eq!(params, WattsStrogatzParams::new(100, 4, 0.2));
    }

    #[test]
    fn yaml_with_every_field() {
        let raw = "nodes: 12\ndegree: 3\nrewire_probability: 1.0\nseed: 9\nodd_degree: reject\n\
                   max_attempts_per_slot: 50\nstreams: per-node\nformat: json\n";
        let config = GeneratorConfig::from_yaml_str(raw).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.streams, StreamMode::PerNode);
        assert_eq!(config.format, OutputFormat::Json);
        let err = config.to_params().unwrap_err();
        assert_eq!(err.info().code, "odd-degree");
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = GeneratorConfig::default().to_params().unwrap_err();
        assert!(matches!(err, WsError::Config(_)));
        assert_eq!(err.info().context.get("field"), Some(&"nodes".to_string()));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = GeneratorConfig::from_yaml_str("nodes: [").unwrap_err();
        assert_eq!(err.info().code, "parse-config");
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = GeneratorConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert_eq!(err.info().code, "read-config");
    }
}

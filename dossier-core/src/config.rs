//! Configuration file support for Dossier
//!
//! Loads scoring configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.dossierrc.json` in the working directory
//! 3. `dossier.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::composite::{QuadrantModifiers, Scenario, ScoringWeights};
use crate::ScoringSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names tried during discovery, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".dossierrc.json", "dossier.config.json"];

/// Dossier configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DossierConfig {
    /// Weighting scenario (default: A)
    #[serde(default)]
    pub scenario: Option<Scenario>,

    /// Per-dimension weight overrides on top of the scenario
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Per-quadrant modifier overrides
    #[serde(default)]
    pub quadrant_modifiers: Option<ModifierConfig>,

    /// Minimum final score to report (default: report all)
    #[serde(default)]
    pub min_final_score: Option<f64>,

    /// Maximum number of results to show
    #[serde(default)]
    pub top: Option<usize>,
}

/// Custom dimension weights; unspecified dimensions keep the scenario weight
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    pub d1: Option<f64>,
    pub d2: Option<f64>,
    pub d3: Option<f64>,
    pub d4: Option<f64>,
    pub d5: Option<f64>,
    pub d6: Option<f64>,
}

/// Custom quadrant modifiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierConfig {
    pub quick_win: Option<f64>,
    pub push_harder: Option<f64>,
    pub transformational: Option<f64>,
    pub moonshot: Option<f64>,
}

/// Resolved configuration with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub scenario: Scenario,
    pub weights: ScoringWeights,
    pub quadrant_modifiers: QuadrantModifiers,
    /// Filters
    pub min_final_score: Option<f64>,
    pub top_n: Option<usize>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl DossierConfig {
    fn resolved_weights(&self) -> ScoringWeights {
        let base = self.scenario.unwrap_or_default().weights();
        match &self.weights {
            Some(w) => ScoringWeights {
                d1: w.d1.unwrap_or(base.d1),
                d2: w.d2.unwrap_or(base.d2),
                d3: w.d3.unwrap_or(base.d3),
                d4: w.d4.unwrap_or(base.d4),
                d5: w.d5.unwrap_or(base.d5),
                d6: w.d6.unwrap_or(base.d6),
            },
            None => base,
        }
    }

    fn resolved_modifiers(&self) -> QuadrantModifiers {
        let base = QuadrantModifiers::default();
        match &self.quadrant_modifiers {
            Some(m) => QuadrantModifiers {
                quick_win: m.quick_win.unwrap_or(base.quick_win),
                push_harder: m.push_harder.unwrap_or(base.push_harder),
                transformational: m.transformational.unwrap_or(base.transformational),
                moonshot: m.moonshot.unwrap_or(base.moonshot),
            },
            None => base,
        }
    }

    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        self.resolved_weights()
            .validate()
            .context("weights must be non-negative and sum to 1.0 with the scenario defaults")?;

        let m = self.resolved_modifiers();
        for (name, val) in [
            ("quick_win", m.quick_win),
            ("push_harder", m.push_harder),
            ("transformational", m.transformational),
            ("moonshot", m.moonshot),
        ] {
            if !(val > 0.0 && val <= 2.0) {
                anyhow::bail!("quadrant_modifiers.{} must be in (0, 2] (got {})", name, val);
            }
        }

        validate_filters(self.min_final_score, self.top)
    }

    /// Resolve config into the form used by the engine
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            scenario: self.scenario.unwrap_or_default(),
            weights: self.resolved_weights(),
            quadrant_modifiers: self.resolved_modifiers(),
            min_final_score: self.min_final_score,
            top_n: self.top,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        DossierConfig::default().resolve()
    }

    pub fn settings(&self) -> ScoringSettings {
        ScoringSettings {
            scenario: self.scenario,
            weights: self.weights,
            quadrant_modifiers: self.quadrant_modifiers,
        }
    }
}

/// Check report filters, whether they come from a config file or the command line
pub fn validate_filters(min_final_score: Option<f64>, top: Option<usize>) -> Result<()> {
    if let Some(min) = min_final_score {
        if !(0.0..=100.0).contains(&min) {
            anyhow::bail!("min_final_score must be between 0 and 100 (got {})", min);
        }
    }

    if top == Some(0) {
        anyhow::bail!("top must be at least 1");
    }

    Ok(())
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(DossierConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<DossierConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: DossierConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    load_and_resolve_with_scenario(project_root, config_path, None)
}

/// Like [`load_and_resolve`], with a scenario that overrides the file's
pub fn load_and_resolve_with_scenario(
    project_root: &Path,
    config_path: Option<&Path>,
    scenario: Option<Scenario>,
) -> Result<ResolvedConfig> {
    let (mut config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (DossierConfig::default(), None),
        }
    };

    if scenario.is_some() {
        config.scenario = scenario;
    }

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    if let Some(p) = &resolved.config_path {
        tracing::debug!(path = %p.display(), scenario = %resolved.scenario, "loaded config");
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = DossierConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.scenario, Scenario::A);
        assert_eq!(resolved.weights, Scenario::A.weights());
        assert_eq!(resolved.quadrant_modifiers, QuadrantModifiers::default());
        assert!(resolved.min_final_score.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: DossierConfig = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "scenario": "B",
            "weights": {"d5": 0.05, "d6": 0.15},
            "quadrant_modifiers": {"moonshot": 0.8},
            "min_final_score": 50.0,
            "top": 20
        }"#;
        let config: DossierConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.scenario, Scenario::B);
        assert_eq!(resolved.weights.d1, 0.30);
        assert_eq!(resolved.weights.d5, 0.05);
        assert_eq!(resolved.weights.d6, 0.15);
        assert_eq!(resolved.quadrant_modifiers.moonshot, 0.8);
        assert_eq!(resolved.quadrant_modifiers.quick_win, 0.95);
        assert_eq!(resolved.min_final_score, Some(50.0));
        assert_eq!(resolved.top_n, Some(20));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<DossierConfig, _> = serde_json::from_str(r#"{"unknown_field": true}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unknown_scenario() {
        let result: Result<DossierConfig, _> = serde_json::from_str(r#"{"scenario": "Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_weights_not_summing_to_one() {
        let config: DossierConfig = serde_json::from_str(r#"{"weights": {"d1": 0.5}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_negative_weight() {
        let config: DossierConfig =
            serde_json::from_str(r#"{"weights": {"d5": -0.1, "d6": 0.3}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_bad_modifier() {
        let config: DossierConfig =
            serde_json::from_str(r#"{"quadrant_modifiers": {"quick_win": 0.0}}"#).unwrap();
        assert!(config.validate().is_err());
        let config: DossierConfig =
            serde_json::from_str(r#"{"quadrant_modifiers": {"moonshot": 2.5}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_out_of_range_filters() {
        let config: DossierConfig = serde_json::from_str(r#"{"min_final_score": 120}"#).unwrap();
        assert!(config.validate().is_err());
        let config: DossierConfig = serde_json::from_str(r#"{"top": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_filters() {
        validate_filters(None, None).unwrap();
        validate_filters(Some(0.0), Some(1)).unwrap();
        validate_filters(Some(100.0), None).unwrap();
        assert!(validate_filters(None, Some(0)).is_err());
        assert!(validate_filters(Some(-0.5), None).is_err());
        assert!(validate_filters(Some(f64::NAN), None).is_err());
        assert!(validate_filters(Some(f64::INFINITY), None).is_err());
    }

    #[test]
    fn test_discover_dossierrc() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".dossierrc.json");
        fs::write(&config_path, r#"{"scenario": "C"}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.scenario, Some(Scenario::C));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".dossierrc.json"), r#"{"top": 1}"#).unwrap();
        fs::write(dir.path().join("dossier.config.json"), r#"{"top": 2}"#).unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(1), ".dossierrc.json should take priority");
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dossier.config.json");
        fs::write(&path, r#"{"weights": {"d1": 0.9}}"#).unwrap();
        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid config in"));
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.scenario, Scenario::A);
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"scenario": "B", "top": 5}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.scenario, Scenario::B);
        assert_eq!(resolved.top_n, Some(5));
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_scenario_override_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".dossierrc.json"), r#"{"scenario": "B"}"#).unwrap();

        let resolved =
            load_and_resolve_with_scenario(dir.path(), None, Some(Scenario::C)).unwrap();
        assert_eq!(resolved.scenario, Scenario::C);
        assert_eq!(resolved.weights, Scenario::C.weights());
    }

    #[test]
    fn test_settings_carry_resolved_values() {
        let resolved = ResolvedConfig::defaults().unwrap();
        let settings = resolved.settings();
        assert_eq!(settings.scenario, Scenario::A);
        assert_eq!(settings.weights, resolved.weights);
    }
}

//! Configuration settings for the 8-puzzle SAT planner

use crate::planning::PlannerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Longest plan length accepted by validation
pub const MAX_ALLOWED_PLAN_LENGTH: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scramble: ScrambleConfig,
    pub search: SearchConfig,
    pub encoding: EncodingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrambleConfig {
    /// Random moves applied to the goal when no initial board is given
    pub moves: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_plan_length: usize,
    pub max_plan_length: usize,
    pub trial_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Emit clauses forbidding moves that would push the blank off the board
    pub forbid_illegal_moves: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub initial_state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_replay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            moves: 10,
            seed: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_plan_length: 0,
            max_plan_length: 15,
            trial_timeout_seconds: None,
        }
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            forbid_illegal_moves: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_replay: true,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.search.min_plan_length > self.search.max_plan_length {
            anyhow::bail!(
                "Minimum plan length {} exceeds maximum {}",
                self.search.min_plan_length,
                self.search.max_plan_length
            );
        }

        if self.search.max_plan_length > MAX_ALLOWED_PLAN_LENGTH {
            anyhow::bail!(
                "Maximum plan length {} exceeds the supported limit of {}",
                self.search.max_plan_length,
                MAX_ALLOWED_PLAN_LENGTH
            );
        }

        if self.search.trial_timeout_seconds == Some(0) {
            anyhow::bail!("Trial timeout must be positive");
        }

        if let Some(ref file) = self.input.initial_state_file {
            if !file.exists() {
                anyhow::bail!("Initial state file does not exist: {}", file.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(moves) = cli_overrides.scramble_moves {
            self.scramble.moves = moves;
        }
        if let Some(seed) = cli_overrides.seed {
            self.scramble.seed = Some(seed);
        }
        if let Some(max) = cli_overrides.max_plan_length {
            self.search.max_plan_length = max;
        }
        if let Some(timeout) = cli_overrides.trial_timeout_seconds {
            self.search.trial_timeout_seconds = Some(timeout);
        }
        if let Some(ref file) = cli_overrides.initial_state_file {
            self.input.initial_state_file = Some(file.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }

    /// Planner parameters described by these settings
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            min_plan_length: self.search.min_plan_length,
            max_plan_length: self.search.max_plan_length,
            trial_timeout: self.search.trial_timeout_seconds.map(Duration::from_secs),
            forbid_illegal_moves: self.encoding.forbid_illegal_moves,
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub scramble_moves: Option<usize>,
    pub seed: Option<u64>,
    pub max_plan_length: Option<usize>,
    pub trial_timeout_seconds: Option<u64>,
    pub initial_state_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_reference_run() {
        let settings = Settings::default();
        assert_eq!(settings.scramble.moves, 10);
        assert_eq!(settings.search.max_plan_length, 15);
        assert!(settings.encoding.forbid_illegal_moves);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.scramble.seed = Some(99);
        settings.search.trial_timeout_seconds = Some(30);
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        assert_eq!(Settings::from_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("search:\n  max_plan_length: 8\n").unwrap();
        assert_eq!(settings.search.max_plan_length, 8);
        assert_eq!(settings.scramble.moves, 10);
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.search.min_plan_length = 5;
        settings.search.max_plan_length = 3;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.search.max_plan_length = MAX_ALLOWED_PLAN_LENGTH + 1;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.input.initial_state_file = Some(PathBuf::from("/nonexistent/board.txt"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            scramble_moves: Some(4),
            max_plan_length: Some(6),
            trial_timeout_seconds: Some(2),
            ..CliOverrides::default()
        });

        assert_eq!(settings.scramble.moves, 4);
        let config = settings.planner_config();
        assert_eq!(config.max_plan_length, 6);
        assert_eq!(config.trial_timeout, Some(Duration::from_secs(2)));
    }
}

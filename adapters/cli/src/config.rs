//! Game configuration read from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use orb_arena_rendering::DEFAULT_MAX_MESSAGES;
use orb_arena_system_tick_driver::{ResolutionMode, DEFAULT_MAX_TICKS};
use serde::Deserialize;

/// Every knob of a terminal match. Missing keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) max_ticks: u32,
    pub(crate) tick_delay_ms: u64,
    pub(crate) map_folder: PathBuf,
    pub(crate) map: String,
    pub(crate) red: Vec<String>,
    pub(crate) blue: Vec<String>,
    pub(crate) max_messages: usize,
    pub(crate) resolution: ResolutionMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            tick_delay_ms: 100,
            map_folder: PathBuf::from("assets/maps"),
            map: "the_petting_zoo".to_owned(),
            red: ["Alice", "Bob", "Eve"].map(str::to_owned).to_vec(),
            blue: ["Charlie", "Diana", "Frank"].map(str::to_owned).to_vec(),
            max_messages: DEFAULT_MAX_MESSAGES,
            resolution: ResolutionMode::Sequential,
        }
    }
}

impl GameConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse game config toml contents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::parse("").expect("empty config parses");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.max_ticks, 100);
        assert_eq!(config.max_messages, 6);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = GameConfig::parse(
            r#"
            max_ticks = 12
            map = "duel"
            red = ["Ann"]
            resolution = "snapshot"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.max_ticks, 12);
        assert_eq!(config.map, "duel");
        assert_eq!(config.red, vec!["Ann".to_owned()]);
        assert_eq!(config.blue, GameConfig::default().blue);
        assert_eq!(config.resolution, ResolutionMode::Snapshot);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::parse("max_tick = 3").is_err());
    }
}

//! Engine configuration with TOML persistence
//!
//! The default location is `~/.config/ember/engine.toml`. Every section and
//! field is optional; anything missing takes its default value.

use std::fs;
use std::path::{Path, PathBuf};

use ember_core::TimeConfig;
use ember_ecs::DEFAULT_MAX_ENTITIES;
use ember_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::factories::{OPHANIM_NAME, PLAYER_NAME};

/// Errors raised while loading or saving the engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("I/O error on config '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config '{0}': {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Entity store sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    /// Size of the entity id pool
    pub max_entities: u32,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}

/// Gameplay rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Names of entities that projectiles damage
    pub damageable: Vec<String>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            damageable: vec![PLAYER_NAME.to_string(), OPHANIM_NAME.to_string()],
        }
    }
}

/// All engine settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ecs: EcsConfig,
    pub time: TimeConfig,
    pub physics: PhysicsConfig,
    pub gameplay: GameplayConfig,
}

impl EngineConfig {
    /// `<config dir>/ember/engine.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ember").join("engine.toml"))
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            info!("No engine config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::Io(dir.to_path_buf(), e))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!("Saved engine config to {:?}", path);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::StepMode;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = EngineConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let text = r#"
            [ecs]
            max_entities = 64

            [physics]
            gravity = 9.81
            step_mode = { kind = "frame_clamped" }
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.ecs.max_entities, 64);
        assert_eq!(config.physics.gravity, 9.81);
        assert_eq!(config.physics.step_mode, StepMode::FrameClamped);
        assert_eq!(config.physics.max_substeps, PhysicsConfig::default().max_substeps);
        assert_eq!(config.gameplay, GameplayConfig::default());
    }

    #[test]
    fn constant_step_is_configurable() {
        let text = r#"
            [physics]
            step_mode = { kind = "constant", seconds = 0.5 }
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.physics.step_mode, StepMode::Constant(0.5));
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = std::env::temp_dir().join(format!("ember-config-test-{}", std::process::id()));
        let path = dir.join("nested").join("engine.toml");
        let mut config = EngineConfig::default();
        config.gameplay.damageable = vec!["boss".to_string()];

        config.save_to(&path).unwrap();
        let loaded = EngineConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn errors_name_the_file() {
        let missing = Path::new("/definitely/not/here/engine.toml");
        let err = EngineConfig::load_from(missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
        assert!(err.to_string().contains("engine.toml"));

        let dir = std::env::temp_dir().join(format!("ember-config-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("engine.toml");
        fs::write(&bad, "[physics\ngravity = ").unwrap();
        let err = EngineConfig::load_from(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
        let _ = fs::remove_dir_all(&dir);
    }
}

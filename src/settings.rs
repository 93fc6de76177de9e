//! Driver settings
//!
//! Read from a JSON file by the native binary. Every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::Atlas;
use crate::sim::PowerUpKind;
use crate::tuning::Tuning;

/// Which scripted player drives the headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputScript {
    /// Only confirms splash screens
    Idle,
    /// Sweeps the invader from wall to wall
    #[default]
    Bounce,
    /// Bounces and keeps the power-up held
    Boosted,
}

impl InputScript {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputScript::Idle => "Idle",
            InputScript::Bounce => "Bounce",
            InputScript::Boosted => "Boosted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(InputScript::Idle),
            "bounce" => Some(InputScript::Bounce),
            "boosted" | "boost" => Some(InputScript::Boosted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed
    pub seed: u64,
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Number of ticks to run
    pub ticks: u32,
    pub script: InputScript,
    /// Power-up granted before the first level ("speed_boost" / "pulse_shield")
    pub start_power_up: Option<String>,
    /// Optional tuning override file
    pub tuning_path: Option<String>,
    /// Optional sprite dimension table
    pub atlas_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_ms: 16,
            ticks: 60 * 60,
            script: InputScript::Bounce,
            start_power_up: None,
            tuning_path: None,
            atlas_path: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from `path`, falling back to defaults if absent or unreadable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match std::fs::read_to_string(path).map(|json| Self::from_json(&json)) {
            Ok(Ok(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(Err(err)) => {
                log::warn!("Ignoring malformed settings {}: {err}", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Cannot read settings {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Parsed starting power-up; unknown names are ignored
    pub fn start_power_up_kind(&self) -> Option<PowerUpKind> {
        let name = self.start_power_up.as_deref()?;
        let kind = PowerUpKind::from_str(name);
        if kind.is_none() {
            log::warn!("Unknown power-up '{name}' ignored");
        }
        kind
    }

    pub fn load_tuning(&self) -> Tuning {
        let Some(path) = self.tuning_path.as_deref() else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path).map(|json| Tuning::from_json(&json)) {
            Ok(Ok(tuning)) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Ok(Err(err)) => {
                log::warn!("Ignoring malformed tuning {path}: {err}");
                Tuning::default()
            }
            Err(err) => {
                log::warn!("Cannot read tuning {path}: {err}");
                Tuning::default()
            }
        }
    }

    /// Stock dimensions overlaid with the optional table
    pub fn load_atlas(&self) -> Atlas {
        let mut atlas = Atlas::with_defaults();
        let Some(path) = self.atlas_path.as_deref() else {
            return atlas;
        };
        match std::fs::read_to_string(path).map(|json| Atlas::from_json(&json)) {
            Ok(Ok(table)) => {
                log::info!("Loaded sprite sizes from {path}");
                atlas.extend(table);
            }
            Ok(Err(err)) => log::warn!("Ignoring malformed sprite table {path}: {err}"),
            Err(err) => log::warn!("Cannot read sprite table {path}: {err}"),
        }
        atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"seed": 77, "script": "Idle"}"#).unwrap();
        assert_eq!(settings.seed, 77);
        assert_eq!(settings.script, InputScript::Idle);
        assert_eq!(settings.tick_ms, 16);
        assert!(settings.tuning_path.is_none());
    }

    #[test]
    fn test_start_power_up_names() {
        let mut settings = Settings {
            start_power_up: Some("Shield".into()),
            ..Default::default()
        };
        assert_eq!(settings.start_power_up_kind(), Some(PowerUpKind::PulseShield));
        settings.start_power_up = Some("laser".into());
        assert_eq!(settings.start_power_up_kind(), None);
        settings.start_power_up = None;
        assert_eq!(settings.start_power_up_kind(), None);
    }

    #[test]
    fn test_missing_files_fall_back() {
        let settings = Settings {
            tuning_path: Some("/nonexistent/tuning.json".into()),
            atlas_path: Some("/nonexistent/atlas.json".into()),
            ..Default::default()
        };
        assert_eq!(settings.load_tuning().stage.width, 384);
        assert!(settings.load_atlas().contains("alien_normal"));
        assert_eq!(Settings::load(Some(Path::new("/nonexistent.json"))).seed, 1);
    }

    #[test]
    fn test_script_names() {
        assert_eq!(InputScript::from_str("BOOST"), Some(InputScript::Boosted));
        assert_eq!(InputScript::from_str("dance"), None);
        assert_eq!(InputScript::Bounce.as_str(), "Bounce");
    }
}

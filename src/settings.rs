//! Run configuration
//!
//! Loaded from JSON by native hosts; every field falls back to its default so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::SimError;

/// Playable character, which decides the starting weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// Throwing knife
    #[default]
    Warrior,
    /// Homing wand
    Mage,
    /// Twin daggers, fast and weak
    Rogue,
    /// Short-range whip
    Necromancer,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Necromancer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Necromancer => "Necromancer",
        }
    }

    /// Parse a class name, falling back to `None` for anything unknown
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warrior" => Some(CharacterClass::Warrior),
            "mage" => Some(CharacterClass::Mage),
            "rogue" => Some(CharacterClass::Rogue),
            "necromancer" | "necro" => Some(CharacterClass::Necromancer),
            _ => None,
        }
    }
}

/// Which clock weapon cooldowns and timed effects are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CooldownClock {
    /// Host wall clock. Time spent paused still counts against cooldowns,
    /// projectile lifetimes and invulnerability.
    #[default]
    Wall,
    /// Accumulated unpaused game time. Everything freezes while paused.
    Simulation,
}

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// PRNG seed for spawns, drops and upgrade offers
    pub seed: u64,
    /// Starting character
    pub character_class: CharacterClass,
    /// Initial viewport size (the host pushes updates on resize)
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Clock used for cooldowns and timed effects
    pub cooldown_clock: CooldownClock,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            character_class: CharacterClass::Warrior,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            cooldown_clock: CooldownClock::Wall,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SimError> {
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            return Err(SimError::InvalidSetting {
                field: "viewport_width",
                reason: "must be a positive number",
            });
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(SimError::InvalidSetting {
                field: "viewport_height",
                reason: "must be a positive number",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "character_class": "rogue" }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.character_class, CharacterClass::Rogue);
        assert_eq!(settings.viewport_width, DEFAULT_VIEWPORT_WIDTH);
        assert_eq!(settings.cooldown_clock, CooldownClock::Wall);
    }

    #[test]
    fn test_clock_policy_parses() {
        let settings = Settings::from_json(r#"{ "cooldown_clock": "simulation" }"#).unwrap();
        assert_eq!(settings.cooldown_clock, CooldownClock::Simulation);
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = Settings::from_json(r#"{ "viewport_width": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidSetting {
                field: "viewport_width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ seed: "),
            Err(SimError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: 42,
            character_class: CharacterClass::Necromancer,
            ..Default::default()
        };
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed.seed, 42);
        assert_eq!(parsed.character_class, CharacterClass::Necromancer);
    }

    #[test]
    fn test_class_names() {
        for class in CharacterClass::ALL {
            assert_eq!(CharacterClass::from_name(class.as_str()), Some(class));
        }
        assert_eq!(CharacterClass::from_name("bard"), None);
    }
}

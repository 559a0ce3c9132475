//! Monster tuning
//!
//! Every section has defaults, so a config file only needs to name the
//! values it changes. Validation runs once when a controller is built.

use crate::error::{AiError, Result};
use crate::sound::{LevelTable, SoundLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Idle state tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Seconds to stand still before wandering
    pub duration: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self { duration: 5.0 }
    }
}

/// Wandering state tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderingConfig {
    pub speed: f32,
    /// Radius around the current position that wander goals are drawn from
    pub radius: f32,
}

impl Default for WanderingConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            radius: 10.0,
        }
    }
}

/// Investigating state tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigatingConfig {
    pub quiet_speed: f32,
    pub moderate_speed: f32,
    /// Minimum seconds between accepted retargets
    pub retarget_cooldown: f32,
}

impl InvestigatingConfig {
    /// Movement speed while investigating a sound of `level`.
    ///
    /// Loud sounds escalate to a chase before a speed is ever needed, and
    /// silence only reaches this state through direct calls, so both fall
    /// back to the quiet speed.
    pub fn speed_for(&self, level: SoundLevel) -> f32 {
        match level {
            SoundLevel::Moderate => self.moderate_speed,
            _ => self.quiet_speed,
        }
    }
}

impl Default for InvestigatingConfig {
    fn default() -> Self {
        Self {
            quiet_speed: 1.0,
            moderate_speed: 1.0,
            retarget_cooldown: 0.5,
        }
    }
}

/// Chasing state tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChasingConfig {
    pub speed: f32,
    pub retarget_cooldown: f32,
}

impl Default for ChasingConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            retarget_cooldown: 0.3,
        }
    }
}

/// Rage meter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RageConfig {
    pub max: f32,
    /// Rage gained per second, in every state
    pub default_gain: f32,
    /// Rage added when an investigation reaches its goal and finds nothing
    pub failed_search_penalty: f32,
}

impl Default for RageConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            default_gain: 1.0,
            failed_search_penalty: 10.0,
        }
    }
}

/// Enraged state tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnragedConfig {
    /// Seconds of listening before giving up
    pub listen_duration: f32,
    /// Accumulated threat that counts as finding the player
    pub threat_threshold: f32,
    /// Threat gained per second of raw noise at each level
    pub gains: LevelTable,
    /// Radius around the player that the ambush warp lands in
    pub teleport_range: f32,
}

impl Default for EnragedConfig {
    fn default() -> Self {
        Self {
            listen_duration: 10.0,
            threat_threshold: 10.0,
            gains: LevelTable::new(1.0, 2.0, 3.0),
            teleport_range: 10.0,
        }
    }
}

/// Navigation query tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Search radius for projecting points onto the walkable surface
    pub search_radius: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            search_radius: 10.0,
        }
    }
}

/// Full tuning for one monster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    pub idle: IdleConfig,
    pub wandering: WanderingConfig,
    pub investigating: InvestigatingConfig,
    pub chasing: ChasingConfig,
    pub rage: RageConfig,
    pub enraged: EnragedConfig,
    pub navigation: NavigationConfig,
    /// Seed for random point sampling; entropy when absent
    pub seed: Option<u64>,
}

impl MonsterConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MonsterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading monster config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        non_negative("idle.duration", self.idle.duration)?;
        positive("wandering.speed", self.wandering.speed)?;
        positive("wandering.radius", self.wandering.radius)?;
        positive("investigating.quiet_speed", self.investigating.quiet_speed)?;
        positive(
            "investigating.moderate_speed",
            self.investigating.moderate_speed,
        )?;
        non_negative(
            "investigating.retarget_cooldown",
            self.investigating.retarget_cooldown,
        )?;
        positive("chasing.speed", self.chasing.speed)?;
        non_negative("chasing.retarget_cooldown", self.chasing.retarget_cooldown)?;
        positive("rage.max", self.rage.max)?;
        non_negative("rage.default_gain", self.rage.default_gain)?;
        non_negative("rage.failed_search_penalty", self.rage.failed_search_penalty)?;
        positive("enraged.listen_duration", self.enraged.listen_duration)?;
        positive("enraged.threat_threshold", self.enraged.threat_threshold)?;
        for (name, gain) in ["quiet", "moderate", "loud"]
            .iter()
            .zip(self.enraged.gains.values())
        {
            non_negative(&format!("enraged.gains.{name}"), gain)?;
        }
        positive("enraged.teleport_range", self.enraged.teleport_range)?;
        positive("navigation.search_radius", self.navigation.search_radius)?;
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AiError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AiError::InvalidConfig(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

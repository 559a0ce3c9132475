//! Scenario configuration
//!
//! A scenario is one JSON document: the arena, where everyone starts, the
//! listening zones around the monster, the monster's tuning and a timed
//! script of player commands.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment overrides: `CAVE_SIM_SEED`, `CAVE_SIM_DURATION`
//! 2. Scenario file: first positional argument, else `CAVE_SIM_CONFIG`
//! 3. Built-in demo scenario
//!
//! # Example Scenario
//!
//! ```json
//! {
//!   "tick_rate": 30.0,
//!   "duration": 45.0,
//!   "monster": { "seed": 3, "rage": { "max": 60.0 } },
//!   "script": [
//!     { "at": 0.0, "command": { "action": "move_to", "to": { "x": 4.0, "y": 0.0, "z": 4.0 }, "run": true } },
//!     { "at": 6.0, "command": { "action": "start_tuning" } }
//!   ]
//! }
//! ```

use crate::error::{Result, SimError};
use cave_ai::{MonsterConfig, SoundLevel};
use cave_math::Vec3;
use cave_triggers::{TriggerVolume, ZoneId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Walkable ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub depth: f32,
    pub cell_size: f32,
    /// Minimum corner of the grid
    pub origin: Vec3,
    pub walls: Vec<WallConfig>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            depth: 60.0,
            cell_size: 1.0,
            origin: Vec3::new(-30.0, 0.0, -30.0),
            walls: vec![
                WallConfig {
                    min: Vec3::new(-12.0, 0.0, 8.0),
                    max: Vec3::new(12.0, 0.0, 9.0),
                },
                WallConfig {
                    min: Vec3::new(16.0, 0.0, -20.0),
                    max: Vec3::new(17.0, 0.0, 4.0),
                },
            ],
        }
    }
}

/// Axis-aligned blocked rectangle on the ground plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub min: Vec3,
    pub max: Vec3,
}

/// A listening zone carried around by the monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: ZoneId,
    pub volume: TriggerVolume,
    pub min_audible: SoundLevel,
}

/// The scripted player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec3,
    pub walk_speed: f32,
    pub run_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(-20.0, 0.0, -20.0),
            walk_speed: 2.0,
            run_multiplier: 2.0,
        }
    }
}

/// Something the player does at a scripted time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerCommand {
    MoveTo {
        to: Vec3,
        #[serde(default)]
        run: bool,
    },
    Stop,
    StartTuning,
    StopTuning,
    Hide,
    Unhide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds since the start of the run
    pub at: f32,
    pub command: PlayerCommand,
}

impl ScriptStep {
    pub fn new(at: f32, command: PlayerCommand) -> Self {
        Self { at, command }
    }
}

/// Complete scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation steps per second
    pub tick_rate: f32,
    /// Simulated seconds to run
    pub duration: f32,
    pub arena: ArenaConfig,
    pub monster_start: Vec3,
    pub player: PlayerConfig,
    pub zones: Vec<ZoneConfig>,
    pub monster: MonsterConfig,
    pub script: Vec<ScriptStep>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            duration: 90.0,
            arena: ArenaConfig::default(),
            monster_start: Vec3::ZERO,
            player: PlayerConfig::default(),
            zones: vec![
                ZoneConfig {
                    id: ZoneId(1),
                    volume: TriggerVolume::cylinder(16.0, 6.0),
                    min_audible: SoundLevel::Moderate,
                },
                ZoneConfig {
                    id: ZoneId(2),
                    volume: TriggerVolume::cylinder(7.0, 6.0),
                    min_audible: SoundLevel::Quiet,
                },
            ],
            monster: MonsterConfig {
                seed: Some(1),
                ..MonsterConfig::default()
            },
            script: demo_script(),
        }
    }
}

/// Sneak in, get greedy with the radio, then run for cover
fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(
            0.0,
            PlayerCommand::MoveTo {
                to: Vec3::new(-6.0, 0.0, -6.0),
                run: false,
            },
        ),
        ScriptStep::new(12.0, PlayerCommand::StartTuning),
        ScriptStep::new(14.0, PlayerCommand::StopTuning),
        ScriptStep::new(
            14.0,
            PlayerCommand::MoveTo {
                to: Vec3::new(-24.0, 0.0, 20.0),
                run: true,
            },
        ),
        ScriptStep::new(30.0, PlayerCommand::Hide),
        ScriptStep::new(55.0, PlayerCommand::Unhide),
        ScriptStep::new(
            55.0,
            PlayerCommand::MoveTo {
                to: Vec3::new(20.0, 0.0, 20.0),
                run: true,
            },
        ),
    ]
}

impl SimConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let path = std::env::args()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .or_else(|| std::env::var("CAVE_SIM_CONFIG").ok().filter(|p| !p.is_empty()));

        let mut config = match path {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                log::info!("Loaded scenario from {}", path);
                config
            }
            None => {
                log::info!("No scenario given, running the built-in demo");
                Self::default()
            }
        };

        if let Ok(seed) = std::env::var("CAVE_SIM_SEED") {
            match seed.parse() {
                Ok(seed) => {
                    config.monster.seed = Some(seed);
                    log::info!("Seed from env: {}", seed);
                }
                Err(_) => log::warn!("Ignoring unparsable CAVE_SIM_SEED={}", seed),
            }
        }

        if let Ok(duration) = std::env::var("CAVE_SIM_DURATION") {
            match duration.parse() {
                Ok(duration) => config.duration = duration,
                Err(_) => log::warn!("Ignoring unparsable CAVE_SIM_DURATION={}", duration),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a scenario from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tick_rate > 0.0) {
            return Err(invalid(format!("tick_rate must be positive, got {}", self.tick_rate)));
        }
        if !(self.duration >= 0.0) {
            return Err(invalid(format!("duration must not be negative, got {}", self.duration)));
        }
        let arena = &self.arena;
        if !(arena.width > 0.0 && arena.depth > 0.0 && arena.cell_size > 0.0) {
            return Err(invalid("arena width, depth and cell_size must be positive".into()));
        }
        if !(self.player.walk_speed > 0.0 && self.player.run_multiplier > 0.0) {
            return Err(invalid("player speeds must be positive".into()));
        }

        let mut ids = HashSet::new();
        for zone in &self.zones {
            if !ids.insert(zone.id) {
                return Err(invalid(format!("duplicate listening zone {}", zone.id)));
            }
        }

        self.monster.validate()?;
        Ok(())
    }

    /// One-line description for the startup log
    pub fn summary(&self) -> String {
        format!(
            "{}s at {} Hz, {}x{} arena with {} walls, {} listening zones, {} script steps",
            self.duration,
            self.tick_rate,
            self.arena.width,
            self.arena.depth,
            self.arena.walls.len(),
            self.zones.len(),
            self.script.len()
        )
    }
}

fn invalid(message: String) -> SimError {
    SimError::InvalidScenario(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.zones.len(), 2);
    }

    #[test]
    fn test_parse_script_commands() {
        let config = SimConfig::from_json_str(
            r#"{
                "duration": 5.0,
                "script": [
                    { "at": 0.0, "command": { "action": "move_to", "to": { "x": 1.0, "y": 0.0, "z": 2.0 } } },
                    { "at": 1.5, "command": { "action": "start_tuning" } },
                    { "at": 3.0, "command": { "action": "hide" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.duration, 5.0);
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(
            config.script[0].command,
            PlayerCommand::MoveTo {
                to: Vec3::new(1.0, 0.0, 2.0),
                run: false
            }
        );
        assert_eq!(config.script[1].command, PlayerCommand::StartTuning);
        assert_eq!(config.script[2].at, 3.0);
    }

    #[test]
    fn test_parse_zones() {
        let config = SimConfig::from_json_str(
            r#"{
                "zones": [
                    { "id": 7, "volume": { "shape": "sphere", "radius": 5.0 }, "min_audible": "loud" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.zones[0].id, ZoneId(7));
        assert_eq!(config.zones[0].min_audible, SoundLevel::Loud);
    }

    #[test]
    fn test_rejects_duplicate_zones() {
        let mut config = SimConfig::default();
        config.zones[1].id = config.zones[0].id;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_monster_config_errors_propagate() {
        let mut config = SimConfig::default();
        config.monster.enraged.teleport_range = 0.0;
        assert!(matches!(config.validate(), Err(SimError::Ai(_))));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let config = SimConfig {
            tick_rate: 0.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

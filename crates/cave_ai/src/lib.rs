//! Cave AI - Monster Perception and Pursuit
//!
//! This crate drives the cave monster: it decides every simulation tick
//! where the monster moves and why, from what it hears.
//!
//! # Features
//!
//! - Five-state behavior machine (idle, wandering, investigating, chasing, enraged)
//! - Nested listening zones with per-zone audibility thresholds
//! - Rage that builds over time and from failed searches
//! - Map-wide raw noise listening over the event bus while enraged
//! - Grid navigation mesh and agent for headless hosts
//!
//! # Example
//!
//! ```ignore
//! use cave_ai::prelude::*;
//!
//! let mut monster = MonsterController::new(agent, mesh, bus, &MonsterConfig::default())?;
//! monster.add_listening_zone(ZoneId(1), PerceptionFilter::new(SoundLevel::Quiet));
//! monster.start();
//!
//! // every frame
//! monster.track_target(Some(player_position));
//! monster.perceive(&Sound::new(SoundLevel::Moderate, player_position));
//! monster.tick(dt);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod monster;
pub mod navigation;
pub mod perception;
pub mod rage;
pub mod sound;
pub mod state;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::config::MonsterConfig;
    pub use crate::controller::{MonsterController, MonsterSignal};
    pub use crate::error::{AiError, Result};
    pub use crate::monster::Monster;
    pub use crate::navigation::{
        has_arrived, NavAgent, NavMesh, NavPath, NavigationQuery, PathingAgent, ARRIVAL_DISTANCE,
    };
    pub use crate::perception::{ListeningZones, PerceptionFilter};
    pub use crate::rage::RageMeter;
    pub use crate::sound::{LevelTable, NoiseEmitted, Sound, SoundLevel};
    pub use crate::state::{MonsterState, StateId, Transition};
    pub use cave_triggers::ZoneId;
}

pub use prelude::*;

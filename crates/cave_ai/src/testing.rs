//! Scripted collaborators for deterministic state tests

use crate::config::MonsterConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use cave_event::EventBus;
use cave_math::Vec3;
use std::cell::Cell;
use std::sync::Arc;

/// Agent whose path state is whatever the test says it is.
///
/// `set_destination` records the request and reports the straight-line
/// distance as remaining, with no pending path.
#[derive(Debug, Default, Clone)]
pub struct ScriptedAgent {
    pub position: Vec3,
    pub speed: f32,
    pub destination: Option<Vec3>,
    pub remaining: f32,
    pub pending: bool,
    pub destinations: Vec<Vec3>,
    pub resets: usize,
    pub warps: Vec<Vec3>,
}

impl ScriptedAgent {
    /// Jump to the current destination
    pub fn arrive(&mut self) {
        if let Some(destination) = self.destination {
            self.position = destination;
        }
        self.remaining = 0.0;
        self.pending = false;
    }
}

impl PathingAgent for ScriptedAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.destinations.push(point);
        self.remaining = self.position.distance(point);
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.remaining = 0.0;
        self.pending = false;
        self.resets += 1;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn warp(&mut self, point: Vec3) {
        self.position = point;
        self.destination = None;
        self.remaining = 0.0;
        self.pending = false;
        self.warps.push(point);
    }
}

/// Flat, endless ground. Rejects the first `failures` samples.
#[derive(Debug, Default)]
pub struct OpenGround {
    pub failures: Cell<u32>,
    pub queries: Cell<u32>,
}

impl OpenGround {
    pub fn failing(failures: u32) -> Self {
        Self {
            failures: Cell::new(failures),
            queries: Cell::new(0),
        }
    }
}

impl NavigationQuery for OpenGround {
    fn sample_valid_position(&self, near: Vec3, _search_radius: f32) -> Option<Vec3> {
        self.queries.set(self.queries.get() + 1);
        let failures = self.failures.get();
        if failures > 0 {
            self.failures.set(failures - 1);
            return None;
        }
        Some(Vec3::new(near.x, 0.0, near.z))
    }
}

/// Defaults with a fixed RNG seed
pub fn seeded_config() -> MonsterConfig {
    MonsterConfig {
        seed: Some(7),
        ..MonsterConfig::default()
    }
}

pub fn monster(config: &MonsterConfig) -> Monster<ScriptedAgent, OpenGround> {
    monster_on(OpenGround::default(), config)
}

pub fn monster_on<N: NavigationQuery>(nav: N, config: &MonsterConfig) -> Monster<ScriptedAgent, N> {
    Monster::new(
        ScriptedAgent::default(),
        nav,
        Arc::new(EventBus::new()),
        config,
    )
}

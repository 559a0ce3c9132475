//! Shared monster context
//!
//! Everything that outlives a single state activation: the pathing agent,
//! rage, the sound that triggered the current lead and the tracked target.
//! States receive `&mut Monster` in every hook.

use crate::config::MonsterConfig;
use crate::navigation::{has_arrived, NavigationQuery, PathingAgent};
use crate::rage::RageMeter;
use crate::sound::Sound;
use cave_event::EventBus;
use cave_math::{consts::TAU, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Attempts between warnings while sampling a random navigable point
const SAMPLE_WARN_INTERVAL: u32 = 1000;

/// Blackboard shared by all monster states
pub struct Monster<A, N> {
    agent: A,
    nav: N,
    bus: Arc<EventBus>,
    rng: ChaCha8Rng,
    search_radius: f32,
    pub(crate) rage: RageMeter,
    pub(crate) triggering_sound: Option<Sound>,
    pub(crate) target: Option<Vec3>,
}

impl<A: PathingAgent, N: NavigationQuery> Monster<A, N> {
    pub fn new(agent: A, nav: N, bus: Arc<EventBus>, config: &MonsterConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            agent,
            nav,
            bus,
            rng,
            search_radius: config.navigation.search_radius,
            rage: RageMeter::new(&config.rage),
            triggering_sound: None,
            target: None,
        }
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn nav(&self) -> &N {
        &self.nav
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn position(&self) -> Vec3 {
        self.agent.position()
    }

    pub fn rage(&self) -> &RageMeter {
        &self.rage
    }

    pub fn triggering_sound(&self) -> Option<Sound> {
        self.triggering_sound
    }

    pub fn set_triggering_sound(&mut self, sound: Sound) {
        self.triggering_sound = Some(sound);
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn has_arrived(&self) -> bool {
        has_arrived(&self.agent)
    }

    /// Snap `point` onto walkable ground, once
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        self.nav.sample_valid_position(point, self.search_radius)
    }

    /// Random walkable point within `radius` of `center` on the ground plane.
    ///
    /// Retries until the navigation query accepts a sample. A radius that can
    /// never reach walkable ground loops forever; config validation is the
    /// only guard.
    pub fn random_navigable_point(&mut self, center: Vec3, radius: f32) -> Vec3 {
        let mut attempts: u32 = 0;
        loop {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = radius * self.rng.gen::<f32>().sqrt();
            let candidate = center.offset_xz(Vec2::from_polar(distance, angle));
            if let Some(point) = self.project(candidate) {
                return point;
            }
            attempts += 1;
            if attempts % SAMPLE_WARN_INTERVAL == 0 {
                log::warn!(
                    "Still sampling a navigable point within {radius} of {center} after {attempts} attempts"
                );
            }
        }
    }

    /// Rage penalty for reaching an investigation goal empty-handed
    pub fn found_nothing(&mut self) {
        self.rage.penalize_failed_search();
        log::debug!("Search found nothing, rage now {:.1}", self.rage.level());
    }

    pub fn clear_rage(&mut self) {
        self.rage.clear();
    }
}

impl<A, N> std::fmt::Debug for Monster<A, N>
where
    A: PathingAgent,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monster")
            .field("position", &self.agent.position())
            .field("rage", &self.rage)
            .field("triggering_sound", &self.triggering_sound)
            .field("target", &self.target)
            .finish()
    }
}

//! Enraged: a time-boxed, map-wide listening contest
//!
//! While enraged the monster ignores listening zones and subscribes to the
//! raw noise channel on the event bus. Noise builds threat; enough threat
//! and the monster ambushes the player, too little before the listening
//! window closes and it calms down.

use super::{MonsterState, StateId, Transition};
use crate::config::EnragedConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::{LevelTable, NoiseEmitted, Sound};
use cave_event::{EventBus, SubscriberId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Threat accumulated from raw noise
#[derive(Debug, Clone)]
pub struct ThreatMeter {
    accumulated: f32,
    gains: LevelTable,
}

impl ThreatMeter {
    pub fn new(gains: LevelTable) -> Self {
        Self {
            accumulated: 0.0,
            gains,
        }
    }

    /// Add `gain[level] * dt` for one emission
    pub fn hear(&mut self, noise: &NoiseEmitted) {
        if let Some(gain) = self.gains.get(noise.level) {
            self.accumulated += gain * noise.dt;
        }
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[derive(Debug)]
pub struct EnragedState {
    listen_duration: f32,
    threat_threshold: f32,
    teleport_range: f32,
    listen_timer: f32,
    meter: Arc<Mutex<ThreatMeter>>,
    subscription: Option<SubscriberId>,
    found_player: bool,
}

impl EnragedState {
    pub fn new(config: &EnragedConfig) -> Self {
        Self {
            listen_duration: config.listen_duration,
            threat_threshold: config.threat_threshold,
            teleport_range: config.teleport_range,
            listen_timer: 0.0,
            meter: Arc::new(Mutex::new(ThreatMeter::new(config.gains))),
            subscription: None,
            found_player: false,
        }
    }

    pub fn threat(&self) -> f32 {
        self.meter.lock().accumulated()
    }

    pub fn found_player(&self) -> bool {
        self.found_player
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    fn listen(&mut self, bus: &EventBus) {
        self.stop_listening(bus);
        let meter = Arc::clone(&self.meter);
        let id = bus.subscribe::<NoiseEmitted, _>(move |noise| meter.lock().hear(noise));
        self.subscription = Some(id);
    }

    fn stop_listening(&mut self, bus: &EventBus) {
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(id);
        }
    }

    /// Warp next to the player and hand over to the chase
    fn ambush<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) -> Transition {
        match monster.target() {
            Some(target) => {
                let point = monster.random_navigable_point(target, self.teleport_range);
                monster.agent_mut().warp(point);
                log::info!("Monster ambushes from {point}");
            }
            None => log::warn!("Found the player but no target is tracked, chasing from here"),
        }
        Some(StateId::Chasing)
    }
}

impl MonsterState for EnragedState {
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) -> Transition {
        self.listen_timer = 0.0;
        self.found_player = false;
        self.meter.lock().reset();
        monster.agent_mut().reset_path();
        let bus = Arc::clone(monster.bus());
        self.listen(&bus);
        log::info!("Monster enraged and searching for the player");
        None
    }

    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) {
        let bus = Arc::clone(monster.bus());
        self.stop_listening(&bus);
    }

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition {
        if self.found_player {
            return self.ambush(monster);
        }

        self.listen_timer += dt;
        let threat = self.threat();
        log::trace!("Threat {threat:.2} / {}", self.threat_threshold);

        if threat >= self.threat_threshold {
            let bus = Arc::clone(monster.bus());
            self.stop_listening(&bus);
            self.found_player = true;
            log::info!("Monster found the player");
        } else if self.listen_timer >= self.listen_duration {
            let bus = Arc::clone(monster.bus());
            self.stop_listening(&bus);
            monster.clear_rage();
            log::info!("Monster gave up searching");
            return Some(StateId::Idle);
        }
        None
    }

    fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
        _sound: Sound,
    ) -> Transition {
        None
    }

    fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
    ) -> Transition {
        None
    }
}

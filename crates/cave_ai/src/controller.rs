//! Monster controller
//!
//! Owns the active state, the shared [`Monster`] blackboard and the
//! listening zones. The host drives it once per simulation step with
//! [`MonsterController::tick`] and feeds it perception through
//! [`MonsterController::perceive`] and the zone enter/exit calls.

use crate::config::MonsterConfig;
use crate::error::Result;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::perception::{ListeningZones, PerceptionFilter};
use crate::sound::{Sound, SoundLevel};
use crate::state::{StateId, StateSet};
use cave_event::{EventBus, EventChannel};
use cave_math::Vec3;
use cave_triggers::ZoneId;
use std::sync::Arc;

/// Observable outcomes of a tick, for animation and UI listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonsterSignal {
    /// Emitted on every switch, including re-entry into the same state
    StateChanged { from: StateId, to: StateId },
    /// Emitted each time the rage overflow is dispatched
    RageFull { state: StateId },
}

/// The monster's brain
pub struct MonsterController<A, N> {
    monster: Monster<A, N>,
    states: StateSet,
    current: StateId,
    zones: ListeningZones,
    signals: EventChannel<MonsterSignal>,
}

impl<A: PathingAgent, N: NavigationQuery> MonsterController<A, N> {
    /// Build a controller. Nothing runs until [`start`](Self::start).
    pub fn new(agent: A, nav: N, bus: Arc<EventBus>, config: &MonsterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            monster: Monster::new(agent, nav, bus, config),
            states: StateSet::new(config),
            current: StateId::Idle,
            zones: ListeningZones::new(),
            signals: EventChannel::new(),
        })
    }

    /// Begin the monster's life by wandering
    pub fn start(&mut self) {
        log::debug!("Monster controller starting");
        self.switch_state(StateId::Wandering);
    }

    /// One simulation step
    pub fn tick(&mut self, dt: f32) {
        if let Some(next) = self.states.update(self.current, &mut self.monster, dt) {
            self.switch_state(next);
        }
        self.monster.rage.accumulate(dt);
        self.check_rage();
    }

    /// Leave the current state and enter `to`, following any transitions
    /// requested by the entered state. Switching to the active state
    /// re-enters it.
    pub fn switch_state(&mut self, to: StateId) {
        let mut next = Some(to);
        while let Some(to) = next {
            let from = self.current;
            self.states.exit(from, &mut self.monster);
            self.current = to;
            log::debug!("Monster state {from} -> {to}");
            self.signals.send(MonsterSignal::StateChanged { from, to });
            next = self.states.enter(to, &mut self.monster);
        }
    }

    /// A sound reached the monster through `zone`. Dropped unless `zone` is
    /// the active listening zone.
    pub fn sound_heard(&mut self, level: SoundLevel, position: Vec3, zone: ZoneId) {
        if !self.zones.is_active(zone) {
            log::trace!("Dropping {level} sound from inactive {zone}");
            return;
        }
        let sound = Sound::new(level, position);
        if let Some(next) = self.states.on_sound_heard(self.current, &mut self.monster, sound) {
            self.switch_state(next);
        }
    }

    /// Offer a raw sound to every listening zone
    pub fn perceive(&mut self, sound: &Sound) {
        for (zone, heard) in self.zones.deliver(sound) {
            self.sound_heard(heard.level(), heard.position(), zone);
        }
    }

    /// Rage penalty for a failed search, then the same overflow check a tick does
    pub fn on_investigation_found_nothing(&mut self) {
        self.monster.found_nothing();
        self.check_rage();
    }

    pub fn clear_rage(&mut self) {
        self.monster.clear_rage();
    }

    pub fn add_listening_zone(&mut self, zone: ZoneId, filter: PerceptionFilter) {
        self.zones.register(zone, filter);
    }

    pub fn zone_entered(&mut self, zone: ZoneId) {
        self.zones.entered(zone);
    }

    pub fn zone_exited(&mut self, zone: ZoneId) {
        self.zones.exited(zone);
    }

    /// Position of the player, if known
    pub fn track_target(&mut self, target: Option<Vec3>) {
        self.monster.target = target;
    }

    /// Everything signalled since the last drain, oldest first
    pub fn drain_signals(&self) -> Vec<MonsterSignal> {
        self.signals.drain()
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn rage(&self) -> f32 {
        self.monster.rage().level()
    }

    pub fn triggering_sound(&self) -> Option<Sound> {
        self.monster.triggering_sound()
    }

    pub fn zones(&self) -> &ListeningZones {
        &self.zones
    }

    pub fn monster(&self) -> &Monster<A, N> {
        &self.monster
    }

    pub fn agent(&self) -> &A {
        self.monster.agent()
    }

    pub fn agent_mut(&mut self) -> &mut A {
        self.monster.agent_mut()
    }

    fn check_rage(&mut self) {
        if !self.monster.rage().is_full() {
            return;
        }
        self.signals.send(MonsterSignal::RageFull {
            state: self.current,
        });
        match self.states.on_rage_full(self.current, &mut self.monster) {
            Some(next) => {
                log::info!("Rage full while {}", self.current);
                self.switch_state(next);
            }
            None => log::trace!("Rage full while {}, no escalation", self.current),
        }
    }
}

impl<A: PathingAgent, N> std::fmt::Debug for MonsterController<A, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonsterController")
            .field("current", &self.current)
            .field("monster", &self.monster)
            .field("zones", &self.zones)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdleConfig, RageConfig};
    use crate::error::AiError;
    use crate::sound::NoiseEmitted;
    use crate::testing::{seeded_config, OpenGround, ScriptedAgent};
    use approx::assert_relative_eq;

    const Z1: ZoneId = ZoneId(1);
    const Z2: ZoneId = ZoneId(2);

    fn controller(config: &MonsterConfig) -> MonsterController<ScriptedAgent, OpenGround> {
        MonsterController::new(
            ScriptedAgent::default(),
            OpenGround::default(),
            Arc::new(EventBus::new()),
            config,
        )
        .unwrap()
    }

    fn with_zones(config: &MonsterConfig) -> MonsterController<ScriptedAgent, OpenGround> {
        let mut brain = controller(config);
        brain.add_listening_zone(Z1, PerceptionFilter::new(SoundLevel::Quiet));
        brain.add_listening_zone(Z2, PerceptionFilter::new(SoundLevel::Quiet));
        brain
    }

    fn quiet_at(x: f32) -> Sound {
        Sound::new(SoundLevel::Quiet, Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = seeded_config();
        config.wandering.radius = -1.0;
        let result = MonsterController::new(
            ScriptedAgent::default(),
            OpenGround::default(),
            Arc::new(EventBus::new()),
            &config,
        );
        assert!(matches!(result, Err(AiError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_wanders() {
        let mut brain = controller(&seeded_config());
        brain.start();
        assert_eq!(brain.current_state(), StateId::Wandering);
        assert!(brain.agent().destination.is_some());
        assert_eq!(
            brain.drain_signals(),
            vec![MonsterSignal::StateChanged {
                from: StateId::Idle,
                to: StateId::Wandering
            }]
        );
    }

    #[test]
    fn test_nested_zone_filters_outer_sounds() {
        let mut brain = with_zones(&seeded_config());
        brain.zone_entered(Z1);
        brain.zone_entered(Z2);

        brain.sound_heard(SoundLevel::Quiet, Vec3::new(3.0, 0.0, 0.0), Z1);
        assert_eq!(brain.current_state(), StateId::Idle);
        assert!(brain.triggering_sound().is_none());

        brain.zone_exited(Z2);
        brain.sound_heard(SoundLevel::Quiet, Vec3::new(3.0, 0.0, 0.0), Z1);
        assert_eq!(brain.current_state(), StateId::Investigating);
        assert_eq!(brain.triggering_sound(), Some(quiet_at(3.0)));
    }

    #[test]
    fn test_stale_exit_leaves_stack() {
        let mut brain = with_zones(&seeded_config());
        brain.zone_entered(Z1);
        brain.zone_entered(Z2);
        brain.zone_exited(Z1);

        let stack: Vec<_> = brain.zones().stack().iter().collect();
        assert_eq!(stack, vec![Z1, Z2]);
        assert_eq!(brain.zones().top(), Some(Z2));
    }

    #[test]
    fn test_lead_off_the_ground_is_retried_without_penalty() {
        let mut brain = MonsterController::new(
            ScriptedAgent::default(),
            OpenGround::failing(1),
            Arc::new(EventBus::new()),
            &seeded_config(),
        )
        .unwrap();
        brain.add_listening_zone(Z1, PerceptionFilter::new(SoundLevel::Quiet));
        brain.zone_entered(Z1);

        brain.perceive(&quiet_at(3.0));
        assert_eq!(brain.current_state(), StateId::Investigating);
        assert!(brain.agent().destinations.is_empty());

        brain.tick(0.1);
        assert_eq!(brain.current_state(), StateId::Investigating);
        assert_eq!(brain.agent().destinations, vec![Vec3::new(3.0, 0.0, 0.0)]);
        assert_relative_eq!(brain.rage(), 0.1);
    }

    #[test]
    fn test_perceive_goes_through_active_zone_only() {
        let mut brain = controller(&seeded_config());
        brain.add_listening_zone(Z1, PerceptionFilter::new(SoundLevel::Quiet));
        brain.add_listening_zone(Z2, PerceptionFilter::new(SoundLevel::Moderate));
        brain.zone_entered(Z1);
        brain.zone_entered(Z2);

        // Too faint for the active inner zone; the outer one would hear it
        brain.perceive(&quiet_at(4.0));
        assert_eq!(brain.current_state(), StateId::Idle);

        brain.perceive(&Sound::new(SoundLevel::Loud, Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(brain.current_state(), StateId::Investigating);
        assert_eq!(
            brain.triggering_sound().map(|s| s.level()),
            Some(SoundLevel::Moderate)
        );
    }

    #[test]
    fn test_loud_sound_chains_into_chase() {
        let mut brain = with_zones(&seeded_config());
        brain.zone_entered(Z1);
        brain.track_target(Some(Vec3::new(9.0, 0.0, 9.0)));

        brain.sound_heard(SoundLevel::Loud, Vec3::new(2.0, 0.0, 0.0), Z1);

        assert_eq!(brain.current_state(), StateId::Chasing);
        assert_eq!(brain.agent().destinations, vec![Vec3::new(9.0, 0.0, 9.0)]);
        assert_eq!(
            brain.drain_signals(),
            vec![
                MonsterSignal::StateChanged {
                    from: StateId::Idle,
                    to: StateId::Investigating
                },
                MonsterSignal::StateChanged {
                    from: StateId::Investigating,
                    to: StateId::Chasing
                },
            ]
        );
    }

    #[test]
    fn test_rage_accumulates_with_time() {
        let config = MonsterConfig {
            idle: IdleConfig { duration: 100.0 },
            rage: RageConfig {
                max: 100.0,
                default_gain: 2.0,
                failed_search_penalty: 10.0,
            },
            ..seeded_config()
        };
        let mut brain = controller(&config);
        for _ in 0..8 {
            brain.tick(0.5);
        }
        assert_relative_eq!(brain.rage(), 8.0);
        assert_eq!(brain.current_state(), StateId::Idle);
    }

    #[test]
    fn test_rage_full_fires_once_per_tick() {
        let config = MonsterConfig {
            rage: RageConfig {
                max: 1.0,
                default_gain: 1.0,
                failed_search_penalty: 0.0,
            },
            ..seeded_config()
        };
        let mut brain = controller(&config);
        brain.track_target(Some(Vec3::new(5.0, 0.0, 0.0)));
        brain.switch_state(StateId::Chasing);
        brain.agent_mut().remaining = 50.0;
        brain.drain_signals();

        brain.tick(0.5);
        assert!(brain.drain_signals().is_empty());

        for _ in 0..3 {
            brain.tick(0.5);
            assert_eq!(
                brain.drain_signals(),
                vec![MonsterSignal::RageFull {
                    state: StateId::Chasing
                }]
            );
        }
        // Over the line by more than one tick: nothing clamps it
        assert_relative_eq!(brain.rage(), 2.0);
        assert_eq!(brain.current_state(), StateId::Chasing);
    }

    #[test]
    fn test_rage_full_enrages_from_idle() {
        let config = MonsterConfig {
            rage: RageConfig {
                max: 1.0,
                default_gain: 1.0,
                failed_search_penalty: 0.0,
            },
            ..seeded_config()
        };
        let mut brain = controller(&config);
        brain.tick(0.5);
        brain.tick(0.5);
        assert_eq!(brain.current_state(), StateId::Enraged);
        assert_eq!(
            brain.drain_signals(),
            vec![
                MonsterSignal::RageFull {
                    state: StateId::Idle
                },
                MonsterSignal::StateChanged {
                    from: StateId::Idle,
                    to: StateId::Enraged
                },
            ]
        );
    }

    #[test]
    fn test_found_nothing_rechecks_overflow() {
        let config = MonsterConfig {
            rage: RageConfig {
                max: 10.0,
                default_gain: 0.0,
                failed_search_penalty: 10.0,
            },
            ..seeded_config()
        };
        let mut brain = controller(&config);
        brain.on_investigation_found_nothing();
        assert_relative_eq!(brain.rage(), 10.0);
        assert_eq!(brain.current_state(), StateId::Enraged);
    }

    #[test]
    fn test_fruitless_search_overflow_enrages_same_tick() {
        let config = MonsterConfig {
            rage: RageConfig {
                max: 10.0,
                default_gain: 0.0,
                failed_search_penalty: 10.0,
            },
            ..seeded_config()
        };
        let mut brain = with_zones(&config);
        brain.zone_entered(Z1);
        brain.perceive(&quiet_at(2.0));
        assert_eq!(brain.current_state(), StateId::Investigating);
        brain.drain_signals();

        brain.agent_mut().arrive();
        brain.tick(0.1);

        assert_eq!(brain.current_state(), StateId::Enraged);
        assert!(brain
            .drain_signals()
            .contains(&MonsterSignal::RageFull { state: StateId::Idle }));
    }

    #[test]
    fn test_enraged_give_up_clears_rage() {
        let mut config = seeded_config();
        config.rage = RageConfig {
            max: 1.0,
            default_gain: 1.0,
            failed_search_penalty: 0.0,
        };
        config.enraged.listen_duration = 10.0;
        config.enraged.threat_threshold = 10.0;
        let mut brain = controller(&config);
        brain.tick(0.5);
        brain.tick(0.5);
        assert_eq!(brain.current_state(), StateId::Enraged);

        for _ in 0..19 {
            brain.tick(0.5);
            assert_eq!(brain.current_state(), StateId::Enraged);
        }
        brain.tick(0.5);
        assert_eq!(brain.current_state(), StateId::Idle);
        // Cleared during the update, then this tick's passive gain
        assert_relative_eq!(brain.rage(), 0.5);
    }

    #[test]
    fn test_enraged_hears_raw_noise_everywhere() {
        let mut config = seeded_config();
        config.enraged.threat_threshold = 10.0;
        config.enraged.gains.moderate = 2.0;
        config.enraged.teleport_range = 4.0;
        let bus = Arc::new(EventBus::new());
        let mut brain = MonsterController::new(
            ScriptedAgent::default(),
            OpenGround::default(),
            Arc::clone(&bus),
            &config,
        )
        .unwrap();
        let player = Vec3::new(40.0, 0.0, -40.0);
        brain.track_target(Some(player));
        brain.switch_state(StateId::Enraged);

        // No listening zones at all; the raw channel still reaches it
        for _ in 0..20 {
            bus.publish(&NoiseEmitted::new(SoundLevel::Moderate, 0.25));
            brain.tick(0.25);
        }
        assert!(brain.states().enraged.found_player());
        assert_eq!(brain.current_state(), StateId::Enraged);

        brain.tick(0.25);
        assert_eq!(brain.current_state(), StateId::Chasing);
        assert!(brain.agent().position.distance_xz(player) <= 4.0 + 1e-4);
        assert_eq!(bus.subscriber_count::<NoiseEmitted>(), 0);
    }

    #[test]
    fn test_forced_exit_unsubscribes() {
        let bus = Arc::new(EventBus::new());
        let mut brain = MonsterController::new(
            ScriptedAgent::default(),
            OpenGround::default(),
            Arc::clone(&bus),
            &seeded_config(),
        )
        .unwrap();
        brain.switch_state(StateId::Enraged);
        assert_eq!(bus.subscriber_count::<NoiseEmitted>(), 1);

        brain.switch_state(StateId::Idle);
        assert_eq!(bus.subscriber_count::<NoiseEmitted>(), 0);
    }

    #[test]
    fn test_reentering_state_resets_it() {
        let mut brain = controller(&seeded_config());
        brain.tick(3.0);
        assert_relative_eq!(brain.states().idle.elapsed(), 3.0);

        brain.switch_state(StateId::Idle);
        assert_eq!(brain.states().idle.elapsed(), 0.0);
        assert_eq!(
            brain.drain_signals(),
            vec![MonsterSignal::StateChanged {
                from: StateId::Idle,
                to: StateId::Idle
            }]
        );
    }
}

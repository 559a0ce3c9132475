//! Simulation stage
//!
//! Wires the scripted player, the listening zones, the navigation grid and
//! the monster together and advances them in a fixed order each step:
//!
//! 1. Due script commands are applied and the player moves
//! 2. Zone occupancy is updated around the monster
//! 3. The player's noise goes out on the raw bus and through the zones
//! 4. The monster learns where the player is (unless hidden)
//! 5. The monster thinks, then its agent walks

use crate::config::{ScriptStep, SimConfig};
use crate::error::{Result, SimError};
use crate::player::Player;
use cave_ai::{
    MonsterController, MonsterSignal, NavAgent, NavMesh, NoiseEmitted, PathingAgent,
    PerceptionFilter, Sound, StateId,
};
use cave_event::EventBus;
use cave_triggers::{TrackedEntity, TriggerZone, ZoneId, ZoneSystem};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Zone-tracking id of the player
const PLAYER_ID: u64 = 1;

/// What happened over a run
#[derive(Debug, Clone, Default)]
pub struct StageStats {
    pub ticks: u64,
    pub state_changes: usize,
    pub rage_full_signals: usize,
    pub entered: HashMap<StateId, usize>,
    pub noises: usize,
}

impl StageStats {
    fn record(&mut self, signal: &MonsterSignal) {
        match signal {
            MonsterSignal::StateChanged { to, .. } => {
                self.state_changes += 1;
                *self.entered.entry(*to).or_default() += 1;
            }
            MonsterSignal::RageFull { .. } => self.rage_full_signals += 1,
        }
    }

    pub fn times_entered(&self, state: StateId) -> usize {
        self.entered.get(&state).copied().unwrap_or(0)
    }
}

pub struct Stage {
    mesh: Arc<NavMesh>,
    bus: Arc<EventBus>,
    zones: ZoneSystem,
    zone_ids: Vec<ZoneId>,
    brain: MonsterController<NavAgent, Arc<NavMesh>>,
    player: Player,
    script: VecDeque<ScriptStep>,
    time: f32,
    stats: StageStats,
}

impl Stage {
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let arena = &config.arena;
        let mut mesh = NavMesh::create_grid(arena.width, arena.depth, arena.cell_size)
            .with_origin(arena.origin);
        for wall in &arena.walls {
            let blocked = mesh.block_region(wall.min, wall.max);
            log::debug!("Wall {} .. {} blocks {} cells", wall.min, wall.max, blocked);
        }
        if !mesh.is_navigable(config.monster_start) {
            return Err(SimError::InvalidScenario(format!(
                "monster starts off the walkable ground at {}",
                config.monster_start
            )));
        }
        let mesh = Arc::new(mesh);

        let bus = Arc::new(EventBus::new());
        let agent = NavAgent::new(config.monster_start, config.monster.wandering.speed);
        let mut brain =
            MonsterController::new(agent, Arc::clone(&mesh), Arc::clone(&bus), &config.monster)?;

        let mut zones = ZoneSystem::new();
        let mut zone_ids = Vec::with_capacity(config.zones.len());
        for zone in &config.zones {
            zones.register_zone(zone.id, TriggerZone::new(zone.volume.clone()));
            brain.add_listening_zone(zone.id, PerceptionFilter::new(zone.min_audible));
            zone_ids.push(zone.id);
        }

        let mut script: Vec<ScriptStep> = config.script.clone();
        script.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            mesh,
            bus,
            zones,
            zone_ids,
            brain,
            player: Player::new(&config.player),
            script: script.into(),
            time: 0.0,
            stats: StageStats::default(),
        })
    }

    /// Wake the monster up
    pub fn start(&mut self) {
        self.brain.start();
        self.collect_signals();
    }

    pub fn step(&mut self, dt: f32) {
        while self.script.front().is_some_and(|step| step.at <= self.time) {
            if let Some(step) = self.script.pop_front() {
                self.player.apply(&step.command);
            }
        }
        self.player.step(dt);

        let monster = self.brain.agent().position();
        let transforms: Vec<(ZoneId, _)> = self.zone_ids.iter().map(|&id| (id, monster)).collect();
        let tracked: Vec<TrackedEntity> = if self.player.is_hidden() {
            Vec::new()
        } else {
            vec![TrackedEntity::new(PLAYER_ID, self.player.position())]
        };
        for event in self.zones.update(dt, &transforms, &tracked).to_vec() {
            if event.is_enter() {
                self.brain.zone_entered(event.zone);
            } else {
                self.brain.zone_exited(event.zone);
            }
        }

        if let Some(level) = self.player.emission() {
            self.stats.noises += 1;
            self.bus.publish(&NoiseEmitted::new(level, dt));
            self.brain.perceive(&Sound::new(level, self.player.position()));
        }

        let target = (!self.player.is_hidden()).then(|| self.player.position());
        self.brain.track_target(target);

        self.brain.tick(dt);
        self.brain.agent_mut().advance(&self.mesh, dt);

        self.collect_signals();
        self.time += dt;
        self.stats.ticks += 1;
    }

    /// Run for `duration` simulated seconds at `tick_rate` steps per second
    pub fn run(&mut self, duration: f32, tick_rate: f32) {
        let dt = 1.0 / tick_rate;
        let steps = (duration * tick_rate).round() as u64;
        for _ in 0..steps {
            self.step(dt);
        }
    }

    fn collect_signals(&mut self) {
        for signal in self.brain.drain_signals() {
            match signal {
                MonsterSignal::StateChanged { from, to } => {
                    log::info!("[{:>6.2}s] monster {} -> {}", self.time, from, to)
                }
                MonsterSignal::RageFull { state } => {
                    log::trace!("[{:>6.2}s] rage full while {}", self.time, state)
                }
            }
            self.stats.record(&signal);
        }
    }

    pub fn brain(&self) -> &MonsterController<NavAgent, Arc<NavMesh>> {
        &self.brain
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn stats(&self) -> &StageStats {
        &self.stats
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

//! Chasing: periodic re-targeting on the tracked player

use super::{MonsterState, StateId, Transition};
use crate::config::ChasingConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::Sound;

#[derive(Debug, Clone)]
pub struct ChasingState {
    speed: f32,
    cooldown: f32,
    cooldown_timer: f32,
}

impl ChasingState {
    pub fn new(config: &ChasingConfig) -> Self {
        Self {
            speed: config.speed,
            cooldown: config.retarget_cooldown,
            cooldown_timer: config.retarget_cooldown,
        }
    }

    /// Head for the target's current position if the cooldown allows.
    /// The cooldown only restarts when a destination was actually issued.
    fn retarget<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) {
        if self.cooldown_timer < self.cooldown {
            return;
        }
        let Some(target) = monster.target() else {
            log::trace!("Chasing with no tracked target");
            return;
        };
        match monster.project(target) {
            Some(point) => {
                monster.agent_mut().set_destination(point);
                self.cooldown_timer = 0.0;
            }
            None => log::debug!("Target at {target} is off the walkable surface"),
        }
    }
}

impl MonsterState for ChasingState {
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) -> Transition {
        self.cooldown_timer = self.cooldown;
        monster.agent_mut().set_speed(self.speed);
        self.retarget(monster);
        log::info!("Monster is chasing the player");
        None
    }

    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, _monster: &mut Monster<A, N>) {}

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition {
        self.cooldown_timer += dt;
        self.retarget(monster);
        // Reaching the goal means the target slipped away or cannot be reached
        if monster.has_arrived() {
            monster.agent_mut().reset_path();
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

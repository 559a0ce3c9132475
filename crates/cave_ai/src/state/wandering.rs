//! Wandering: stroll to random reachable points

use super::{MonsterState, StateId, Transition};
use crate::config::WanderingConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::Sound;

#[derive(Debug, Clone)]
pub struct WanderingState {
    speed: f32,
    radius: f32,
}

impl WanderingState {
    pub fn new(config: &WanderingConfig) -> Self {
        Self {
            speed: config.speed,
            radius: config.radius,
        }
    }
}

impl MonsterState for WanderingState {
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) -> Transition {
        monster.agent_mut().set_speed(self.speed);
        let origin = monster.position();
        let goal = monster.random_navigable_point(origin, self.radius);
        monster.agent_mut().set_destination(goal);
        log::debug!("Monster wandering to {goal}");
        None
    }

    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, _monster: &mut Monster<A, N>) {}

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        _dt: f32,
    ) -> Transition {
        if monster.has_arrived() {
            monster.agent_mut().reset_path();
            return Some(StateId::Idle);
        }
        None
    }

    fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition {
        monster.set_triggering_sound(sound);
        monster.agent_mut().reset_path();
        Some(StateId::Investigating)
    }

    fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
    ) -> Transition {
        Some(StateId::Enraged)
    }
}

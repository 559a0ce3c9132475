//! The five monster behaviors
//!
//! Exactly one state is active at a time. Every state implements the whole
//! hook set explicitly; hooks report a transition by returning the next
//! [`StateId`], and the controller performs it.

mod chasing;
mod enraged;
mod idle;
mod investigating;
mod wandering;

pub use chasing::ChasingState;
pub use enraged::{EnragedState, ThreatMeter};
pub use idle::IdleState;
pub use investigating::InvestigatingState;
pub use wandering::WanderingState;

use crate::config::MonsterConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::Sound;
use serde::{Deserialize, Serialize};

/// Which behavior is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    Idle,
    Wandering,
    Investigating,
    Chasing,
    Enraged,
}

impl StateId {
    pub const ALL: [StateId; 5] = [
        StateId::Idle,
        StateId::Wandering,
        StateId::Investigating,
        StateId::Chasing,
        StateId::Enraged,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StateId::Idle => "idle",
            StateId::Wandering => "wandering",
            StateId::Investigating => "investigating",
            StateId::Chasing => "chasing",
            StateId::Enraged => "enraged",
        }
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested state change, if any
pub type Transition = Option<StateId>;

/// Hook set shared by every monster behavior
pub trait MonsterState {
    /// Activation. Resets the state's private timers.
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>)
        -> Transition;

    /// Deactivation, before the next state's `enter`
    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>);

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition;

    /// A zone-filtered sound reached the monster
    fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition;

    fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
    ) -> Transition;
}

/// All five states, built once and reused across activations
#[derive(Debug)]
pub struct StateSet {
    pub idle: IdleState,
    pub wandering: WanderingState,
    pub investigating: InvestigatingState,
    pub chasing: ChasingState,
    pub enraged: EnragedState,
}

macro_rules! dispatch {
    ($set:expr, $id:expr, $state:ident => $call:expr) => {
        match $id {
            StateId::Idle => {
                let $state = &mut $set.idle;
                $call
            }
            StateId::Wandering => {
                let $state = &mut $set.wandering;
                $call
            }
            StateId::Investigating => {
                let $state = &mut $set.investigating;
                $call
            }
            StateId::Chasing => {
                let $state = &mut $set.chasing;
                $call
            }
            StateId::Enraged => {
                let $state = &mut $set.enraged;
                $call
            }
        }
    };
}

impl StateSet {
    pub fn new(config: &MonsterConfig) -> Self {
        Self {
            idle: IdleState::new(&config.idle),
            wandering: WanderingState::new(&config.wandering),
            investigating: InvestigatingState::new(&config.investigating),
            chasing: ChasingState::new(&config.chasing),
            enraged: EnragedState::new(&config.enraged),
        }
    }

    pub fn enter<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        id: StateId,
        monster: &mut Monster<A, N>,
    ) -> Transition {
        dispatch!(self, id, state => state.enter(monster))
    }

    pub fn exit<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        id: StateId,
        monster: &mut Monster<A, N>,
    ) {
        dispatch!(self, id, state => state.exit(monster))
    }

    pub fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        id: StateId,
        monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition {
        dispatch!(self, id, state => state.update(monster, dt))
    }

    pub fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        id: StateId,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition {
        dispatch!(self, id, state => state.on_sound_heard(monster, sound))
    }

    pub fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        id: StateId,
        monster: &mut Monster<A, N>,
    ) -> Transition {
        dispatch!(self, id, state => state.on_rage_full(monster))
    }
}

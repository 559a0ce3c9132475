//! Investigating: chase down the best lead without thrashing
//!
//! A new sound replaces the current lead only if it is at least as loud as
//! the loudest one accepted since entry and the retarget cooldown has run
//! out. Loud sounds skip investigation and start a chase. A lead with no
//! walkable ground nearby is kept and re-snapped every tick until a move
//! goes out.

use super::{MonsterState, StateId, Transition};
use crate::config::InvestigatingConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::{Sound, SoundLevel};

#[derive(Debug, Clone)]
pub struct InvestigatingState {
    config: InvestigatingConfig,
    loudest: SoundLevel,
    cooldown_timer: f32,
    /// Accepted lead still waiting for a destination
    unplaced: Option<Sound>,
}

impl InvestigatingState {
    pub fn new(config: &InvestigatingConfig) -> Self {
        Self {
            config: config.clone(),
            loudest: SoundLevel::None,
            cooldown_timer: config.retarget_cooldown,
            unplaced: None,
        }
    }

    /// Loudest sound accepted since entry
    pub fn loudest(&self) -> SoundLevel {
        self.loudest
    }

    /// Whether an accepted lead is still waiting for walkable ground
    pub fn has_unplaced_lead(&self) -> bool {
        self.unplaced.is_some()
    }

    fn cooldown_elapsed(&self) -> bool {
        self.cooldown_timer >= self.config.retarget_cooldown
    }

    fn consider<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition {
        if sound.level() < self.loudest {
            log::trace!("Ignoring {sound}, already following a {} lead", self.loudest);
            return None;
        }
        if !self.cooldown_elapsed() {
            log::trace!("Ignoring {sound}, retarget cooling down");
            return None;
        }

        monster.set_triggering_sound(sound);
        if sound.level() == SoundLevel::Loud {
            log::debug!("Heard {sound}, giving chase");
            return Some(StateId::Chasing);
        }

        self.cooldown_timer = 0.0;
        self.loudest = sound.level();
        monster
            .agent_mut()
            .set_speed(self.config.speed_for(sound.level()));
        self.place(monster, sound);
        None
    }

    fn place<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) {
        match monster.project(sound.position()) {
            Some(point) => {
                monster.agent_mut().set_destination(point);
                self.unplaced = None;
                log::debug!("Investigating {sound}");
            }
            None => {
                log::warn!("No walkable ground near {sound}, retrying next tick");
                self.unplaced = Some(sound);
            }
        }
    }
}

impl MonsterState for InvestigatingState {
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, monster: &mut Monster<A, N>) -> Transition {
        self.loudest = SoundLevel::None;
        self.cooldown_timer = self.config.retarget_cooldown;
        self.unplaced = None;
        match monster.triggering_sound() {
            Some(sound) => self.consider(monster, sound),
            None => {
                log::warn!("Investigating without a triggering sound");
                None
            }
        }
    }

    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, _monster: &mut Monster<A, N>) {}

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition {
        self.cooldown_timer += dt;
        if let Some(lead) = self.unplaced {
            self.place(monster, lead);
            return None;
        }
        if monster.has_arrived() {
            monster.agent_mut().reset_path();
            // Overflow from the penalty is caught by the controller's end-of-tick check
            monster.found_nothing();
            return Some(StateId::Idle);
        }
        None
    }

    fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition {
        self.consider(monster, sound)
    }

    fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
    ) -> Transition {
        Some(StateId::Enraged)
    }
}

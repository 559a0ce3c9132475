//! Idle: stand still for a while

use super::{MonsterState, StateId, Transition};
use crate::config::IdleConfig;
use crate::monster::Monster;
use crate::navigation::{NavigationQuery, PathingAgent};
use crate::sound::Sound;

#[derive(Debug, Clone)]
pub struct IdleState {
    timer: f32,
    duration: f32,
}

impl IdleState {
    pub fn new(config: &IdleConfig) -> Self {
        Self {
            timer: 0.0,
            duration: config.duration,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.timer
    }
}

impl MonsterState for IdleState {
    fn enter<A: PathingAgent, N: NavigationQuery>(&mut self, _monster: &mut Monster<A, N>) -> Transition {
        self.timer = 0.0;
        log::debug!("Monster idling for {}s", self.duration);
        None
    }

    fn exit<A: PathingAgent, N: NavigationQuery>(&mut self, _monster: &mut Monster<A, N>) {}

    fn update<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
        dt: f32,
    ) -> Transition {
        self.timer += dt;
        (self.timer >= self.duration).then_some(StateId::Wandering)
    }

    /// Any sound at all is worth a look while at rest.
    fn on_sound_heard<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        monster: &mut Monster<A, N>,
        sound: Sound,
    ) -> Transition {
        monster.set_triggering_sound(sound);
        Some(StateId::Investigating)
    }

    fn on_rage_full<A: PathingAgent, N: NavigationQuery>(
        &mut self,
        _monster: &mut Monster<A, N>,
    ) -> Transition {
        Some(StateId::Enraged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SoundLevel;
    use crate::testing::{monster, seeded_config};
    use cave_math::Vec3;

    fn idle(duration: f32) -> IdleState {
        IdleState::new(&IdleConfig { duration })
    }

    #[test]
    fn test_times_out_to_wandering() {
        let mut monster = monster(&seeded_config());
        let mut state = idle(5.0);
        state.enter(&mut monster);

        assert_eq!(state.update(&mut monster, 4.99), None);
        assert_eq!(state.update(&mut monster, 0.02), Some(StateId::Wandering));
    }

    #[test]
    fn test_times_out_exactly_at_duration() {
        let mut monster = monster(&seeded_config());
        let mut state = idle(5.0);
        state.enter(&mut monster);

        for _ in 0..19 {
            assert_eq!(state.update(&mut monster, 0.25), None);
        }
        assert_eq!(state.update(&mut monster, 0.25), Some(StateId::Wandering));
    }

    #[test]
    fn test_enter_resets_timer() {
        let mut monster = monster(&seeded_config());
        let mut state = idle(5.0);
        state.enter(&mut monster);
        state.update(&mut monster, 3.0);

        state.enter(&mut monster);
        assert_eq!(state.elapsed(), 0.0);
        assert_eq!(state.update(&mut monster, 3.0), None);
    }

    #[test]
    fn test_any_sound_starts_investigation() {
        let mut monster = monster(&seeded_config());
        let mut state = idle(5.0);
        state.enter(&mut monster);

        let faint = Sound::new(SoundLevel::Quiet, Vec3::new(4.0, 0.0, 1.0));
        assert_eq!(
            state.on_sound_heard(&mut monster, faint),
            Some(StateId::Investigating)
        );
        assert_eq!(monster.triggering_sound(), Some(faint));
    }

    #[test]
    fn test_rage_full_enrages() {
        let mut monster = monster(&seeded_config());
        let mut state = idle(5.0);
        assert_eq!(state.on_rage_full(&mut monster), Some(StateId::Enraged));
    }
}

//! Scripted player
//!
//! Moves in straight lines toward scripted goals and makes noise according
//! to what it is doing.

use crate::config::{PlayerCommand, PlayerConfig};
use cave_ai::SoundLevel;
use cave_math::Vec3;

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    destination: Option<Vec3>,
    walk_speed: f32,
    run_multiplier: f32,
    running: bool,
    tuning: bool,
    hidden: bool,
    moved: bool,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: config.start,
            destination: None,
            walk_speed: config.walk_speed,
            run_multiplier: config.run_multiplier,
            running: false,
            tuning: false,
            hidden: false,
            moved: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn apply(&mut self, command: &PlayerCommand) {
        log::debug!("Player: {:?}", command);
        match command {
            PlayerCommand::MoveTo { to, run } => {
                self.destination = Some(*to);
                self.running = *run;
            }
            PlayerCommand::Stop => self.destination = None,
            // A hidden player cannot use the radio
            PlayerCommand::StartTuning => self.tuning = !self.hidden,
            PlayerCommand::StopTuning => self.tuning = false,
            PlayerCommand::Hide => {
                self.hidden = true;
                self.tuning = false;
                self.destination = None;
            }
            PlayerCommand::Unhide => self.hidden = false,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.moved = false;
        if self.hidden {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };

        let speed = if self.running {
            self.walk_speed * self.run_multiplier
        } else {
            self.walk_speed
        };
        let next = self.position.move_towards(destination, speed * dt);
        self.moved = next != self.position;
        self.position = next;
        if self.position == destination {
            self.destination = None;
        }
    }

    /// Noise made during the last step, if any.
    ///
    /// Tuning the radio is loudest, then running, then walking. Standing
    /// still or hiding is silent.
    pub fn emission(&self) -> Option<SoundLevel> {
        if self.hidden {
            None
        } else if self.tuning {
            Some(SoundLevel::Loud)
        } else if self.moved && self.running {
            Some(SoundLevel::Moderate)
        } else if self.moved {
            Some(SoundLevel::Quiet)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(&PlayerConfig {
            start: Vec3::ZERO,
            walk_speed: 2.0,
            run_multiplier: 2.0,
        })
    }

    fn move_to(x: f32, run: bool) -> PlayerCommand {
        PlayerCommand::MoveTo {
            to: Vec3::new(x, 0.0, 0.0),
            run,
        }
    }

    #[test]
    fn test_standing_still_is_silent() {
        let mut player = player();
        player.step(0.1);
        assert_eq!(player.emission(), None);
    }

    #[test]
    fn test_walking_is_quiet_running_is_moderate() {
        let mut player = player();
        player.apply(&move_to(10.0, false));
        player.step(0.5);
        assert_relative_eq!(player.position().x, 1.0);
        assert_eq!(player.emission(), Some(SoundLevel::Quiet));

        player.apply(&move_to(10.0, true));
        player.step(0.5);
        assert_relative_eq!(player.position().x, 3.0);
        assert_eq!(player.emission(), Some(SoundLevel::Moderate));
    }

    #[test]
    fn test_tuning_is_loud_even_while_moving() {
        let mut player = player();
        player.apply(&move_to(10.0, true));
        player.apply(&PlayerCommand::StartTuning);
        player.step(0.1);
        assert_eq!(player.emission(), Some(SoundLevel::Loud));
    }

    #[test]
    fn test_hiding_silences_and_freezes() {
        let mut player = player();
        player.apply(&move_to(10.0, false));
        player.apply(&PlayerCommand::StartTuning);
        player.apply(&PlayerCommand::Hide);
        player.step(1.0);

        assert_eq!(player.position(), Vec3::ZERO);
        assert_eq!(player.emission(), None);

        player.apply(&PlayerCommand::StartTuning);
        player.apply(&PlayerCommand::Unhide);
        player.step(0.1);
        assert_eq!(player.emission(), None);
    }

    #[test]
    fn test_arrival_stops_the_noise() {
        let mut player = player();
        player.apply(&move_to(1.0, false));
        player.step(1.0);
        assert_eq!(player.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(player.emission(), Some(SoundLevel::Quiet));

        player.step(1.0);
        assert_eq!(player.emission(), None);
    }
}

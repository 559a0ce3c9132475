//! Sound severities and the events that carry them

use cave_math::Vec3;
use serde::{Deserialize, Serialize};

/// Ordinal loudness of a perceived sound.
///
/// The ordering is load-bearing: states compare levels to decide whether a
/// new sound supersedes the one they are tracking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SoundLevel {
    #[default]
    None = 0,
    Quiet = 1,
    Moderate = 2,
    Loud = 3,
}

impl SoundLevel {
    pub const ALL: [SoundLevel; 4] = [
        SoundLevel::None,
        SoundLevel::Quiet,
        SoundLevel::Moderate,
        SoundLevel::Loud,
    ];

    /// Numeric rank, `None` = 0 through `Loud` = 3
    pub fn rank(self) -> i32 {
        self as i32
    }

    /// Level for a rank, clamping out-of-range values to the nearest defined level
    pub fn from_rank_saturating(rank: i32) -> Self {
        match rank {
            i32::MIN..=0 => SoundLevel::None,
            1 => SoundLevel::Quiet,
            2 => SoundLevel::Moderate,
            _ => SoundLevel::Loud,
        }
    }

    /// Anything above silence
    pub fn is_audible(self) -> bool {
        self > SoundLevel::None
    }
}

impl std::fmt::Display for SoundLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SoundLevel::None => "none",
            SoundLevel::Quiet => "quiet",
            SoundLevel::Moderate => "moderate",
            SoundLevel::Loud => "loud",
        };
        f.write_str(name)
    }
}

/// A sound heard at a world position. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    level: SoundLevel,
    position: Vec3,
}

impl Sound {
    pub fn new(level: SoundLevel, position: Vec3) -> Self {
        Self { level, position }
    }

    pub fn level(&self) -> SoundLevel {
        self.level
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Same position, different severity
    pub fn with_level(&self, level: SoundLevel) -> Self {
        Self::new(level, self.position)
    }
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} sound at {}", self.level, self.position)
    }
}

/// Raw, unfiltered emission published on the event bus.
///
/// One emission means the severity was sustained for `dt` seconds of the
/// emitter's frame. Listeners on this channel see every emission regardless
/// of listening zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseEmitted {
    pub level: SoundLevel,
    pub dt: f32,
}

impl NoiseEmitted {
    pub fn new(level: SoundLevel, dt: f32) -> Self {
        Self { level, dt }
    }
}

/// One value per audible severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    pub quiet: f32,
    pub moderate: f32,
    pub loud: f32,
}

impl LevelTable {
    pub const fn new(quiet: f32, moderate: f32, loud: f32) -> Self {
        Self {
            quiet,
            moderate,
            loud,
        }
    }

    /// Entry for `level`, or `None` for silence
    pub fn get(&self, level: SoundLevel) -> Option<f32> {
        match level {
            SoundLevel::None => None,
            SoundLevel::Quiet => Some(self.quiet),
            SoundLevel::Moderate => Some(self.moderate),
            SoundLevel::Loud => Some(self.loud),
        }
    }

    pub fn values(&self) -> [f32; 3] {
        [self.quiet, self.moderate, self.loud]
    }
}

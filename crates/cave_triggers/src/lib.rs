//! Cave Triggers - Listening Zone Volumes
//!
//! Spatial trigger volumes attached to the monster, and the bookkeeping that
//! turns "where is the perceiver" into zone enter/exit notifications.
//!
//! # Features
//!
//! - Volume shapes (box, sphere, cylinder)
//! - Enter/Exit events with deterministic ordering for nested zones
//! - `ZoneStack`, the LIFO record of which nested zone is currently active
//!
//! # Example
//!
//! ```ignore
//! use cave_triggers::prelude::*;
//!
//! let mut zones = ZoneSystem::new();
//! zones.register_zone(ZoneId(1), TriggerZone::new(TriggerVolume::sphere(20.0)));
//! zones.register_zone(ZoneId(2), TriggerZone::new(TriggerVolume::sphere(8.0)));
//!
//! let monster = Vec3::ZERO;
//! let events = zones.update(dt, &[(ZoneId(1), monster), (ZoneId(2), monster)], &[player]);
//! ```

pub mod events;
pub mod stack;
pub mod system;
pub mod volume;
pub mod zone;

pub mod prelude {
    pub use crate::events::{ZoneEvent, ZoneEventKind};
    pub use crate::stack::ZoneStack;
    pub use crate::system::{TrackedEntity, ZoneSystem};
    pub use crate::volume::TriggerVolume;
    pub use crate::zone::{TriggerZone, ZoneId};
}

pub use prelude::*;

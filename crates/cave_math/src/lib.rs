//! # cave_math - Vector Math
//!
//! The handful of vector primitives the perception and pursuit crates share.
//! Positions are world-space `Vec3`s with Y up; the navigable ground is the
//! XZ plane, so several helpers work on that plane only.

pub mod vector;

pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3};
}

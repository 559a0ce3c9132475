//! Navigation collaborators
//!
//! The monster never computes paths itself. It talks to a [`PathingAgent`]
//! that moves it and a [`NavigationQuery`] that snaps points onto walkable
//! ground. [`NavMesh`] and [`NavAgent`] are grid-based implementations of
//! both, good enough for headless simulation and tests.

mod agent;
mod mesh;

pub use agent::NavAgent;
pub use mesh::{NavCell, NavMesh, NavPath};

use cave_math::Vec3;
use std::sync::Arc;

/// Distance at which an agent counts as arrived
pub const ARRIVAL_DISTANCE: f32 = 0.1;

/// Something that walks the monster toward a destination
pub trait PathingAgent {
    fn position(&self) -> Vec3;

    /// Request a path to `point`. The path may resolve later.
    fn set_destination(&mut self, point: Vec3);

    /// Drop the current path and stop
    fn reset_path(&mut self);

    /// Distance left along the current path
    fn remaining_distance(&self) -> f32;

    /// Whether a requested path is still being computed
    fn path_pending(&self) -> bool;

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);

    /// Relocate instantly, dropping any path
    fn warp(&mut self, point: Vec3);
}

/// Spatial query onto the walkable surface
pub trait NavigationQuery {
    /// Nearest walkable point to `near` within `search_radius`
    fn sample_valid_position(&self, near: Vec3, search_radius: f32) -> Option<Vec3>;
}

impl<T: NavigationQuery + ?Sized> NavigationQuery for &T {
    fn sample_valid_position(&self, near: Vec3, search_radius: f32) -> Option<Vec3> {
        (**self).sample_valid_position(near, search_radius)
    }
}

impl<T: NavigationQuery + ?Sized> NavigationQuery for Arc<T> {
    fn sample_valid_position(&self, near: Vec3, search_radius: f32) -> Option<Vec3> {
        (**self).sample_valid_position(near, search_radius)
    }
}

/// Uniform arrival rule: close enough and not waiting on a path.
pub fn has_arrived<A: PathingAgent + ?Sized>(agent: &A) -> bool {
    !agent.path_pending() && agent.remaining_distance() <= ARRIVAL_DISTANCE
}

//! Grid navigation mesh

use super::NavigationQuery;
use cave_math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// One square cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavCell {
    /// Traversal cost multiplier (higher = harder to traverse)
    pub cost: f32,
    pub walkable: bool,
}

impl Default for NavCell {
    fn default() -> Self {
        Self {
            cost: 1.0,
            walkable: true,
        }
    }
}

/// Walkable ground as a grid of square cells on the XZ plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavMesh {
    origin: Vec3,
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<NavCell>,
}

impl NavMesh {
    /// Create a fully walkable grid covering `width` x `depth` from the origin
    pub fn create_grid(width: f32, depth: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(f32::EPSILON);
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (depth / cell_size).ceil().max(1.0) as usize;
        Self {
            origin: Vec3::ZERO,
            cell_size,
            cols,
            rows,
            cells: vec![NavCell::default(); cols * rows],
        }
    }

    /// Move the grid's minimum corner; also sets the height of the ground
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, index: usize) -> Option<&NavCell> {
        self.cells.get(index)
    }

    /// Index of the cell under `point`, if it is on the grid
    pub fn cell_at(&self, point: Vec3) -> Option<usize> {
        let fx = ((point.x - self.origin.x) / self.cell_size).floor();
        let fz = ((point.z - self.origin.z) / self.cell_size).floor();
        if fx < 0.0 || fz < 0.0 {
            return None;
        }
        let (col, row) = (fx as usize, fz as usize);
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// World-space center of a cell, at ground height
    pub fn cell_center(&self, index: usize) -> Vec3 {
        let col = index % self.cols;
        let row = index / self.cols;
        Vec3::new(
            self.origin.x + (col as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Mark a cell as walkable or blocked
    pub fn set_walkable(&mut self, index: usize, walkable: bool) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.walkable = walkable;
        }
    }

    /// Set traversal cost for a cell
    pub fn set_cost(&mut self, index: usize, cost: f32) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.cost = cost;
        }
    }

    /// Block every cell whose center lies inside the XZ rectangle `min..=max`.
    /// Returns how many cells were blocked.
    pub fn block_region(&mut self, min: Vec3, max: Vec3) -> usize {
        let mut blocked = 0;
        for index in 0..self.cells.len() {
            let center = self.cell_center(index);
            let inside = center.x >= min.x
                && center.x <= max.x
                && center.z >= min.z
                && center.z <= max.z;
            if inside && self.cells[index].walkable {
                self.cells[index].walkable = false;
                blocked += 1;
            }
        }
        blocked
    }

    pub fn is_walkable(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|cell| cell.walkable)
    }

    /// Whether `point` stands on a walkable cell
    pub fn is_navigable(&self, point: Vec3) -> bool {
        self.cell_at(point).is_some_and(|index| self.is_walkable(index))
    }

    /// Nearest walkable point to `point` within `search_radius` on the XZ plane.
    ///
    /// Points already on walkable ground snap to ground height. Otherwise the
    /// closest walkable cell center in range wins.
    pub fn nearest_navigable(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        if self.is_navigable(point) {
            return Some(Vec3::new(point.x, self.origin.y, point.z));
        }

        let mut best: Option<(f32, Vec3)> = None;
        for index in 0..self.cells.len() {
            if !self.cells[index].walkable {
                continue;
            }
            let center = self.cell_center(index);
            let distance = center.distance_xz(point);
            if distance > search_radius {
                continue;
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, center));
            }
        }
        best.map(|(_, center)| center)
    }

    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let col = index % self.cols;
        let row = index / self.cols;
        let left = (col > 0).then(|| index - 1);
        let right = (col + 1 < self.cols).then(|| index + 1);
        let down = (row > 0).then(|| index - self.cols);
        let up = (row + 1 < self.rows).then(|| index + self.cols);
        [left, right, down, up].into_iter().flatten()
    }

    /// Find path between two points using A*
    pub fn find_path(&self, start: Vec3, end: Vec3) -> Option<NavPath> {
        let start_cell = self.cell_at(start).filter(|&i| self.is_walkable(i))?;
        let end_cell = self.cell_at(end).filter(|&i| self.is_walkable(i))?;

        if start_cell == end_cell {
            return Some(NavPath::new(vec![start, end]));
        }

        let cells = self.astar(start_cell, end_cell)?;

        let mut waypoints = vec![start];
        // Endpoints stand in for their own cell centers.
        for &index in &cells[1..cells.len() - 1] {
            waypoints.push(self.cell_center(index));
        }
        waypoints.push(end);

        Some(NavPath::new(waypoints))
    }

    /// A* over the cell grid, 4-connected
    fn astar(&self, start: usize, goal: usize) -> Option<Vec<usize>> {
        #[derive(Clone, Copy)]
        struct Node {
            index: usize,
            f_score: f32,
        }

        impl PartialEq for Node {
            fn eq(&self, other: &Self) -> bool {
                self.index == other.index
            }
        }

        impl Eq for Node {}

        impl PartialOrd for Node {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for Node {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other
                    .f_score
                    .partial_cmp(&self.f_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut g_score: HashMap<usize, f32> = HashMap::new();
        let mut closed_set: HashSet<usize> = HashSet::new();

        let goal_center = self.cell_center(goal);

        g_score.insert(start, 0.0);
        open_set.push(Node {
            index: start,
            f_score: self.cell_center(start).distance_xz(goal_center),
        });

        while let Some(current) = open_set.pop() {
            if current.index == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(&prev) = came_from.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            if !closed_set.insert(current.index) {
                continue;
            }

            let current_g = g_score.get(&current.index).copied().unwrap_or(f32::MAX);

            for neighbor in self.neighbors(current.index) {
                if closed_set.contains(&neighbor) || !self.cells[neighbor].walkable {
                    continue;
                }

                let tentative_g = current_g + self.cell_size * self.cells[neighbor].cost;
                let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(f32::MAX);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.index);
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(Node {
                        index: neighbor,
                        f_score: tentative_g + self.cell_center(neighbor).distance_xz(goal_center),
                    });
                }
            }
        }

        None
    }
}

impl NavigationQuery for NavMesh {
    fn sample_valid_position(&self, near: Vec3, search_radius: f32) -> Option<Vec3> {
        self.nearest_navigable(near, search_radius)
    }
}

/// A path through the navigation mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavPath {
    pub waypoints: Vec<Vec3>,
    pub current_index: usize,
}

impl NavPath {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current_index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.waypoints.len()
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current_index).copied()
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }

    /// Advance to next waypoint
    pub fn advance(&mut self) {
        if self.current_index < self.waypoints.len() {
            self.current_index += 1;
        }
    }

    /// Distance from `position` through the remaining waypoints
    pub fn remaining_distance_from(&self, position: Vec3) -> f32 {
        let Some(next) = self.current_waypoint() else {
            return 0.0;
        };
        let rest: f32 = self.waypoints[self.current_index..]
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();
        position.distance(next) + rest
    }

    pub fn total_length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

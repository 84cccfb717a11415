//! Walkability grid shared by pathfinding, flow fields, and congestion
//!
//! The grid is supplied and sized by the terrain/placement layer before
//! any spatial system runs. Out-of-range coordinates are tolerated
//! everywhere: reads return `None`, writes are silently ignored.

use serde::{Deserialize, Serialize};

use crate::core::config::{BASE_WALK_COST, MAX_CONGESTION, MIN_LANE_COST};
use crate::core::types::GridPos;

/// 2D cost grid; `walk_cost` is the sole externally observable cost
/// surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub walk_cost: Vec<f32>,
}

impl Grid {
    /// Create a grid with every tile at the base walk cost
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walk_cost: vec![BASE_WALK_COST; width * height],
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn cost(&self, pos: GridPos) -> Option<f32> {
        self.index(pos).map(|i| self.walk_cost[i])
    }

    /// Set a tile cost. Out-of-range positions are ignored. The terrain
    /// layer may install arbitrary costs (e.g. walls); only the
    /// congestion system confines tiles to the congestion band.
    #[inline]
    pub fn set_cost(&mut self, pos: GridPos, cost: f32) {
        if let Some(i) = self.index(pos) {
            self.walk_cost[i] = cost;
        }
    }

    /// Clamp a cost into the congestion band
    /// `[MIN_LANE_COST, BASE_WALK_COST + MAX_CONGESTION]`
    #[inline]
    pub fn clamp_cost(cost: f32) -> f32 {
        cost.clamp(MIN_LANE_COST, BASE_WALK_COST + MAX_CONGESTION)
    }

    /// 4-directional neighbors in the fixed iteration order: up, right,
    /// down, left. Callers filter for bounds.
    pub fn neighbors4(pos: GridPos) -> [GridPos; 4] {
        [
            GridPos::new(pos.x, pos.y - 1),
            GridPos::new(pos.x + 1, pos.y),
            GridPos::new(pos.x, pos.y + 1),
            GridPos::new(pos.x - 1, pos.y),
        ]
    }
}

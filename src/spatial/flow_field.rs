//! Cached Dijkstra flow fields
//!
//! One single-source traversal from a destination produces a direction
//! field the whole swarm can share, amortizing the cost that per-agent
//! A* pays N times for N drones heading to the same place. Fields are
//! cached per rounded destination cell and recomputed lazily when their
//! dirty flag is set.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, Vec2};
use crate::spatial::grid::Grid;

/// A per-cell direction field guiding agents toward one destination
///
/// Vectors are unit length everywhere except at the target cell and on
/// unreachable cells, where they are zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowField {
    pub target: GridPos,
    /// One vector per grid cell, row-major
    pub vectors: Vec<Vec2>,
    pub last_updated: f64,
    pub dirty: bool,
}

impl FlowField {
    pub fn vector_at(&self, grid: &Grid, pos: GridPos) -> Option<Vec2> {
        grid.index(pos).map(|i| self.vectors[i])
    }
}

/// Compute a flow field via single-source Dijkstra from the rounded
/// target, using the same cost model as A*
pub fn calculate_flow_field(
    grid: &Grid,
    target: Vec2,
    congestion_weight: f32,
    now: f64,
) -> FlowField {
    let target = GridPos::round_from(target);
    let costs = dijkstra_costs(grid, target, congestion_weight);

    let mut vectors = vec![Vec2::default(); grid.width * grid.height];
    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            let pos = GridPos::new(x, y);
            let Some(cell_idx) = grid.index(pos) else {
                continue;
            };
            let here = costs[cell_idx];
            if pos == target || !here.is_finite() {
                continue; // zero vector at the target and unreachable cells
            }

            // First strictly-cheaper neighbor in the fixed order
            // up, right, down, left wins ties.
            let mut best: Option<(f32, GridPos)> = None;
            for neighbor in Grid::neighbors4(pos) {
                let Some(i) = grid.index(neighbor) else {
                    continue;
                };
                let cost = costs[i];
                if cost < here && best.map_or(true, |(b, _)| cost < b) {
                    best = Some((cost, neighbor));
                }
            }

            if let Some((_, toward)) = best {
                let dir = Vec2::new((toward.x - pos.x) as f32, (toward.y - pos.y) as f32);
                vectors[cell_idx] = dir.normalized();
            }
        }
    }

    FlowField {
        target,
        vectors,
        last_updated: now,
        dirty: false,
    }
}

/// Full cost map from `target` to every reachable cell
fn dijkstra_costs(grid: &Grid, target: GridPos, congestion_weight: f32) -> Vec<f32> {
    let mut costs = vec![f32::INFINITY; grid.width * grid.height];
    let Some(start_idx) = grid.index(target) else {
        return costs;
    };
    costs[start_idx] = 0.0;

    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f32>, GridPos)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), target)));

    while let Some(Reverse((OrderedFloat(dist), pos))) = heap.pop() {
        let Some(idx) = grid.index(pos) else {
            continue;
        };
        if dist > costs[idx] {
            continue; // stale heap entry
        }

        for neighbor in Grid::neighbors4(pos) {
            let Some(nidx) = grid.index(neighbor) else {
                continue;
            };
            let base = grid.walk_cost[nidx];
            let step = if congestion_weight > 0.0 {
                base + base * congestion_weight
            } else {
                base
            };
            let next = dist + step;
            if next < costs[nidx] {
                costs[nidx] = next;
                heap.push(Reverse((OrderedFloat(next), neighbor)));
            }
        }
    }

    costs
}

/// Flow fields cached by rounded destination cell
#[derive(Debug, Clone, Default)]
pub struct FlowFieldCache {
    fields: AHashMap<GridPos, FlowField>,
}

impl FlowFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached field for this destination, recomputing only if
    /// absent or marked dirty
    pub fn get_or_create(
        &mut self,
        grid: &Grid,
        target: Vec2,
        congestion_weight: f32,
        now: f64,
    ) -> &FlowField {
        let key = GridPos::round_from(target);
        let needs_recompute = self.fields.get(&key).map_or(true, |f| f.dirty);
        if needs_recompute {
            let field = calculate_flow_field(grid, target, congestion_weight, now);
            self.fields.insert(key, field);
        }
        &self.fields[&key]
    }

    pub fn get(&self, target: GridPos) -> Option<&FlowField> {
        self.fields.get(&target)
    }

    /// Mark every cached field dirty so the next lookup recomputes it
    pub fn mark_all_dirty(&mut self) {
        for field in self.fields.values_mut() {
            field.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_target_cell_vector_is_zero() {
        let grid = Grid::new(5, 5);
        let field = calculate_flow_field(&grid, Vec2::new(2.0, 2.0), 0.0, 0.0);
        assert_eq!(field.vector_at(&grid, GridPos::new(2, 2)), Some(Vec2::default()));
    }

    #[test]
    fn test_cells_adjacent_to_target_point_at_it() {
        let grid = Grid::new(5, 5);
        let field = calculate_flow_field(&grid, Vec2::new(2.0, 2.0), 0.0, 0.0);
        let cases = [
            (GridPos::new(2, 1), Vec2::new(0.0, 1.0)),
            (GridPos::new(3, 2), Vec2::new(-1.0, 0.0)),
            (GridPos::new(2, 3), Vec2::new(0.0, -1.0)),
            (GridPos::new(1, 2), Vec2::new(1.0, 0.0)),
        ];
        for (pos, expected) in cases {
            assert_eq!(field.vector_at(&grid, pos), Some(expected), "cell {pos:?}");
        }
    }

    #[test]
    fn test_cache_recomputes_only_when_dirty() {
        let grid = Grid::new(4, 4);
        let mut cache = FlowFieldCache::new();
        cache.get_or_create(&grid, Vec2::new(1.0, 1.0), 0.0, 10.0);
        // Second lookup keeps the original timestamp.
        let again = cache.get_or_create(&grid, Vec2::new(1.2, 0.8), 0.0, 20.0);
        assert_eq!(again.last_updated, 10.0);

        cache.mark_all_dirty();
        let rebuilt = cache.get_or_create(&grid, Vec2::new(1.0, 1.0), 0.0, 30.0);
        assert_eq!(rebuilt.last_updated, 30.0);
        assert!(!rebuilt.dirty);
    }

    proptest! {
        /// Every vector is unit length or exactly zero, and the target is
        /// always zero.
        #[test]
        fn prop_vectors_unit_or_zero(tx in 0i32..6, ty in 0i32..6) {
            let grid = Grid::new(6, 6);
            let field = calculate_flow_field(
                &grid,
                GridPos::new(tx, ty).to_vec2(),
                0.5,
                0.0,
            );
            for v in &field.vectors {
                let len = v.length();
                prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
            }
            let t = field.vector_at(&grid, GridPos::new(tx, ty)).unwrap();
            prop_assert_eq!(t, Vec2::default());
        }
    }
}

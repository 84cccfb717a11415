//! A* pathfinding over the walkability grid
//!
//! Single-path search with Manhattan heuristic, 4-directional neighbors,
//! and congestion-weighted edge costs. The open set is a binary min-heap
//! keyed by f-score with ties broken by discovery order, so path
//! selection is deterministic on symmetric grids.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::{GridPos, Vec2};
use crate::spatial::grid::Grid;

/// Heap key: lowest f-score first, ties by discovery order
type OpenEntry = Reverse<(OrderedFloat<f32>, u64, GridPos)>;

/// Cost of stepping onto `pos`, scaled by the congestion weight
#[inline]
fn edge_cost(grid: &Grid, pos: GridPos, congestion_weight: f32) -> Option<f32> {
    let base = grid.cost(pos)?;
    if congestion_weight > 0.0 {
        Some(base + base * congestion_weight)
    } else {
        Some(base)
    }
}

/// Find a path from `start` to `goal` using A*
///
/// Inputs are rounded to integer grid coordinates. Returns `None` if the
/// goal is unreachable or the search exhausts its `width * height`
/// iteration bound; callers fall back to [`direct_path`].
pub fn find_path(
    grid: &Grid,
    start: Vec2,
    goal: Vec2,
    congestion_weight: f32,
) -> Option<Vec<GridPos>> {
    let start = GridPos::round_from(start);
    let goal = GridPos::round_from(goal);

    if start == goal {
        return Some(vec![start]);
    }
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }

    let max_iterations = grid.width * grid.height;
    let mut open_set: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut came_from: AHashMap<GridPos, GridPos> = AHashMap::new();
    let mut g_scores: AHashMap<GridPos, f32> = AHashMap::new();
    let mut discovery: u64 = 0;

    g_scores.insert(start, 0.0);
    open_set.push(Reverse((
        OrderedFloat(start.manhattan(&goal) as f32),
        discovery,
        start,
    )));

    let mut iterations = 0;
    while let Some(Reverse((_, _, current))) = open_set.pop() {
        if current == goal {
            return Some(reconstruct_path(&came_from, current));
        }

        iterations += 1;
        if iterations >= max_iterations {
            return None;
        }

        let current_g = *g_scores.get(&current).unwrap_or(&f32::INFINITY);

        for neighbor in Grid::neighbors4(current) {
            let Some(step) = edge_cost(grid, neighbor, congestion_weight) else {
                continue;
            };

            let tentative_g = current_g + step;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current);
                g_scores.insert(neighbor, tentative_g);
                discovery += 1;
                open_set.push(Reverse((
                    OrderedFloat(tentative_g + neighbor.manhattan(&goal) as f32),
                    discovery,
                    neighbor,
                )));
            }
        }
    }

    None // No path found
}

/// Two-point fallback path used when A* returns `None`
pub fn direct_path(start: Vec2, goal: Vec2) -> Vec<GridPos> {
    let start = GridPos::round_from(start);
    let goal = GridPos::round_from(goal);
    if start == goal {
        vec![start]
    } else {
        vec![start, goal]
    }
}

/// Reconstruct path from the came_from map
fn reconstruct_path(came_from: &AHashMap<GridPos, GridPos>, mut current: GridPos) -> Vec<GridPos> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_equals_goal_is_single_node() {
        let grid = Grid::new(5, 5);
        let path = find_path(&grid, Vec2::new(2.2, 2.4), Vec2::new(1.8, 1.6), 0.0);
        assert_eq!(path, Some(vec![GridPos::new(2, 2)]));
    }

    #[test]
    fn test_straight_line_on_open_grid() {
        let grid = Grid::new(5, 1);
        let path = find_path(&grid, Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), 0.0)
            .expect("open grid must be reachable");
        assert_eq!(
            path,
            vec![
                GridPos::new(0, 0),
                GridPos::new(1, 0),
                GridPos::new(2, 0),
                GridPos::new(3, 0),
                GridPos::new(4, 0),
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_goal_is_none() {
        let grid = Grid::new(5, 5);
        assert_eq!(find_path(&grid, Vec2::new(0.0, 0.0), Vec2::new(9.0, 0.0), 0.0), None);
    }

    #[test]
    fn test_routes_around_expensive_wall_with_congestion_weight() {
        // Vertical wall of cost 100 at x == 2 with a gap at y == 0.
        let mut grid = Grid::new(5, 5);
        for y in 1..5 {
            grid.set_cost(GridPos::new(2, y), 100.0);
        }
        let path = find_path(&grid, Vec2::new(0.0, 4.0), Vec2::new(4.0, 4.0), 1.0)
            .expect("grid is connected");
        let wall_crossings = path
            .iter()
            .filter(|p| p.x == 2 && grid.cost(**p) == Some(100.0))
            .count();
        assert!(
            wall_crossings <= 1,
            "path should cross the expensive wall at most once, crossed {wall_crossings}"
        );
    }

    #[test]
    fn test_direct_path_fallback_shape() {
        assert_eq!(
            direct_path(Vec2::new(0.0, 0.0), Vec2::new(3.0, 2.0)),
            vec![GridPos::new(0, 0), GridPos::new(3, 2)]
        );
        assert_eq!(direct_path(Vec2::new(1.0, 1.0), Vec2::new(1.2, 0.8)), vec![GridPos::new(1, 1)]);
    }

    proptest! {
        /// On an open grid every reachable pair yields a path whose node
        /// count is at least Manhattan distance + 1 and whose endpoints
        /// are the rounded start/goal.
        #[test]
        fn prop_path_endpoints_and_length(
            sx in 0i32..8, sy in 0i32..8, gx in 0i32..8, gy in 0i32..8,
        ) {
            let grid = Grid::new(8, 8);
            let start = GridPos::new(sx, sy);
            let goal = GridPos::new(gx, gy);
            let path = find_path(&grid, start.to_vec2(), goal.to_vec2(), 0.0)
                .expect("open grid is fully connected");
            prop_assert_eq!(path[0], start);
            prop_assert_eq!(*path.last().unwrap(), goal);
            prop_assert!(path.len() as i32 >= start.manhattan(&goal) + 1);
        }

        /// Consecutive path nodes are always 4-adjacent.
        #[test]
        fn prop_path_steps_are_adjacent(
            sx in 0i32..8, sy in 0i32..8, gx in 0i32..8, gy in 0i32..8,
        ) {
            let grid = Grid::new(8, 8);
            let path = find_path(
                &grid,
                GridPos::new(sx, sy).to_vec2(),
                GridPos::new(gx, gy).to_vec2(),
                0.5,
            ).expect("open grid is fully connected");
            for pair in path.windows(2) {
                prop_assert_eq!(pair[0].manhattan(&pair[1]), 1);
            }
        }
    }
}

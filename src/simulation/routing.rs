//! Per-agent path planning
//!
//! Gives every traveling drone that lacks a `Path` a fresh A* route to
//! its target, falling back to a direct two-point path when the search
//! fails. Drones heading to a shared destination could amortize one
//! flow-field traversal instead (see `spatial::flow_field`); call sites
//! currently stay on per-agent A*.

use crate::core::types::{DroneState, EntityId, Vec2};
use crate::ecs::components::Path;
use crate::ecs::world::World;
use crate::spatial::pathfinding::{direct_path, find_path};

/// Plan paths for drones that have a target but no route yet
pub fn pathfinding_system(world: &mut World, _dt: f32) {
    let needs_path: Vec<(EntityId, EntityId)> = world
        .entity_ids()
        .filter_map(|id| {
            let brain = world.drone_brains.get(&id)?;
            if brain.state == DroneState::Idle || world.paths.contains_key(&id) {
                return None;
            }
            Some((id, brain.target_entity?))
        })
        .collect();

    for (drone_id, target_id) in needs_path {
        let (Some(from), Some(to)) = (
            world.positions.get(&drone_id).copied(),
            world.positions.get(&target_id).copied(),
        ) else {
            continue; // movement will notice the missing target
        };
        let start = Vec2::new(from.x, from.y);
        let goal = Vec2::new(to.x, to.y);

        let congestion_weight = world
            .drone_brains
            .get(&drone_id)
            .map_or(0.0, |b| {
                if b.behavior.congestion_avoidance {
                    world.config.congestion_weight
                } else {
                    0.0
                }
            });

        let nodes = find_path(&world.grid, start, goal, congestion_weight)
            .unwrap_or_else(|| direct_path(start, goal));
        world.paths.insert(drone_id, Path::new(nodes));
    }
}

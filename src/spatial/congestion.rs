//! Congestion and lane emergence
//!
//! Tile costs rise under drone traffic and decay back toward the base
//! cost when traffic moves on. With `swarm_cognition` above zero, tiles
//! on drones' active paths are additionally cheapened, so frequently
//! traveled routes settle below base cost and attract future paths:
//! lanes emerge without any explicit lane data structure.

use rand::Rng;

use crate::core::config::{
    BASE_WALK_COST, CONGESTION_DECAY, CONGESTION_INCREASE, FLOW_FIELD_INVALIDATION_CHANCE,
    LANE_DECAY, LANE_REINFORCEMENT, MAX_CONGESTION, MIN_LANE_COST,
};
use crate::core::types::{GridPos, Vec2};
use crate::ecs::world::World;

/// Advance the congestion field by `dt` seconds
///
/// Mutates `world.grid.walk_cost` in place; the single writer of the
/// cost surface per tick.
pub fn congestion_system(world: &mut World, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    // Decay every tile toward base cost, proportional to how far it has
    // drifted. Congestion bleeds off quickly; lanes erode slowly, so a
    // modest reinforcement rate still wins against lane decay.
    for cost in world.grid.walk_cost.iter_mut() {
        if *cost > BASE_WALK_COST {
            *cost -= (*cost - BASE_WALK_COST) * (CONGESTION_DECAY * dt).min(1.0);
        } else if *cost < BASE_WALK_COST {
            *cost += (BASE_WALK_COST - *cost) * (LANE_DECAY * dt).min(1.0);
        }
    }

    let swarm_cognition = world.globals.swarm_cognition;
    let drone_ids: Vec<_> = world
        .entity_ids()
        .filter(|id| world.drone_brains.contains_key(id))
        .collect();

    for id in drone_ids {
        // Tile under the drone gets more expensive.
        if let Some(pos) = world.positions.get(&id) {
            let tile = GridPos::round_from(Vec2::new(pos.x, pos.y));
            if let Some(i) = world.grid.index(tile) {
                world.grid.walk_cost[i] =
                    (world.grid.walk_cost[i] + CONGESTION_INCREASE * dt)
                        .min(BASE_WALK_COST + MAX_CONGESTION);
            }
        }

        // Lane reinforcement on the drone's current path node.
        if swarm_cognition > 0.0 {
            let node = world.paths.get(&id).and_then(|p| p.current_node());
            if let Some(node) = node {
                if let Some(i) = world.grid.index(node) {
                    world.grid.walk_cost[i] = (world.grid.walk_cost[i]
                        - LANE_REINFORCEMENT * swarm_cognition * dt)
                        .max(MIN_LANE_COST);
                }
            }
        }
    }

    // Sampling-based cache invalidation: once the cost surface has
    // shifted enough ticks in a row, cached flow fields go stale. The
    // roll comes from the World's seeded RNG, so runs are reproducible.
    if world.rng.gen_bool(FLOW_FIELD_INVALIDATION_CHANCE) {
        world.flow_fields.mark_all_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DroneRole;
    use crate::ecs::components::{DroneBehavior, Path};

    fn world_with_drone_at(x: f32, y: f32) -> (World, crate::core::types::EntityId) {
        let mut world = World::new(8, 8);
        let drone = world.spawn_drone(DroneRole::Hauler, Vec2::new(x, y), DroneBehavior::default());
        (world, drone)
    }

    #[test]
    fn test_occupied_tile_gains_congestion() {
        let (mut world, _) = world_with_drone_at(3.0, 3.0);
        congestion_system(&mut world, 1.0);
        let cost = world.grid.cost(GridPos::new(3, 3)).unwrap();
        assert!(cost > BASE_WALK_COST);
    }

    #[test]
    fn test_congestion_clamps_at_max() {
        let (mut world, _) = world_with_drone_at(3.0, 3.0);
        for _ in 0..1000 {
            congestion_system(&mut world, 1.0);
        }
        let cost = world.grid.cost(GridPos::new(3, 3)).unwrap();
        assert!(cost <= BASE_WALK_COST + MAX_CONGESTION);
    }

    #[test]
    fn test_empty_grid_decays_back_to_base() {
        let mut world = World::new(8, 8);
        world.grid.set_cost(GridPos::new(2, 2), 4.0);
        world.grid.set_cost(GridPos::new(5, 5), 0.9);
        let mut last_above = world.grid.cost(GridPos::new(2, 2)).unwrap();
        let mut last_below = world.grid.cost(GridPos::new(5, 5)).unwrap();
        for _ in 0..300 {
            congestion_system(&mut world, 1.0);
            let above = world.grid.cost(GridPos::new(2, 2)).unwrap();
            let below = world.grid.cost(GridPos::new(5, 5)).unwrap();
            assert!(above <= last_above && above >= BASE_WALK_COST);
            assert!(below >= last_below && below <= BASE_WALK_COST);
            last_above = above;
            last_below = below;
        }
        assert!((last_above - BASE_WALK_COST).abs() < 1e-4);
        assert!((last_below - BASE_WALK_COST).abs() < 1e-4);
    }

    #[test]
    fn test_all_tiles_stay_inside_cost_band() {
        let (mut world, drone) = world_with_drone_at(1.0, 1.0);
        world.globals.swarm_cognition = 1.0;
        world
            .paths
            .insert(drone, Path::new(vec![GridPos::new(1, 1), GridPos::new(2, 1)]));
        for _ in 0..500 {
            congestion_system(&mut world, 0.5);
        }
        for &cost in &world.grid.walk_cost {
            assert!(cost >= MIN_LANE_COST && cost <= BASE_WALK_COST + MAX_CONGESTION);
        }
    }

    #[test]
    fn test_lane_forms_under_swarm_cognition() {
        let (mut world, drone) = world_with_drone_at(0.0, 0.0);
        world.globals.swarm_cognition = 1.0;
        // Path node away from the drone's own tile so reinforcement is
        // not offset by occupancy congestion.
        world.paths.insert(drone, Path::new(vec![GridPos::new(4, 4)]));

        let mut last = world.grid.cost(GridPos::new(4, 4)).unwrap();
        for _ in 0..10 {
            congestion_system(&mut world, 1.0);
            let now = world.grid.cost(GridPos::new(4, 4)).unwrap();
            assert!(now < last, "lane tile must get strictly cheaper");
            last = now;
        }
        for _ in 0..100 {
            congestion_system(&mut world, 1.0);
        }
        assert_eq!(world.grid.cost(GridPos::new(4, 4)), Some(MIN_LANE_COST));
    }

    #[test]
    fn test_no_lane_without_swarm_cognition() {
        let (mut world, drone) = world_with_drone_at(0.0, 0.0);
        world.globals.swarm_cognition = 0.0;
        world.paths.insert(drone, Path::new(vec![GridPos::new(4, 4)]));
        for _ in 0..10 {
            congestion_system(&mut world, 1.0);
        }
        assert_eq!(world.grid.cost(GridPos::new(4, 4)), Some(BASE_WALK_COST));
    }

    #[test]
    fn test_invalidation_is_reproducible_for_a_fixed_seed() {
        let run = |seed: u64| {
            let mut world = World::with_seed(8, 8, seed);
            world
                .flow_fields
                .get_or_create(&world.grid, Vec2::new(1.0, 1.0), 0.0, 0.0);
            let mut dirty_ticks = Vec::new();
            for tick in 0..50 {
                congestion_system(&mut world, 1.0);
                let dirty = world
                    .flow_fields
                    .get(GridPos::new(1, 1))
                    .map_or(false, |f| f.dirty);
                if dirty {
                    dirty_ticks.push(tick);
                    world.flow_fields.get_or_create(
                        &world.grid,
                        Vec2::new(1.0, 1.0),
                        0.0,
                        0.0,
                    );
                }
            }
            dirty_ticks
        };
        assert_eq!(run(7), run(7));
    }
}

//! Movement and the drone work loop
//!
//! Consumes `Path` components node-by-node at the configured speed, then
//! runs each drone's role-specific arrival behavior: haulers load and
//! deliver cargo, builders dwell on ghost structures until they
//! activate, maintainers dwell on worn producers until wear resets.
//! Reservations are always released before `target_entity` is cleared,
//! so a freed target is reassignable on the very next pass. A task
//! endpoint that despawns mid-flight sends the drone back to idle, with
//! any cargo credited back to the source.

use crate::core::config::COMPLETED_TASK_HISTORY;
use crate::core::types::{DroneState, EntityId, Vec2};
use crate::ecs::components::{DroneBrain, Position};
use crate::ecs::world::{CompletedTask, World};

/// Advance every drone by `dt` seconds
pub fn movement_system(world: &mut World, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    let drone_ids: Vec<EntityId> = world
        .entity_ids()
        .filter(|id| world.drone_brains.contains_key(id))
        .collect();

    for id in drone_ids {
        // Take the brain out of its table for the duration of the update
        // so the rest of the World stays freely borrowable.
        let Some(mut brain) = world.drone_brains.remove(&id) else {
            continue;
        };
        follow_path(world, id, dt);
        match brain.state {
            DroneState::Idle => {}
            DroneState::ToPickup => arrive_pickup(world, id, &mut brain),
            DroneState::ToDropoff => arrive_dropoff(world, id, &mut brain),
            DroneState::Building => dwell_building(world, id, &mut brain, dt),
            DroneState::Maintaining => dwell_maintenance(world, id, &mut brain, dt),
        }
        world.drone_brains.insert(id, brain);
    }
}

/// Walk the drone along its path, consuming nodes as they are reached
fn follow_path(world: &mut World, id: EntityId, dt: f32) {
    let Some(mut path) = world.paths.remove(&id) else {
        return;
    };
    let Some(mut pos) = world.positions.get(&id).copied() else {
        return;
    };

    let mut remaining = world.config.drone_speed * dt;
    while remaining > 0.0 {
        let Some(node) = path.current_node() else {
            break;
        };
        let target = node.to_vec2();
        let here = Vec2::new(pos.x, pos.y);
        let dist = here.distance(&target);
        if dist <= remaining {
            pos = Position {
                x: target.x,
                y: target.y,
            };
            path.idx += 1;
            remaining -= dist;
        } else {
            let dir = Vec2::new(target.x - here.x, target.y - here.y).normalized();
            pos = Position {
                x: here.x + dir.x * remaining,
                y: here.y + dir.y * remaining,
            };
            remaining = 0.0;
        }
    }

    world.positions.insert(id, pos);
    if path.idx < path.nodes.len() {
        world.paths.insert(id, path);
    }
    // A fully consumed path is dropped; arrival handling takes over.
}

/// Within interaction range of the target entity?
fn in_range(world: &World, id: EntityId, target: EntityId) -> bool {
    let (Some(a), Some(b)) = (world.positions.get(&id), world.positions.get(&target)) else {
        return false;
    };
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt() <= world.config.interaction_range
}

/// Release any reservation held by this drone, then clear its objective
/// and return it to idle
fn go_idle(world: &mut World, id: EntityId, brain: &mut DroneBrain) {
    if let Some(target) = brain.target_entity {
        if world.builder_targets.get(&target) == Some(&id) {
            world.builder_targets.remove(&target);
        }
        if world.maintainer_targets.get(&target) == Some(&id) {
            world.maintainer_targets.remove(&target);
        }
    }
    brain.target_entity = None;
    brain.task = None;
    brain.dwell = 0.0;
    brain.state = DroneState::Idle;
    world.paths.remove(&id);
}

fn arrive_pickup(world: &mut World, id: EntityId, brain: &mut DroneBrain) {
    let Some(task) = brain.task else {
        go_idle(world, id, brain);
        return;
    };
    // Source despawned mid-flight (recycled, torn down): abandon rather
    // than walking toward a position that no longer exists.
    if !world.positions.contains_key(&task.source) {
        go_idle(world, id, brain);
        return;
    }
    if !in_range(world, id, task.source) {
        return; // still traveling
    }

    let capacity = world.config.hauler_capacity;
    let taken = world
        .inventories
        .get_mut(&task.source)
        .map_or(0.0, |inv| inv.remove(task.resource, task.amount.min(capacity)));

    if taken <= 0.0 {
        // Source ran dry between assignment and arrival; abandon.
        go_idle(world, id, brain);
        return;
    }

    brain.cargo = Some((task.resource, taken));
    brain.state = DroneState::ToDropoff;
    brain.target_entity = Some(task.destination);
    world.paths.remove(&id);
}

fn arrive_dropoff(world: &mut World, id: EntityId, brain: &mut DroneBrain) {
    let Some(task) = brain.task else {
        go_idle(world, id, brain);
        return;
    };
    // Destination despawned mid-flight: hand the cargo back to the
    // source and abandon the task.
    if !world.positions.contains_key(&task.destination) {
        return_cargo(world, brain, task.source);
        go_idle(world, id, brain);
        return;
    }
    if !in_range(world, id, task.destination) {
        return;
    }

    if let Some((resource, amount)) = brain.cargo.take() {
        let delivered = world
            .inventories
            .get_mut(&task.destination)
            .map_or(0.0, |inv| inv.add(resource, amount));
        // A full destination cannot swallow the rest; route it back to
        // the source instead of letting it vanish.
        let leftover = amount - delivered;
        if leftover > 0.0 {
            brain.cargo = Some((resource, leftover));
            return_cargo(world, brain, task.source);
        }
        tracing::debug!(
            drone = ?id,
            destination = ?task.destination,
            ?resource,
            delivered,
            "haul completed"
        );
    }
    world.completed_tasks.push(CompletedTask {
        task,
        completed_at: world.globals.sim_time_seconds,
    });
    if world.completed_tasks.len() > COMPLETED_TASK_HISTORY {
        world.completed_tasks.remove(0);
    }
    go_idle(world, id, brain);
}

/// Credit whatever the drone is carrying back to `source`. Cargo that no
/// longer fits anywhere is logged and dropped; it is never duplicated.
fn return_cargo(world: &mut World, brain: &mut DroneBrain, source: EntityId) {
    let Some((resource, amount)) = brain.cargo.take() else {
        return;
    };
    let returned = world
        .inventories
        .get_mut(&source)
        .map_or(0.0, |inv| inv.add(resource, amount));
    if returned < amount {
        tracing::warn!(
            ?resource,
            lost = amount - returned,
            "undelivered cargo could not be returned"
        );
    }
}

fn dwell_building(world: &mut World, id: EntityId, brain: &mut DroneBrain, dt: f32) {
    let Some(target) = brain.target_entity else {
        go_idle(world, id, brain);
        return;
    };
    if !world.producers.contains_key(&target) {
        go_idle(world, id, brain);
        return;
    }
    if !in_range(world, id, target) {
        return;
    }

    brain.dwell += dt;
    if brain.dwell >= world.config.build_time_seconds {
        if let Some(producer) = world.producers.get_mut(&target) {
            producer.active = true;
        }
        tracing::debug!(drone = ?id, ?target, "construction completed");
        go_idle(world, id, brain);
    }
}

fn dwell_maintenance(world: &mut World, id: EntityId, brain: &mut DroneBrain, dt: f32) {
    let Some(target) = brain.target_entity else {
        go_idle(world, id, brain);
        return;
    };
    let Some(maintenance_time) = world.degradables.get(&target).map(|d| d.maintenance_time) else {
        go_idle(world, id, brain);
        return;
    };
    if !in_range(world, id, target) {
        return;
    }

    brain.dwell += dt;
    if brain.dwell >= maintenance_time {
        if let Some(degradable) = world.degradables.get_mut(&target) {
            degradable.wear = 0.0;
        }
        tracing::debug!(drone = ?id, ?target, "maintenance completed");
        go_idle(world, id, brain);
    }
}

//! Drone assignment - matches idle drones to outstanding work
//!
//! Haulers consume the task queue front-first, builders claim inactive
//! producers, maintainers consume the maintenance queue. Builder and
//! maintainer claims go through the reservation maps when the drone's
//! `avoid_duplicate_ghost_targets` flag is set, so no two such drones
//! ever share a target. Drones without the flag may double up - that is
//! deliberate, cheaper swarm behavior.

use crate::core::types::{DroneRole, DroneState, EntityId};
use crate::ecs::components::HaulTask;
use crate::ecs::world::World;

/// Assign work to every idle drone, in entity order
pub fn drone_assignment_system(world: &mut World, _dt: f32) {
    let idle_drones: Vec<EntityId> = world
        .entity_ids()
        .filter(|id| world.is_idle_drone(*id))
        .collect();

    for drone_id in idle_drones {
        let Some(role) = world.drone_brains.get(&drone_id).map(|b| b.role) else {
            continue;
        };
        match role {
            DroneRole::Hauler => assign_hauler(world, drone_id),
            DroneRole::Builder => assign_builder(world, drone_id),
            DroneRole::Maintainer => assign_maintainer(world, drone_id),
        }
    }
}

/// Take the first (highest-priority) request whose resource exists in
/// some other entity's inventory
fn assign_hauler(world: &mut World, drone_id: EntityId) {
    let mut chosen: Option<(usize, EntityId)> = None;
    for (i, req) in world.task_requests.iter().enumerate() {
        let source = world.entity_ids().find(|&e| {
            e != req.target_entity
                && e != drone_id
                && world
                    .inventories
                    .get(&e)
                    .map_or(false, |inv| inv.amount(req.resource) > 0.0)
        });
        if let Some(source) = source {
            chosen = Some((i, source));
            break;
        }
    }

    let Some((i, source)) = chosen else {
        return; // nothing satisfiable; requests stay queued
    };
    let req = world.task_requests.remove(i);

    if let Some(brain) = world.drone_brains.get_mut(&drone_id) {
        brain.state = DroneState::ToPickup;
        brain.target_entity = Some(source);
        brain.task = Some(HaulTask {
            source,
            destination: req.target_entity,
            resource: req.resource,
            amount: req.amount,
        });
        tracing::debug!(
            ?drone_id,
            ?source,
            destination = ?req.target_entity,
            resource = ?req.resource,
            amount = req.amount,
            "hauler assigned"
        );
    }
}

/// Claim the first inactive producer within build radius, honoring the
/// reservation map when dedup is enabled
fn assign_builder(world: &mut World, drone_id: EntityId) {
    let Some(brain) = world.drone_brains.get(&drone_id) else {
        return;
    };
    let avoid_duplicates = brain.behavior.avoid_duplicate_ghost_targets;
    let build_radius = brain.behavior.build_radius;
    let drone_pos = world.positions.get(&drone_id).copied();

    let target = world.entity_ids().find(|id| {
        let ghost = world.producers.get(id).map_or(false, |p| !p.active);
        if !ghost {
            return false;
        }
        if avoid_duplicates && world.builder_targets.contains_key(id) {
            return false;
        }
        match (drone_pos, world.positions.get(id)) {
            (Some(dp), Some(tp)) => {
                let dx = dp.x - tp.x;
                let dy = dp.y - tp.y;
                (dx * dx + dy * dy).sqrt() <= build_radius
            }
            _ => true,
        }
    });

    let Some(target) = target else {
        return;
    };
    if avoid_duplicates {
        world.builder_targets.insert(target, drone_id);
    }
    if let Some(brain) = world.drone_brains.get_mut(&drone_id) {
        brain.state = DroneState::Building;
        brain.target_entity = Some(target);
        brain.dwell = 0.0;
        tracing::debug!(?drone_id, ?target, "builder assigned");
    }
}

/// Consume the first maintenance request whose target is unreserved
fn assign_maintainer(world: &mut World, drone_id: EntityId) {
    let Some(brain) = world.drone_brains.get(&drone_id) else {
        return;
    };
    let avoid_duplicates = brain.behavior.avoid_duplicate_ghost_targets;

    let chosen = world
        .maintenance_requests
        .iter()
        .position(|req| !world.maintainer_targets.contains_key(&req.request_entity));
    let Some(i) = chosen else {
        return;
    };
    let req = world.maintenance_requests.remove(i);

    if avoid_duplicates {
        world.maintainer_targets.insert(req.request_entity, drone_id);
    }
    if let Some(brain) = world.drone_brains.get_mut(&drone_id) {
        brain.state = DroneState::Maintaining;
        brain.target_entity = Some(req.request_entity);
        brain.dwell = 0.0;
        tracing::debug!(?drone_id, target = ?req.request_entity, "maintainer assigned");
    }
}

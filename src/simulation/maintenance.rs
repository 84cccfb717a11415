//! Maintenance planning - schedules repair work for worn machines
//!
//! Requests age out after a TTL, reserved targets are never re-listed,
//! and priority weighs wear, structure importance, and whether the
//! machine is currently running.

use crate::core::config::{
    MAINTENANCE_REQUEST_DEBOUNCE, MAINTENANCE_REQUEST_TTL, WEAR_REQUEST_THRESHOLD,
};
use crate::core::types::{EntityId, StructureKind};
use crate::ecs::world::{MaintenanceRequest, World};

/// Rebuild the maintenance queue's contents for this pass
pub fn maintenance_planning_system(world: &mut World, _dt: f32) {
    let now = world.globals.sim_time_seconds;

    // Unserved requests eventually expire rather than pile up.
    world
        .maintenance_requests
        .retain(|r| now - r.created_at <= MAINTENANCE_REQUEST_TTL);

    let candidates: Vec<EntityId> = world
        .entity_ids()
        .filter(|id| world.degradables.contains_key(id))
        .collect();

    for id in candidates {
        let Some(degradable) = world.degradables.get(&id) else {
            continue;
        };
        if degradable.wear < WEAR_REQUEST_THRESHOLD {
            continue;
        }
        if world.maintainer_targets.contains_key(&id) {
            continue; // a maintainer already owns this target
        }

        let mut priority_score = degradable.wear;
        if matches!(
            world.structure_kinds.get(&id),
            Some(StructureKind::Fabricator | StructureKind::CoreCompiler)
        ) {
            priority_score *= 2.0;
        }
        if world.producers.get(&id).map_or(false, |p| p.active) {
            priority_score *= 1.5;
        }

        match world
            .maintenance_requests
            .iter_mut()
            .find(|r| r.request_entity == id)
        {
            Some(existing) => {
                // Requests younger than the debounce window are left
                // untouched; older ones get their priority refreshed in
                // place. created_at keeps the original age so the TTL
                // still applies.
                if now - existing.created_at >= MAINTENANCE_REQUEST_DEBOUNCE {
                    existing.priority_score = priority_score;
                }
            }
            None => {
                world.maintenance_requests.push(MaintenanceRequest {
                    request_entity: id,
                    priority_score,
                    created_at: now,
                });
                tracing::debug!(target = ?id, priority_score, "maintenance requested");
            }
        }
    }

    world
        .maintenance_requests
        .sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
}

//! Degradation - wear accrual on active producers
//!
//! Wear climbs while a machine runs, faster when the factory runs hot or
//! overclocked, and only ever resets through maintenance. Efficiency is
//! a pure read model over the wear value.

use crate::core::config::HEAT_WEAR_KNEE;
use crate::core::types::EntityId;
use crate::ecs::world::World;

/// Accrue wear on every degradable entity with an active producer
pub fn degradation_system(world: &mut World, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    let heat_ratio = world.globals.heat_ratio();
    let heat_multiplier = 1.0 + ((heat_ratio - HEAT_WEAR_KNEE) * 5.0).max(0.0);
    let overclock = world.globals.overclock_enabled;

    let ids: Vec<EntityId> = world
        .entity_ids()
        .filter(|id| world.degradables.contains_key(id))
        .collect();

    for id in ids {
        let active = world.producers.get(&id).map_or(false, |p| p.active);
        if !active {
            continue;
        }
        let overclock_multiplier = if overclock && world.overclockables.contains_key(&id) {
            2.0
        } else {
            1.0
        };
        if let Some(degradable) = world.degradables.get_mut(&id) {
            degradable.wear = (degradable.wear
                + degradable.wear_rate * dt * heat_multiplier * overclock_multiplier)
                .clamp(0.0, 1.0);
        }
    }
}

/// Output multiplier for a worn machine: `1 - wear * max_penalty`
///
/// Entities without a `Degradable` run at full efficiency.
pub fn degradation_efficiency_multiplier(world: &World, id: EntityId) -> f32 {
    world
        .degradables
        .get(&id)
        .map_or(1.0, |d| 1.0 - d.wear * d.max_efficiency_penalty)
}

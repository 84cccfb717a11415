//! Production - advances active producers and keeps the thermal/power
//! ledger current
//!
//! A producer only makes progress while its inventory holds a full set
//! of recipe inputs; inputs are consumed and outputs emitted when the
//! batch completes. Batch speed is scaled by the wear-efficiency
//! multiplier, so degraded machines visibly slow down.

use crate::core::types::EntityId;
use crate::ecs::world::World;
use crate::simulation::degradation::degradation_efficiency_multiplier;

/// Advance all active producers by `dt` seconds
pub fn production_system(world: &mut World, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    let producer_ids: Vec<EntityId> = world
        .entity_ids()
        .filter(|id| world.producers.contains_key(id))
        .collect();

    let mut heat_delta = 0.0;
    let mut power_demand = 0.0;

    for id in producer_ids {
        let efficiency = degradation_efficiency_multiplier(world, id);
        let Some(mut producer) = world.producers.remove(&id) else {
            continue;
        };
        if !producer.active {
            world.producers.insert(id, producer);
            continue;
        }

        if let Some(link) = world.power_links.get(&id) {
            power_demand += link.draw_kw;
        }
        if let Some(source) = world.heat_sources.get(&id) {
            heat_delta += source.heat_per_second * dt;
        }

        let has_inputs = world.inventories.get(&id).map_or(
            producer.recipe.inputs.is_empty(),
            |inv| {
                producer
                    .recipe
                    .inputs
                    .iter()
                    .all(|&(resource, amount)| inv.amount(resource) >= amount)
            },
        );

        if has_inputs && producer.recipe.batch_time_seconds > 0.0 {
            producer.progress +=
                producer.base_rate * efficiency * dt / producer.recipe.batch_time_seconds;

            if producer.progress >= 1.0 {
                producer.progress = 0.0;
                if let Some(inv) = world.inventories.get_mut(&id) {
                    for &(resource, amount) in &producer.recipe.inputs {
                        inv.remove(resource, amount);
                    }
                    for &(resource, amount) in &producer.recipe.outputs {
                        inv.add(resource, amount);
                    }
                }
                if let Some(emitter) = world.compile_emitters.get(&id) {
                    tracing::debug!(
                        producer = ?id,
                        compute = emitter.compute_per_batch,
                        "batch compiled"
                    );
                } else {
                    tracing::debug!(producer = ?id, "batch completed");
                }
            }
        }

        world.producers.insert(id, producer);
    }

    // Heat sinks dissipate unconditionally; heat never goes negative.
    // Summed in entity order so replays accumulate identically.
    for id in world.entity_ids() {
        if let Some(sink) = world.heat_sinks.get(&id) {
            heat_delta -= sink.dissipation_per_second * dt;
        }
    }
    world.globals.heat_current = (world.globals.heat_current + heat_delta).max(0.0);
    world.globals.power_demand = power_demand;
}

//! Recycling - tears an entity down and refunds part of its build cost
//!
//! The refund lands in a sink inventory: the first Fabricator when the
//! component asks for one, otherwise the Core. Each precondition failure
//! is a distinct error; the entity is untouched unless recycling fully
//! succeeds.

use crate::core::error::RecycleError;
use crate::core::types::{EntityId, ResourceType, StructureKind};
use crate::ecs::world::World;

/// Resources credited to a sink by a successful recycle
#[derive(Debug, Clone, PartialEq)]
pub struct Refund {
    pub sink: EntityId,
    pub resources: Vec<(ResourceType, f32)>,
}

/// Destroy `id`, crediting `floor(build_cost * refund_fraction)` per
/// resource to the refund sink
pub fn recycle_entity(world: &mut World, id: EntityId) -> Result<Refund, RecycleError> {
    let recyclable = world
        .recyclables
        .get(&id)
        .cloned()
        .ok_or(RecycleError::NotRecyclable(id))?;

    let sink_kind = if recyclable.refund_to_fabricator {
        StructureKind::Fabricator
    } else {
        StructureKind::Core
    };
    let sink = world
        .entity_ids()
        .find(|&e| e != id && world.structure_kinds.get(&e) == Some(&sink_kind))
        .ok_or(RecycleError::NoRefundSink(id))?;
    if !world.inventories.contains_key(&sink) {
        return Err(RecycleError::SinkHasNoInventory(sink));
    }

    let resources: Vec<(ResourceType, f32)> = recyclable
        .build_cost
        .iter()
        .map(|&(resource, cost)| (resource, (cost * recyclable.refund_fraction).floor()))
        .collect();

    if let Some(inventory) = world.inventories.get_mut(&sink) {
        for &(resource, amount) in &resources {
            inventory.add(resource, amount);
        }
    }

    world.despawn(id);
    tracing::debug!(recycled = ?id, ?sink, "entity recycled");
    Ok(Refund { sink, resources })
}

//! Demand planning - turns low producer inventories into prioritized
//! fetch requests
//!
//! The queue is rebuilt from scratch every pass; stale requests never
//! survive a tick boundary. Priority rules are mutually exclusive and
//! evaluated in precedence order: thermal emergency, overclock surge,
//! normal.

use crate::core::config::{
    HEAT_CRITICAL_RATIO, LOW_WATERMARK_FACTOR, PRIORITY_HEAT_CRITICAL, PRIORITY_NORMAL,
    PRIORITY_OVERCLOCK_CRITICAL, PRIORITY_OVERCLOCK_PENALIZED, RESTOCK_FACTOR,
};
use crate::core::types::{ResourceType, StructureKind};
use crate::ecs::world::{TaskRequest, World};

/// Rebuild `task_requests` from every active producer's inventory levels
pub fn demand_planning_system(world: &mut World, _dt: f32) {
    let now = world.globals.sim_time_seconds;
    let heat_critical = world.globals.heat_ratio() > HEAT_CRITICAL_RATIO;
    let overclock = world.globals.overclock_enabled;

    let mut requests: Vec<TaskRequest> = Vec::new();

    for id in world.entity_ids() {
        let Some(producer) = world.producers.get(&id) else {
            continue;
        };
        if !producer.active {
            continue;
        }
        let Some(inventory) = world.inventories.get(&id) else {
            continue;
        };
        let kind = world.structure_kinds.get(&id).copied();

        for &(resource, needed) in &producer.recipe.inputs {
            let have = inventory.amount(resource);
            if have >= needed * LOW_WATERMARK_FACTOR {
                continue;
            }

            let priority_score = if heat_critical
                && kind == Some(StructureKind::Cooler)
                && resource == ResourceType::Coolant
            {
                PRIORITY_HEAT_CRITICAL
            } else if overclock {
                if matches!(
                    kind,
                    Some(StructureKind::Fabricator | StructureKind::CoreCompiler)
                ) {
                    PRIORITY_OVERCLOCK_CRITICAL
                } else {
                    PRIORITY_OVERCLOCK_PENALIZED
                }
            } else {
                PRIORITY_NORMAL
            };

            requests.push(TaskRequest {
                target_entity: id,
                resource,
                amount: needed * RESTOCK_FACTOR - have,
                priority_score,
                created_at: now,
            });
        }
    }

    // Stable sort keeps entity order within a priority band.
    requests.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    world.task_requests = requests;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::ecs::components::{Producer, Recipe};

    fn producer(inputs: Vec<(ResourceType, f32)>) -> Producer {
        Producer {
            recipe: Recipe {
                inputs,
                outputs: vec![(ResourceType::Plate, 1.0)],
                batch_time_seconds: 10.0,
            },
            progress: 0.0,
            base_rate: 1.0,
            tier: 1,
            active: true,
        }
    }

    fn spawn_producer(
        world: &mut World,
        kind: StructureKind,
        inputs: Vec<(ResourceType, f32)>,
    ) -> crate::core::types::EntityId {
        let id = world.spawn_structure(kind, Vec2::default(), 100.0);
        world.producers.insert(id, producer(inputs));
        id
    }

    #[test]
    fn test_low_inventory_emits_restock_request() {
        let mut world = World::new(4, 4);
        let id = spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 2.0)]);
        world
            .inventories
            .get_mut(&id)
            .unwrap()
            .add(ResourceType::Ore, 3.0);

        demand_planning_system(&mut world, 1.0);
        assert_eq!(world.task_requests.len(), 1);
        let req = &world.task_requests[0];
        assert_eq!(req.target_entity, id);
        assert_eq!(req.resource, ResourceType::Ore);
        // needed*5 - have = 10 - 3
        assert_eq!(req.amount, 7.0);
        assert_eq!(req.priority_score, PRIORITY_NORMAL);
    }

    #[test]
    fn test_well_stocked_producer_is_silent() {
        let mut world = World::new(4, 4);
        let id = spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 2.0)]);
        world
            .inventories
            .get_mut(&id)
            .unwrap()
            .add(ResourceType::Ore, 4.0); // exactly needed*2

        demand_planning_system(&mut world, 1.0);
        assert!(world.task_requests.is_empty());
    }

    #[test]
    fn test_inactive_producer_is_skipped() {
        let mut world = World::new(4, 4);
        let id = spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 2.0)]);
        world.producers.get_mut(&id).unwrap().active = false;

        demand_planning_system(&mut world, 1.0);
        assert!(world.task_requests.is_empty());
    }

    #[test]
    fn test_queue_is_rebuilt_not_merged() {
        let mut world = World::new(4, 4);
        let id = spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 2.0)]);
        demand_planning_system(&mut world, 1.0);
        assert_eq!(world.task_requests.len(), 1);

        // Restock; the old request must vanish on the next pass.
        world
            .inventories
            .get_mut(&id)
            .unwrap()
            .add(ResourceType::Ore, 10.0);
        demand_planning_system(&mut world, 1.0);
        assert!(world.task_requests.is_empty());
    }

    #[test]
    fn test_priority_precedence_heat_over_overclock_over_normal() {
        let mut world = World::new(4, 4);
        spawn_producer(&mut world, StructureKind::Extractor, vec![(ResourceType::Plate, 1.0)]);
        spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 1.0)]);
        spawn_producer(&mut world, StructureKind::Cooler, vec![(ResourceType::Coolant, 1.0)]);

        world.globals.overclock_enabled = true;
        world.globals.heat_current = 95.0; // ratio 0.95 > 0.9

        demand_planning_system(&mut world, 1.0);
        let scores: Vec<f32> = world
            .task_requests
            .iter()
            .map(|r| r.priority_score)
            .collect();
        assert_eq!(
            scores,
            vec![
                PRIORITY_HEAT_CRITICAL,
                PRIORITY_OVERCLOCK_CRITICAL,
                PRIORITY_OVERCLOCK_PENALIZED
            ]
        );
    }

    #[test]
    fn test_output_is_sorted_descending() {
        let mut world = World::new(4, 4);
        for _ in 0..3 {
            spawn_producer(&mut world, StructureKind::Extractor, vec![(ResourceType::Plate, 1.0)]);
        }
        spawn_producer(&mut world, StructureKind::Fabricator, vec![(ResourceType::Ore, 1.0)]);
        world.globals.overclock_enabled = true;

        demand_planning_system(&mut world, 1.0);
        for pair in world.task_requests.windows(2) {
            assert!(pair[0].priority_score >= pair[1].priority_score);
        }
    }
}

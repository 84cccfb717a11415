//! ECS World - owns every component table, the globals, and the queues
//!
//! Components are sparse `AHashMap` tables keyed by `EntityId`; presence
//! in a table is the only "type" information there is. Systems never
//! iterate the maps directly; they walk `entity_ids()`, which yields
//! ids in insertion order, so two runs with identical inputs produce
//! identical call sequences and identical final state.

use ahash::AHashMap;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{
    DroneRole, DroneState, EntityId, ResourceType, StructureKind, Unlockable, Vec2,
};
use crate::ecs::components::{
    CompileEmitter, Degradable, DroneBehavior, DroneBrain, HaulTask, HeatSink, HeatSource,
    Inventory, Overclockable, Path, Position, PowerLink, Producer, Recyclable,
};
use crate::spatial::flow_field::FlowFieldCache;
use crate::spatial::grid::Grid;

/// A prioritized resource-fetch request produced by demand planning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Entity whose inventory is low
    pub target_entity: EntityId,
    pub resource: ResourceType,
    /// Units requested (restock watermark minus current stock)
    pub amount: f32,
    pub priority_score: f32,
    pub created_at: f64,
}

/// A repair job raised by maintenance planning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub request_entity: EntityId,
    pub priority_score: f32,
    pub created_at: f64,
}

/// A finished hauling delivery, kept for scoring and tests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task: HaulTask,
    pub completed_at: f64,
}

/// A timed progression milestone
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Milestone {
    pub time_seconds: f64,
    pub achieved: bool,
}

/// Global scalars shared by every system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Globals {
    pub heat_current: f32,
    pub heat_safe_cap: f32,
    pub power_available: f32,
    pub power_demand: f32,
    pub overclock_enabled: bool,
    pub sim_time_seconds: f64,
    /// Cooperative-routing strength in `[0, 1]`; gates lane emergence
    pub swarm_cognition: f32,
    /// Feature flags in fixed trigger order
    pub unlocks: Vec<(Unlockable, bool)>,
    pub milestones: Vec<Milestone>,
}

impl Globals {
    pub fn heat_ratio(&self) -> f32 {
        if self.heat_safe_cap > 0.0 {
            self.heat_current / self.heat_safe_cap
        } else {
            0.0
        }
    }

    pub fn is_unlocked(&self, feature: Unlockable) -> bool {
        self.unlocks
            .iter()
            .any(|&(f, unlocked)| f == feature && unlocked)
    }
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            heat_current: 0.0,
            heat_safe_cap: 100.0,
            power_available: 0.0,
            power_demand: 0.0,
            overclock_enabled: false,
            sim_time_seconds: 0.0,
            swarm_cognition: 0.0,
            unlocks: crate::simulation::unlocks::initial_unlocks(),
            milestones: Vec::new(),
        }
    }
}

/// The simulation world containing all entities
pub struct World {
    next_entity: u64,
    /// Live ids in allocation order; the deterministic iteration surface
    entities: Vec<EntityId>,

    // Component tables (sparse; absence means "not applicable")
    pub positions: AHashMap<EntityId, Position>,
    pub inventories: AHashMap<EntityId, Inventory>,
    pub producers: AHashMap<EntityId, Producer>,
    pub drone_brains: AHashMap<EntityId, DroneBrain>,
    pub paths: AHashMap<EntityId, Path>,
    pub degradables: AHashMap<EntityId, Degradable>,
    pub recyclables: AHashMap<EntityId, Recyclable>,
    pub heat_sources: AHashMap<EntityId, HeatSource>,
    pub heat_sinks: AHashMap<EntityId, HeatSink>,
    pub power_links: AHashMap<EntityId, PowerLink>,
    pub overclockables: AHashMap<EntityId, Overclockable>,
    pub compile_emitters: AHashMap<EntityId, CompileEmitter>,
    /// Typed replacement for the old `entityType` string table
    pub structure_kinds: AHashMap<EntityId, StructureKind>,

    pub globals: Globals,
    pub config: SimulationConfig,

    pub grid: Grid,
    pub flow_fields: FlowFieldCache,

    // Queues, sorted descending by priority, consumed from the front
    pub task_requests: Vec<TaskRequest>,
    pub maintenance_requests: Vec<MaintenanceRequest>,
    pub completed_tasks: Vec<CompletedTask>,

    // Reservation maps: target entity -> assignee drone. Cooperative
    // locks; correctness relies on single-threaded system order.
    pub builder_targets: AHashMap<EntityId, EntityId>,
    pub maintainer_targets: AHashMap<EntityId, EntityId>,

    /// Seeded RNG for the sampling-based flow-field invalidation
    pub rng: ChaCha8Rng,
}

impl World {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_seed(width, height, 0)
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Self {
        Self {
            next_entity: 0,
            entities: Vec::new(),
            positions: AHashMap::new(),
            inventories: AHashMap::new(),
            producers: AHashMap::new(),
            drone_brains: AHashMap::new(),
            paths: AHashMap::new(),
            degradables: AHashMap::new(),
            recyclables: AHashMap::new(),
            heat_sources: AHashMap::new(),
            heat_sinks: AHashMap::new(),
            power_links: AHashMap::new(),
            overclockables: AHashMap::new(),
            compile_emitters: AHashMap::new(),
            structure_kinds: AHashMap::new(),
            globals: Globals::default(),
            config: SimulationConfig::default(),
            grid: Grid::new(width, height),
            flow_fields: FlowFieldCache::new(),
            task_requests: Vec::new(),
            maintenance_requests: Vec::new(),
            completed_tasks: Vec::new(),
            builder_targets: AHashMap::new(),
            maintainer_targets: AHashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Allocate the next entity id. Ids are monotonic and never reused.
    pub fn allocate_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.push(id);
        id
    }

    /// Live ids in allocation order
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn drone_count(&self) -> usize {
        self.drone_brains.len()
    }

    /// Structures are entities with a kind; drones are not structures
    pub fn building_count(&self) -> usize {
        self.structure_kinds.len()
    }

    /// First entity of the given kind, in allocation order
    pub fn find_structure(&self, kind: StructureKind) -> Option<EntityId> {
        self.entities
            .iter()
            .copied()
            .find(|id| self.structure_kinds.get(id) == Some(&kind))
    }

    /// Spawn a structure with a position, kind, and empty inventory
    pub fn spawn_structure(&mut self, kind: StructureKind, pos: Vec2, capacity: f32) -> EntityId {
        let id = self.allocate_entity();
        self.positions.insert(id, Position { x: pos.x, y: pos.y });
        self.structure_kinds.insert(id, kind);
        self.inventories.insert(id, Inventory::new(capacity));
        id
    }

    /// Spawn a drone with a position and an idle brain
    pub fn spawn_drone(&mut self, role: DroneRole, pos: Vec2, behavior: DroneBehavior) -> EntityId {
        let id = self.allocate_entity();
        self.positions.insert(id, Position { x: pos.x, y: pos.y });
        self.drone_brains.insert(id, DroneBrain::new(role, behavior));
        id
    }

    /// Remove an entity from every table, both queues, and any lingering
    /// reservation. Ids are never reallocated afterwards.
    pub fn despawn(&mut self, id: EntityId) {
        self.positions.remove(&id);
        self.inventories.remove(&id);
        self.producers.remove(&id);
        self.drone_brains.remove(&id);
        self.paths.remove(&id);
        self.degradables.remove(&id);
        self.recyclables.remove(&id);
        self.heat_sources.remove(&id);
        self.heat_sinks.remove(&id);
        self.power_links.remove(&id);
        self.overclockables.remove(&id);
        self.compile_emitters.remove(&id);
        self.structure_kinds.remove(&id);
        self.task_requests.retain(|r| r.target_entity != id);
        self.maintenance_requests.retain(|r| r.request_entity != id);
        self.builder_targets
            .retain(|target, drone| *target != id && *drone != id);
        self.maintainer_targets
            .retain(|target, drone| *target != id && *drone != id);
        self.entities.retain(|&e| e != id);
    }

    /// Is this drone currently idle? Soft-skips non-drones.
    pub fn is_idle_drone(&self, id: EntityId) -> bool {
        self.drone_brains
            .get(&id)
            .map_or(false, |b| b.state == DroneState::Idle)
    }
}

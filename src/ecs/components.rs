//! Component value types
//!
//! Each of these lives in a sparse table on the World keyed by
//! `EntityId`. Absence of a component is semantically meaningful
//! ("this entity does not participate"), never an error.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{DroneRole, DroneState, EntityId, GridPos, ResourceType};

/// World-grid position
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Resource storage with a shared capacity across all contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: f32,
    pub contents: AHashMap<ResourceType, f32>,
}

impl Inventory {
    pub fn new(capacity: f32) -> Self {
        Self {
            capacity,
            contents: AHashMap::new(),
        }
    }

    pub fn amount(&self, resource: ResourceType) -> f32 {
        self.contents.get(&resource).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f32 {
        self.contents.values().sum()
    }

    /// Add up to `amount`, limited by remaining capacity. Returns the
    /// amount actually stored.
    pub fn add(&mut self, resource: ResourceType, amount: f32) -> f32 {
        let space = (self.capacity - self.total()).max(0.0);
        let added = amount.min(space);
        if added > 0.0 {
            *self.contents.entry(resource).or_insert(0.0) += added;
        }
        added
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    pub fn remove(&mut self, resource: ResourceType, amount: f32) -> f32 {
        let have = self.amount(resource);
        let removed = amount.min(have);
        if removed > 0.0 {
            if let Some(entry) = self.contents.get_mut(&resource) {
                *entry -= removed;
                if *entry <= 0.0 {
                    self.contents.remove(&resource);
                }
            }
        }
        removed
    }
}

/// A production recipe: inputs consumed per batch, outputs emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub inputs: Vec<(ResourceType, f32)>,
    pub outputs: Vec<(ResourceType, f32)>,
    pub batch_time_seconds: f32,
}

/// Active production state for a structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    pub recipe: Recipe,
    /// Batch progress in `[0, 1)`
    pub progress: f32,
    pub base_rate: f32,
    pub tier: u8,
    /// Inactive producers neither produce, demand inputs, nor wear out.
    /// Builders flip this on when construction completes.
    pub active: bool,
}

/// Per-drone routing and targeting preferences
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DroneBehavior {
    /// Weight congested tiles in pathfinding
    pub congestion_avoidance: bool,
    /// Fetch critical inputs before inventories run dry
    pub prefetch_critical_inputs: bool,
    /// How far from its idle anchor a builder will take jobs
    pub build_radius: f32,
    /// Reserve build/maintenance targets so no two drones pick the same one
    pub avoid_duplicate_ghost_targets: bool,
}

impl Default for DroneBehavior {
    fn default() -> Self {
        Self {
            congestion_avoidance: true,
            prefetch_critical_inputs: false,
            build_radius: 32.0,
            avoid_duplicate_ghost_targets: true,
        }
    }
}

/// A hauling job claimed by a drone: fetch `amount` of `resource` from
/// `source` and deliver it to `destination`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaulTask {
    pub source: EntityId,
    pub destination: EntityId,
    pub resource: ResourceType,
    pub amount: f32,
}

/// Drone mind: role, FSM state, cargo, and current objective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneBrain {
    pub role: DroneRole,
    pub state: DroneState,
    pub cargo: Option<(ResourceType, f32)>,
    pub target_entity: Option<EntityId>,
    pub task: Option<HaulTask>,
    /// Seconds spent on-site for building/maintenance dwell
    pub dwell: f32,
    pub behavior: DroneBehavior,
}

impl DroneBrain {
    pub fn new(role: DroneRole, behavior: DroneBehavior) -> Self {
        Self {
            role,
            state: DroneState::Idle,
            cargo: None,
            target_entity: None,
            task: None,
            dwell: 0.0,
            behavior,
        }
    }
}

/// A grid path being consumed by the movement system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<GridPos>,
    /// Cursor into `nodes`; the node at `idx` is the current waypoint
    pub idx: usize,
}

impl Path {
    pub fn new(nodes: Vec<GridPos>) -> Self {
        Self { nodes, idx: 0 }
    }

    pub fn current_node(&self) -> Option<GridPos> {
        self.nodes.get(self.idx).copied()
    }
}

/// Wear state for producers that degrade under load
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Degradable {
    /// Accumulated damage fraction in `[0, 1]`
    pub wear: f32,
    /// Base wear per second while the producer is active
    pub wear_rate: f32,
    /// Seconds a maintainer must dwell on-site to reset wear
    pub maintenance_time: f32,
    /// Output penalty at full wear: efficiency = 1 - wear * penalty
    pub max_efficiency_penalty: f32,
}

/// Scrap value for entities that can be torn down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recyclable {
    /// Fraction of build cost returned, floored per resource
    pub refund_fraction: f32,
    /// Refund to the first Fabricator if true, else to the Core
    pub refund_to_fabricator: bool,
    pub build_cost: Vec<(ResourceType, f32)>,
}

/// Heat contributed per second while the owning producer is active
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatSource {
    pub heat_per_second: f32,
}

/// Heat removed per second, unconditionally
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatSink {
    pub dissipation_per_second: f32,
}

/// Connection to the power network
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerLink {
    pub draw_kw: f32,
}

/// Marker: this structure doubles its wear rate under overclock
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Overclockable;

/// Compute emitted per completed batch (consumed by the scoring layer)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompileEmitter {
    pub compute_per_batch: f32,
}

//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The fixed cost-model constants
//! are `pub const` so tests can assert against them directly; per-run
//! tunables live on `SimulationConfig`.

/// Cost of an uncongested, un-laned tile
pub const BASE_WALK_COST: f32 = 1.0;

/// Maximum congestion a tile can accumulate above the base cost
///
/// Tile costs are clamped to `BASE_WALK_COST + MAX_CONGESTION` at the top.
pub const MAX_CONGESTION: f32 = 5.0;

/// Floor for tiles cheapened by lane reinforcement
///
/// Established lanes never drop below this, so pathfinding keeps a bounded
/// preference for them rather than an absolute one.
pub const MIN_LANE_COST: f32 = 0.8;

/// Fraction of a tile's excess cost removed per second as congestion
/// decays back toward base
pub const CONGESTION_DECAY: f32 = 0.5;

/// Fraction of a lane tile's discount removed per second as it erodes
/// back toward base cost
///
/// Deliberately much slower than congestion decay: lanes persist, spikes
/// don't. Must stay small enough that active reinforcement
/// (`LANE_REINFORCEMENT`) outruns it, or lanes can never form.
pub const LANE_DECAY: f32 = 0.1;

/// Cost added per second to the tile under each drone
pub const CONGESTION_INCREASE: f32 = 0.2;

/// Cost removed per second from a drone's current path node, scaled by
/// `swarm_cognition`
pub const LANE_REINFORCEMENT: f32 = 0.05;

/// Per-tick probability that all cached flow fields are marked dirty
///
/// Sampling-based invalidation: cheap, and statistically keeps fields
/// fresh under shifting congestion. Drawn from the World's seeded RNG so
/// runs are reproducible.
pub const FLOW_FIELD_INVALIDATION_CHANCE: f64 = 0.1;

/// Priority for coolant requests during a thermal emergency
pub const PRIORITY_HEAT_CRITICAL: f32 = 1000.0;

/// Priority for Fabricator/CoreCompiler inputs while overclock is enabled
pub const PRIORITY_OVERCLOCK_CRITICAL: f32 = 100.0;

/// Baseline request priority
pub const PRIORITY_NORMAL: f32 = 1.0;

/// Priority for all non-critical producers while overclock is enabled
///
/// Effectively starves them for the duration of the surge.
pub const PRIORITY_OVERCLOCK_PENALIZED: f32 = 0.01;

/// Heat ratio above which coolant demand becomes an emergency
pub const HEAT_CRITICAL_RATIO: f32 = 0.9;

/// Heat ratio above which degradation accelerates
pub const HEAT_WEAR_KNEE: f32 = 0.8;

/// Wear level at which a maintenance request is raised
pub const WEAR_REQUEST_THRESHOLD: f32 = 0.3;

/// Seconds before an unserved maintenance request is dropped
pub const MAINTENANCE_REQUEST_TTL: f64 = 60.0;

/// Seconds within which a maintenance request is refreshed rather than
/// re-created
pub const MAINTENANCE_REQUEST_DEBOUNCE: f64 = 30.0;

/// Completed-task records kept for scoring; older entries are evicted
/// front-first so a long-running sim does not grow without bound
pub const COMPLETED_TASK_HISTORY: usize = 256;

/// Inventory is considered low below `needed * LOW_WATERMARK_FACTOR`
pub const LOW_WATERMARK_FACTOR: f32 = 2.0;

/// A fetch request restocks up to `needed * RESTOCK_FACTOR`
pub const RESTOCK_FACTOR: f32 = 5.0;

/// Per-run tunables for the scheduler systems
///
/// These values have been tuned to produce good emergent behavior at the
/// default tick rate. Changing them affects pacing, not correctness.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Drone travel speed in tiles per second
    ///
    /// At 1.0, a hauler crosses a 5-tile span in 5 seconds of sim time.
    pub drone_speed: f32,

    /// Distance within which a drone can interact with its target
    ///
    /// Used for pickup/dropoff, construction, and maintenance dwell.
    pub interaction_range: f32,

    /// Congestion weight applied to A* edge costs for drones with
    /// `congestion_avoidance` enabled
    ///
    /// Higher values make congested tiles proportionally more expensive,
    /// pushing traffic onto lanes and around hot spots.
    pub congestion_weight: f32,

    /// Seconds of on-site work for a builder to activate a producer
    pub build_time_seconds: f32,

    /// Default cargo capacity for spawned hauler drones
    pub hauler_capacity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            drone_speed: 1.0,
            interaction_range: 0.6,
            congestion_weight: 0.5,
            build_time_seconds: 5.0,
            hauler_capacity: 10.0,
        }
    }
}

//! System pipeline runner
//!
//! Executes a fixed, named list of systems against the World once per
//! tick, in a documented order, then advances simulated time. The order
//! is published as `DEFAULT_SYSTEM_ORDER` so tests can assert the exact
//! call sequence, and a record-only mode logs system ids without running
//! them, which makes the ordering directly observable.

use crate::ecs::world::World;
use crate::simulation::assignment::drone_assignment_system;
use crate::simulation::degradation::degradation_system;
use crate::simulation::demand::demand_planning_system;
use crate::simulation::maintenance::maintenance_planning_system;
use crate::simulation::movement::movement_system;
use crate::simulation::production::production_system;
use crate::simulation::routing::pathfinding_system;
use crate::simulation::unlocks::unlock_system;
use crate::spatial::congestion::congestion_system;

/// Anything that can be slotted into the pipeline's ordered list
pub trait System {
    fn id(&self) -> &'static str;
    fn update(&mut self, world: &mut World, dt: f32);
}

/// The documented execution order of the standard pipeline
pub const DEFAULT_SYSTEM_ORDER: [&str; 9] = [
    "demand_planning",
    "drone_assignment",
    "pathfinding",
    "movement",
    "congestion",
    "production",
    "degradation",
    "maintenance_planning",
    "unlock_progression",
];

/// Per-tick options
#[derive(Debug, Clone, Copy)]
pub struct TickOptions {
    /// Treat negative `dt` as 0 (default). When false, negative values
    /// pass through unchanged.
    pub clamp_dt_to_zero: bool,
    /// Log system ids without executing them or advancing time
    pub record_only: bool,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            clamp_dt_to_zero: true,
            record_only: false,
        }
    }
}

/// Normalize a frame delta: non-finite becomes 0, negative is clamped
/// per the options
pub fn normalize_dt(dt: f32, options: &TickOptions) -> f32 {
    if !dt.is_finite() {
        0.0
    } else if dt < 0.0 && options.clamp_dt_to_zero {
        0.0
    } else {
        dt
    }
}

struct FnSystem {
    id: &'static str,
    run: fn(&mut World, f32),
}

impl System for FnSystem {
    fn id(&self) -> &'static str {
        self.id
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        (self.run)(world, dt);
    }
}

/// Ordered list of systems plus the call log record-only ticks append to
pub struct Pipeline {
    systems: Vec<Box<dyn System>>,
    /// System ids appended by record-only ticks. Normal ticks leave it
    /// untouched so a long-running sim does not accumulate one entry per
    /// system per frame.
    pub call_log: Vec<&'static str>,
}

impl Pipeline {
    /// Empty pipeline; systems run in insertion order
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            call_log: Vec::new(),
        }
    }

    /// The standard pipeline in `DEFAULT_SYSTEM_ORDER`
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        let entries: [(&'static str, fn(&mut World, f32)); 9] = [
            ("demand_planning", demand_planning_system),
            ("drone_assignment", drone_assignment_system),
            ("pathfinding", pathfinding_system),
            ("movement", movement_system),
            ("congestion", congestion_system),
            ("production", production_system),
            ("degradation", degradation_system),
            ("maintenance_planning", maintenance_planning_system),
            ("unlock_progression", unlock_system),
        ];
        for (id, run) in entries {
            pipeline.push(Box::new(FnSystem { id, run }));
        }
        pipeline
    }

    /// Append a system to the end of the run order
    pub fn push(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    pub fn system_ids(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.id()).collect()
    }

    /// Run one tick with default options
    pub fn tick(&mut self, world: &mut World, dt: f32) {
        self.tick_with(world, dt, &TickOptions::default());
    }

    /// Run one tick: normalize `dt`, run every system in order, then
    /// advance `sim_time_seconds`. Record-only ticks log ids instead of
    /// executing.
    pub fn tick_with(&mut self, world: &mut World, dt: f32, options: &TickOptions) {
        let dt = normalize_dt(dt, options);

        let systems = &mut self.systems;
        let call_log = &mut self.call_log;
        for system in systems.iter_mut() {
            if options.record_only {
                call_log.push(system.id());
            } else {
                system.update(world, dt);
            }
        }

        if !options.record_only {
            world.globals.sim_time_seconds += f64::from(dt);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

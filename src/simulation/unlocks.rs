//! Unlock and progression tracking
//!
//! A fixed, ordered list of triggers, each a pure predicate over a small
//! snapshot of World state. Flags flip exactly once; already-unlocked
//! features are skipped. Milestones are time-gated and marked achieved
//! in place. Notification concerns live outside the core.

use crate::core::types::Unlockable;
use crate::ecs::world::World;

/// Snapshot of the state unlock predicates are allowed to read
#[derive(Debug, Clone, Copy)]
pub struct UnlockContext {
    pub drone_count: usize,
    pub building_count: usize,
    pub sim_time_seconds: f64,
    pub heat_ratio: f32,
}

type UnlockPredicate = fn(&UnlockContext) -> bool;

/// Trigger list in evaluation (and unlock-flag) order
pub const UNLOCK_TRIGGERS: &[(Unlockable, UnlockPredicate)] = &[
    (Unlockable::Recycling, |ctx| ctx.building_count >= 3),
    (Unlockable::Overclocking, |ctx| ctx.building_count >= 6),
    (Unlockable::CoolantLoop, |ctx| ctx.heat_ratio >= 0.6),
    (Unlockable::SwarmRouting, |ctx| ctx.drone_count >= 8),
    (Unlockable::CoreCompiler, |ctx| ctx.sim_time_seconds >= 240.0),
];

/// All features locked, in trigger order
pub fn initial_unlocks() -> Vec<(Unlockable, bool)> {
    UNLOCK_TRIGGERS
        .iter()
        .map(|&(feature, _)| (feature, false))
        .collect()
}

/// Evaluate unlock triggers and milestones against current World state
pub fn unlock_system(world: &mut World, _dt: f32) {
    let ctx = UnlockContext {
        drone_count: world.drone_count(),
        building_count: world.building_count(),
        sim_time_seconds: world.globals.sim_time_seconds,
        heat_ratio: world.globals.heat_ratio(),
    };

    for &(feature, predicate) in UNLOCK_TRIGGERS {
        let Some(slot) = world
            .globals
            .unlocks
            .iter_mut()
            .find(|(f, _)| *f == feature)
        else {
            continue;
        };
        if !slot.1 && predicate(&ctx) {
            slot.1 = true;
            tracing::debug!(?feature, "feature unlocked");
        }
    }

    let now = world.globals.sim_time_seconds;
    for milestone in &mut world.globals.milestones {
        if !milestone.achieved && now >= milestone.time_seconds {
            milestone.achieved = true;
            tracing::debug!(at = milestone.time_seconds, "milestone achieved");
        }
    }
}

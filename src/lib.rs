//! Swarm Foundry - entity-component logistics scheduler
//!
//! A single-threaded, deterministic simulation core for an automated
//! factory of hauler, builder, and maintainer drones. The World owns
//! sparse component tables keyed by entity id; a fixed-order pipeline of
//! systems mutates it once per tick. Pathfinding runs A* over a
//! congestion-weighted grid, with cached Dijkstra flow fields for shared
//! destinations, an emergent lane model, priority-arbitrated demand
//! planning, and reservation-based drone coordination.

pub mod core;
pub mod ecs;
pub mod simulation;
pub mod spatial;

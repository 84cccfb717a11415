pub mod assignment;
pub mod degradation;
pub mod demand;
pub mod maintenance;
pub mod movement;
pub mod pipeline;
pub mod production;
pub mod recycling;
pub mod routing;
pub mod unlocks;

pub use pipeline::{Pipeline, System, TickOptions, DEFAULT_SYSTEM_ORDER};
pub use recycling::{recycle_entity, Refund};

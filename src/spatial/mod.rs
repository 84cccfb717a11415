pub mod congestion;
pub mod flow_field;
pub mod grid;
pub mod pathfinding;

pub mod components;
pub mod world;

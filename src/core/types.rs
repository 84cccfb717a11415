//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for entities
///
/// Allocated monotonically by the World and never reused within a run.
/// "Type" information lives entirely in which component tables carry
/// this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Closed set of resources moved by haulers and consumed by producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Ore,
    Plate,
    Circuit,
    Coolant,
    Compute,
    Scrap,
}

/// Structure kinds, replacing the dynamic `entityType` string switches
///
/// Priority multipliers and refund-sink selection key off these arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Core,
    Fabricator,
    CoreCompiler,
    Extractor,
    Cooler,
    Radiator,
    Conduit,
}

/// Drone occupation, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneRole {
    Hauler,
    Builder,
    Maintainer,
}

/// Drone FSM state, driven by assignment and movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneState {
    Idle,
    ToPickup,
    ToDropoff,
    Building,
    Maintaining,
}

/// Features gated behind progression triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unlockable {
    Recycling,
    Overclocking,
    CoolantLoop,
    SwarmRouting,
    CoreCompiler,
}

/// 2D position in world-grid coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero if near-zero length
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 1e-6 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::default()
        }
    }
}

/// Integer grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Nearest cell to a world position
    pub fn round_from(pos: Vec2) -> Self {
        Self::new(pos.x.round() as i32, pos.y.round() as i32)
    }

    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_from_rounds_to_nearest_cell() {
        assert_eq!(GridPos::round_from(Vec2::new(1.4, 2.6)), GridPos::new(1, 3));
        assert_eq!(GridPos::round_from(Vec2::new(-0.4, 0.0)), GridPos::new(0, 0));
    }

    #[test]
    fn test_normalized_zero_vector_stays_zero() {
        let v = Vec2::default().normalized();
        assert_eq!(v, Vec2::default());
    }

    #[test]
    fn test_normalized_is_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}

//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};
use starlane_logic::geometry::Vec2;
use starlane_logic::universe::SectorId;

/// Position and heading in the owning sector's plane.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    /// Heading in radians.
    pub rotation: f32,
}

impl Transform {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, rotation: 0.0 }
    }
}

/// World units per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn stop(&mut self) {
        self.0 = Vec2::ZERO;
    }
}

/// The sector an entity currently lives in. Exactly one per spatial entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct InSector(pub SectorId);

/// Credits held by a station or ship. Stations may dip below zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet(pub starlane_logic::items::Credits);

/// Reach of a station (docking) or gate (jumping).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InteractionRadius(pub f32);

//! Non-ship world structures: jump gates and combat encounter zones.

use hecs::Entity;
use starlane_logic::geometry::Vec2;
use starlane_logic::universe::SectorId;

/// One end of a jump link. The gate at `destination_gate` points back here.
#[derive(Debug, Clone, Copy)]
pub struct Gate {
    pub destination_sector: SectorId,
    pub destination_gate: Entity,
}

/// Lock zone created when an attacker closes to weapon range.
///
/// Lives as its own entity (with `InSector`) until one participant dies or
/// the fight breaks down.
#[derive(Debug, Clone)]
pub struct EncounterZone {
    pub center: Vec2,
    pub radius: f32,
    pub participants: Vec<Entity>,
}

//! Player intents - the only way outside code steers the player ship.
//!
//! Intents touch autopilot and docking state and nothing else; the systems
//! pick the changes up on the next tick.

use hecs::{Entity, World};
use thiserror::Error;

use crate::components::{Autopilot, AutopilotState, Docked, InSector};
use crate::systems::{dock, undock, DockError};
use starlane_logic::geometry::Vec2;
use starlane_logic::pathfinding::PathTable;
use starlane_logic::universe::SectorId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Fly to a point in the current sector.
    SetManualTarget { x: f32, y: f32 },
    /// Fly through gates to another sector.
    SetDestination { sector: SectorId },
    Dock { station: Entity },
    Undock,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntentError {
    #[error("no player ship")]
    NoPlayer,
    #[error("player ship is docked")]
    Docked,
    #[error("player ship is not docked")]
    NotDocked,
    #[error("no route from {from} to {to}")]
    NoRoute { from: SectorId, to: SectorId },
    #[error(transparent)]
    Dock(#[from] DockError),
}

/// Apply `intent` to the player ship.
pub fn apply_intent(
    world: &mut World,
    paths: &PathTable,
    player: Entity,
    intent: Intent,
) -> Result<(), IntentError> {
    if !world.contains(player) {
        return Err(IntentError::NoPlayer);
    }
    let docked = world.get::<&Docked>(player).is_ok();

    match intent {
        Intent::SetManualTarget { x, y } => {
            if docked {
                return Err(IntentError::Docked);
            }
            let mut autopilot = autopilot_mut(world, player)?;
            autopilot.path_queue.clear();
            autopilot.target = Some(Vec2::new(x, y));
            autopilot.state = AutopilotState::Aligning;
        }
        Intent::SetDestination { sector } => {
            if docked {
                return Err(IntentError::Docked);
            }
            let current = world.get::<&InSector>(player).map_err(|_| IntentError::NoPlayer)?.0;
            let path = paths
                .find_path(current, sector)
                .ok_or(IntentError::NoRoute { from: current, to: sector })?
                .to_vec();
            log::debug!("Autopilot plotted {} → {} in {} jumps", current, sector, path.len());
            let mut autopilot = autopilot_mut(world, player)?;
            autopilot.disengage();
            autopilot.path_queue.extend(path);
        }
        Intent::Dock { station } => {
            if docked {
                return Err(IntentError::Docked);
            }
            dock(world, player, station)?;
            if let Ok(mut autopilot) = world.get::<&mut Autopilot>(player) {
                autopilot.disengage();
            }
        }
        Intent::Undock => {
            if !undock(world, player) {
                return Err(IntentError::NotDocked);
            }
        }
    }
    Ok(())
}

fn autopilot_mut(
    world: &World,
    player: Entity,
) -> Result<hecs::RefMut<'_, Autopilot>, IntentError> {
    world.get::<&mut Autopilot>(player).map_err(|_| IntentError::NoPlayer)
}

//! Player-facing components driven by intents rather than AI.

use hecs::Entity;
use starlane_logic::geometry::Vec2;
use starlane_logic::universe::SectorId;
use std::collections::VecDeque;

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutopilotState {
    #[default]
    Idle,
    Aligning,
    Thrusting,
    /// Flying away from a just-exited gate before turning back into it.
    ClearingGate,
    Braking,
}

/// Multi-hop navigation for the player ship.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    pub state: AutopilotState,
    /// Sectors still to enter, next first.
    pub path_queue: VecDeque<SectorId>,
    /// Local point being flown to.
    pub target: Option<Vec2>,
}

impl Autopilot {
    pub fn disengage(&mut self) {
        self.state = AutopilotState::Idle;
        self.path_queue.clear();
        self.target = None;
    }
}

/// Station the ship is docked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Docked(pub Entity);

/// Gate the ship last came out of; ignored until the ship moves clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastGate(pub Entity);

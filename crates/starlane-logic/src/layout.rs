//! Spatial layout of a sector: where stations sit on their ring and which
//! cardinal slot each jump gate occupies.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Distance from a sector's centre to each of its gate slots.
pub const SECTOR_SIZE: f32 = 5000.0;

/// Radius of the station ring around a sector's centre.
pub const STATION_RING_RADIUS: f32 = 2500.0;

/// Maximum per-axis jitter applied to a station's ring position.
pub const STATION_JITTER: f32 = 250.0;

/// Gate slot around a sector centre. `+y` points south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Order gates are emitted in once every slot is decided.
    pub const EMIT_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Slot that faces a neighbour offset by `(dx, dy)` on the map.
    pub fn natural(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    /// Position in the clockwise probe ring E, S, W, N.
    fn ring_index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }

    /// Unit offset of the slot from the sector centre.
    pub fn offset(self) -> Vec2 {
        match self {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Result of slotting a sector's gates.
#[derive(Debug, Clone, PartialEq)]
pub struct GateSlots<T> {
    /// Placed gates in N, S, E, W order.
    pub placed: Vec<(Direction, T)>,
    /// Gates that found no free slot.
    pub overflow: Vec<T>,
}

/// Assign each gate request `(payload, dx, dy)` to a cardinal slot.
///
/// A gate first tries the slot facing its neighbour; if taken it tries the
/// slots one step clockwise, one step counter-clockwise, then opposite.
/// Requests are served in order; a fifth gate always overflows.
pub fn assign_gate_slots<T>(requests: Vec<(T, f32, f32)>) -> GateSlots<T> {
    let mut slots: [Option<T>; 4] = [None, None, None, None];
    let mut overflow = Vec::new();

    for (payload, dx, dy) in requests {
        let natural = Direction::natural(dx, dy).ring_index();
        let free = [0usize, 1, 3, 2]
            .iter()
            .map(|off| (natural + off) % 4)
            .find(|&idx| slots[idx].is_none());
        match free {
            Some(idx) => slots[idx] = Some(payload),
            None => overflow.push(payload),
        }
    }

    let mut placed = Vec::new();
    for dir in Direction::EMIT_ORDER {
        if let Some(payload) = slots[dir.ring_index()].take() {
            placed.push((dir, payload));
        }
    }

    GateSlots { placed, overflow }
}

/// World position of a gate in `dir` around `center`.
pub fn gate_position(center: Vec2, dir: Direction) -> Vec2 {
    center + dir.offset() * SECTOR_SIZE
}

/// Position of station `index` of `count` on the ring around `center`.
///
/// `jitter` is a pre-rolled offset, each axis within `±STATION_JITTER`.
pub fn station_ring_position(center: Vec2, index: usize, count: usize, jitter: Vec2) -> Vec2 {
    let count = count.max(1);
    let angle = std::f32::consts::TAU * index as f32 / count as f32;
    center + Vec2::from_angle(angle) * STATION_RING_RADIUS + jitter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_direction() {
        assert_eq!(Direction::natural(10.0, 1.0), Direction::East);
        assert_eq!(Direction::natural(-10.0, 1.0), Direction::West);
        assert_eq!(Direction::natural(1.0, 10.0), Direction::South);
        assert_eq!(Direction::natural(1.0, -10.0), Direction::North);
        // Diagonal ties go vertical.
        assert_eq!(Direction::natural(5.0, 5.0), Direction::South);
    }

    #[test]
    fn test_collision_probes_clockwise_first() {
        // Two eastward neighbours: second goes one step clockwise (south).
        let slots = assign_gate_slots(vec![("a", 10.0, 0.0), ("b", 10.0, 1.0)]);
        assert_eq!(
            slots.placed,
            vec![(Direction::South, "b"), (Direction::East, "a")]
        );
        assert!(slots.overflow.is_empty());
    }

    #[test]
    fn test_probe_order_then_opposite() {
        // East taken, South taken → North (offset 3), then West (offset 2).
        let slots = assign_gate_slots(vec![
            ("e", 10.0, 0.0),
            ("s", 0.0, 10.0),
            ("e2", 10.0, 0.0),
            ("e3", 10.0, 0.0),
        ]);
        assert_eq!(
            slots.placed,
            vec![
                (Direction::North, "e2"),
                (Direction::South, "s"),
                (Direction::East, "e"),
                (Direction::West, "e3"),
            ]
        );
    }

    #[test]
    fn test_fifth_gate_overflows() {
        let slots = assign_gate_slots((0..5).map(|i| (i, 1.0, 0.0)).collect());
        assert_eq!(slots.placed.len(), 4);
        assert_eq!(slots.overflow, vec![4]);
    }

    #[test]
    fn test_positions() {
        let c = Vec2::new(100.0, 100.0);
        assert_eq!(gate_position(c, Direction::West), Vec2::new(-4900.0, 100.0));
        let p = station_ring_position(c, 0, 4, Vec2::ZERO);
        assert!((p.x - 2600.0).abs() < 0.01);
        assert!((p.y - 100.0).abs() < 0.01);
    }
}

//! Static sector graph: sectors and the bidirectional links between them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::geometry::Vec2;

/// Map coordinates are multiplied by this to obtain a sector's world centre.
pub const WORLD_SCALE: f32 = 1000.0;

/// Opaque sector identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorId(pub u32);

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sector-{}", self.0)
    }
}

/// Sector flavour, which decides the station mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorKind {
    Core,
    Industrial,
    Mining,
    Frontier,
    Pirate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    pub kind: SectorKind,
    /// Map position (used for world placement and gate directions).
    pub x: f32,
    pub y: f32,
}

impl Sector {
    pub fn new(id: u32, name: &str, kind: SectorKind, x: f32, y: f32) -> Self {
        Self {
            id: SectorId(id),
            name: name.to_string(),
            kind,
            x,
            y,
        }
    }

    /// World-space centre of the sector.
    pub fn world_center(&self) -> Vec2 {
        Vec2::new(self.x * WORLD_SCALE, self.y * WORLD_SCALE)
    }
}

/// Undirected link between two sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: SectorId,
    pub to: SectorId,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to parse sector graph JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sector {0} is defined more than once")]
    DuplicateSector(SectorId),
    #[error("connection references unknown sector {0}")]
    UnknownSector(SectorId),
    #[error("sector {0} is connected to itself")]
    SelfLoop(SectorId),
    #[error("sectors {0} and {1} are connected more than once")]
    DuplicateConnection(SectorId, SectorId),
}

#[derive(Deserialize)]
struct GraphFile {
    sectors: Vec<Sector>,
    connections: Vec<Connection>,
}

/// Validated sector graph with an ordered adjacency list.
#[derive(Debug, Clone)]
pub struct SectorGraph {
    sectors: Vec<Sector>,
    connections: Vec<Connection>,
    /// Neighbours in connection declaration order.
    adj: HashMap<SectorId, Vec<SectorId>>,
}

impl SectorGraph {
    pub fn new(sectors: Vec<Sector>, connections: Vec<Connection>) -> Result<Self, GraphError> {
        let mut known = HashSet::new();
        for sector in &sectors {
            if !known.insert(sector.id) {
                return Err(GraphError::DuplicateSector(sector.id));
            }
        }

        let mut seen_edges = HashSet::new();
        let mut adj: HashMap<SectorId, Vec<SectorId>> =
            sectors.iter().map(|s| (s.id, Vec::new())).collect();

        for conn in &connections {
            for id in [conn.from, conn.to] {
                if !known.contains(&id) {
                    return Err(GraphError::UnknownSector(id));
                }
            }
            if conn.from == conn.to {
                return Err(GraphError::SelfLoop(conn.from));
            }
            let key = (conn.from.min(conn.to), conn.from.max(conn.to));
            if !seen_edges.insert(key) {
                return Err(GraphError::DuplicateConnection(key.0, key.1));
            }
            adj.entry(conn.from).or_default().push(conn.to);
            adj.entry(conn.to).or_default().push(conn.from);
        }

        Ok(Self {
            sectors,
            connections,
            adj,
        })
    }

    /// Parse `{"sectors": [...], "connections": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(json)?;
        let graph = Self::new(file.sectors, file.connections)?;
        log::debug!(
            "Loaded sector graph: {} sectors, {} connections",
            graph.sectors.len(),
            graph.connections.len()
        );
        Ok(graph)
    }

    /// The built-in thirteen-sector universe.
    pub fn builtin() -> Self {
        use SectorKind::*;
        let sectors = vec![
            Sector::new(1, "Prime Core", Core, 400.0, 300.0),
            Sector::new(2, "Alpha Centauri", Core, 600.0, 200.0),
            Sector::new(3, "Sirius Hub", Industrial, 600.0, 400.0),
            Sector::new(4, "Orion Forge", Industrial, 800.0, 400.0),
            Sector::new(5, "Kepler Drift", Mining, 800.0, 600.0),
            Sector::new(6, "Vega Reach", Mining, 1000.0, 600.0),
            Sector::new(7, "Outer Rim", Frontier, 800.0, 200.0),
            Sector::new(8, "Shadow Belt", Pirate, 200.0, 300.0),
            Sector::new(9, "Deep Void", Frontier, 1200.0, 400.0),
            Sector::new(10, "Omega End", Pirate, 1400.0, 400.0),
            Sector::new(11, "Dead Man's Chest", Pirate, 1200.0, 200.0),
            Sector::new(12, "Viper's Nest", Pirate, 1600.0, 400.0),
            Sector::new(13, "The Abyss", Pirate, 1400.0, 600.0),
        ];
        let link = |a: u32, b: u32| Connection {
            from: SectorId(a),
            to: SectorId(b),
        };
        let connections = vec![
            link(1, 2),
            link(1, 3),
            link(1, 8),
            link(3, 4),
            link(3, 7),
            link(4, 5),
            link(5, 6),
            link(7, 8),
            link(4, 9),
            link(9, 10),
            link(8, 11),
            link(10, 12),
            link(10, 13),
        ];
        Self {
            adj: build_adjacency(&sectors, &connections),
            sectors,
            connections,
        }
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.id == id)
    }

    pub fn has_sector(&self, id: SectorId) -> bool {
        self.adj.contains_key(&id)
    }

    /// Neighbours of a sector, in connection declaration order.
    pub fn neighbors(&self, id: SectorId) -> &[SectorId] {
        self.adj.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }
}

fn build_adjacency(
    sectors: &[Sector],
    connections: &[Connection],
) -> HashMap<SectorId, Vec<SectorId>> {
    let mut adj: HashMap<SectorId, Vec<SectorId>> =
        sectors.iter().map(|s| (s.id, Vec::new())).collect();
    for conn in connections {
        adj.entry(conn.from).or_default().push(conn.to);
        adj.entry(conn.to).or_default().push(conn.from);
    }
    adj
}

impl Default for SectorGraph {
    fn default() -> Self {
        Self::builtin()
    }
}

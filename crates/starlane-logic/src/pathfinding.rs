//! Pure pathfinding over the sector graph.
//!
//! `PathTable` runs one BFS per source sector when built and answers every
//! later query from the table, so agents never search the graph mid-tick.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::universe::{SectorGraph, SectorId};

/// Precomputed shortest-hop paths between every ordered pair of sectors.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    /// (from, to) → sectors entered, excluding `from`, including `to`.
    paths: HashMap<(SectorId, SectorId), Vec<SectorId>>,
}

impl PathTable {
    /// Build the table for every pair of sectors in `graph`.
    pub fn build(graph: &SectorGraph) -> Self {
        let mut paths = HashMap::new();
        for source in graph.sectors() {
            for (target, path) in bfs_from(graph, source.id) {
                paths.insert((source.id, target), path);
            }
        }
        Self { paths }
    }

    /// Shortest path from `from` to `to`.
    ///
    /// `Some(&[])` when both are the same sector, `None` when unreachable.
    pub fn find_path(&self, from: SectorId, to: SectorId) -> Option<&[SectorId]> {
        if from == to {
            return Some(&[]);
        }
        self.paths.get(&(from, to)).map(|p| p.as_slice())
    }

    /// Next sector to enter on the way from `from` to `to`.
    pub fn next_hop(&self, from: SectorId, to: SectorId) -> Option<SectorId> {
        self.find_path(from, to).and_then(|p| p.first().copied())
    }

    /// Number of gate jumps between two sectors.
    pub fn hop_distance(&self, from: SectorId, to: SectorId) -> Option<usize> {
        self.find_path(from, to).map(|p| p.len())
    }

    /// Number of reachable (from, to) pairs with `from != to`.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Single-source BFS. Neighbours are expanded in declaration order, so ties
/// between equal-length paths go to the first-declared link.
fn bfs_from(graph: &SectorGraph, start: SectorId) -> Vec<(SectorId, Vec<SectorId>)> {
    let mut found = Vec::new();
    let mut visited = HashSet::new();
    let mut queue: VecDeque<(SectorId, Vec<SectorId>)> = VecDeque::new();
    visited.insert(start);
    queue.push_back((start, vec![]));

    while let Some((current, path)) = queue.pop_front() {
        for &next in graph.neighbors(current) {
            if visited.insert(next) {
                let mut next_path = path.clone();
                next_path.push(next);
                found.push((next, next_path.clone()));
                queue.push_back((next, next_path));
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::{Connection, Sector, SectorKind};

    fn linear_graph() -> SectorGraph {
        // 1 -- 2 -- 3    4 (isolated)
        let sectors = (1..=4)
            .map(|i| Sector::new(i, "S", SectorKind::Core, i as f32, 0.0))
            .collect();
        let connections = vec![
            Connection {
                from: SectorId(1),
                to: SectorId(2),
            },
            Connection {
                from: SectorId(2),
                to: SectorId(3),
            },
        ];
        SectorGraph::new(sectors, connections).unwrap()
    }

    #[test]
    fn test_same_sector() {
        let table = PathTable::build(&linear_graph());
        assert_eq!(table.find_path(SectorId(2), SectorId(2)), Some(&[][..]));
    }

    #[test]
    fn test_multi_hop() {
        let table = PathTable::build(&linear_graph());
        assert_eq!(
            table.find_path(SectorId(1), SectorId(3)),
            Some(&[SectorId(2), SectorId(3)][..])
        );
        assert_eq!(
            table.find_path(SectorId(3), SectorId(1)),
            Some(&[SectorId(2), SectorId(1)][..])
        );
        assert_eq!(table.next_hop(SectorId(1), SectorId(3)), Some(SectorId(2)));
    }

    #[test]
    fn test_unreachable() {
        let table = PathTable::build(&linear_graph());
        assert_eq!(table.find_path(SectorId(1), SectorId(4)), None);
        assert_eq!(table.hop_distance(SectorId(4), SectorId(1)), None);
    }

    #[test]
    fn test_builtin_paths() {
        let table = PathTable::build(&SectorGraph::builtin());
        // Prime Core to Omega End: 1 → 3 → 4 → 9 → 10.
        assert_eq!(
            table.find_path(SectorId(1), SectorId(10)),
            Some(&[SectorId(3), SectorId(4), SectorId(9), SectorId(10)][..])
        );
        // Every sector in the built-in graph is reachable from every other.
        assert_eq!(table.len(), 13 * 12);
    }

    #[test]
    fn test_tie_break_follows_declaration_order() {
        // 1-2, 1-3, 2-4, 3-4: both 1→2→4 and 1→3→4 are shortest.
        let sectors = (1..=4)
            .map(|i| Sector::new(i, "S", SectorKind::Core, 0.0, 0.0))
            .collect();
        let link = |a, b| Connection {
            from: SectorId(a),
            to: SectorId(b),
        };
        let connections = vec![link(1, 2), link(1, 3), link(2, 4), link(3, 4)];
        let graph = SectorGraph::new(sectors, connections).unwrap();
        let table = PathTable::build(&graph);
        assert_eq!(
            table.find_path(SectorId(1), SectorId(4)),
            Some(&[SectorId(2), SectorId(4)][..])
        );
    }
}

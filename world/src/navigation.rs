//! Static pathfinding over the arena's passability matrix.

use orb_arena_core::{CellCoord, Direction};
use pathfinding::prelude::{astar, dijkstra_all};

/// Shortest-path search over a fixed passability matrix.
///
/// The matrix is captured when the arena is built and never changes, so
/// occupancy by players is invisible here. Steps cost one and adjacency is
/// four-directional, which keeps the Manhattan heuristic consistent.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl Pathfinder {
    /// Captures a row-major passability matrix, bottom row first.
    pub(crate) fn from_matrix(width: u32, height: u32, walkable: Vec<bool>) -> Self {
        Self {
            width,
            height,
            walkable,
        }
    }

    /// Passability as `height` rows of `width` entries, `1` walkable and `0`
    /// blocked, indexed `[y][x]`.
    #[must_use]
    pub fn matrix(&self) -> Vec<Vec<u8>> {
        let width = usize::try_from(self.width).unwrap_or(0);
        if width == 0 {
            return Vec::new();
        }
        self.walkable
            .chunks(width)
            .map(|row| row.iter().map(|walkable| u8::from(*walkable)).collect())
            .collect()
    }

    /// Shortest path from `start` to `goal`, both ends included.
    ///
    /// Returns `None` when no path exists or either end is blocked.
    #[must_use]
    pub fn find_path(&self, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return None;
        }
        astar(
            &start,
            |&cell| self.successors(cell),
            |&cell| cell.manhattan_distance(goal),
            |&cell| cell == goal,
        )
        .map(|(path, _)| path)
    }

    /// One step from `start` toward `goal`: the second node of the shortest
    /// path.
    ///
    /// Returns `None` when `start == goal`, when no path exists, or when
    /// either end is blocked.
    #[must_use]
    pub fn next_step(&self, start: CellCoord, goal: CellCoord) -> Option<CellCoord> {
        if start == goal {
            return None;
        }
        self.find_path(start, goal)?.get(1).copied()
    }

    /// Candidate with the shortest walking distance from `start`.
    ///
    /// Ties go to the candidate listed first. Unreachable candidates are
    /// ignored.
    #[must_use]
    pub fn nearest(&self, start: CellCoord, candidates: &[CellCoord]) -> Option<CellCoord> {
        if !self.is_walkable(start) {
            return None;
        }
        let reachable = dijkstra_all(&start, |&cell| self.successors(cell));
        candidates
            .iter()
            .filter_map(|&candidate| {
                let distance = if candidate == start {
                    Some(0)
                } else {
                    reachable.get(&candidate).map(|&(_, cost)| cost)
                };
                distance.map(|distance| (distance, candidate))
            })
            .min_by_key(|&(distance, _)| distance)
            .map(|(_, cell)| cell)
    }

    /// Walkable neighbors in North, South, West, East order, each one step
    /// away.
    fn successors(&self, cell: CellCoord) -> impl Iterator<Item = (CellCoord, u32)> + '_ {
        Direction::SCAN_ORDER
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |neighbor| self.is_walkable(*neighbor))
            .map(|neighbor| (neighbor, 1))
    }

    fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index_of(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let column = usize::try_from(cell.x()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

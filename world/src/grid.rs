//! Field grid owning tiles, occupancy and the orb.

use std::collections::BTreeMap;

use orb_arena_core::{CellCoord, Direction, PlayerId, Tile, TileKind};

use crate::orb::{Orb, OrbLocation};

/// Read-only view of a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Coordinate of the field.
    pub cell: CellCoord,
    /// Catalog tile shared by every field of the same kind.
    pub tile: &'static Tile,
    /// Player standing on the field, if any.
    pub player: Option<PlayerId>,
    /// Whether the orb is on this field, either on the ground or carried by
    /// the player standing here.
    pub orb: bool,
}

/// Dense grid of fields plus the dynamic occupants sitting on them.
///
/// Occupancy is tracked twice: a per-field slot and a player-to-field index.
/// Both are only ever written together by [`FieldGrid::set_player_at`], so a
/// player is found on exactly the one field that names it.
#[derive(Clone, Debug)]
pub(crate) struct FieldGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    passable: Vec<bool>,
    occupants: Vec<Option<PlayerId>>,
    positions: BTreeMap<PlayerId, CellCoord>,
    orb: Option<Orb>,
}

impl FieldGrid {
    /// Builds a grid from row-major tiles, row zero being the bottom row.
    pub(crate) fn new(width: u32, height: u32, tiles: Vec<TileKind>) -> Self {
        let passable = tiles.iter().map(|kind| kind.is_passable()).collect();
        let occupants = vec![None; tiles.len()];
        Self {
            width,
            height,
            tiles,
            passable,
            occupants,
            positions: BTreeMap::new(),
            orb: None,
        }
    }

    /// Width and height of the grid in fields.
    #[must_use]
    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the coordinate names a field of this grid.
    #[must_use]
    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Complete view of the field at the coordinate.
    #[must_use]
    pub(crate) fn field(&self, cell: CellCoord) -> Option<Field> {
        let index = self.index(cell)?;
        Some(Field {
            cell,
            tile: self.tiles[index].tile(),
            player: self.occupants[index],
            orb: self.orb_position() == Some(cell),
        })
    }

    /// Tile at the coordinate.
    #[must_use]
    pub(crate) fn tile_at(&self, cell: CellCoord) -> Option<&'static Tile> {
        self.index(cell).map(|index| self.tiles[index].tile())
    }

    /// Player standing at the coordinate.
    #[must_use]
    pub(crate) fn player_at(&self, cell: CellCoord) -> Option<PlayerId> {
        self.index(cell).and_then(|index| self.occupants[index])
    }

    /// Field currently occupied by the player.
    #[must_use]
    pub(crate) fn position_of(&self, player: PlayerId) -> Option<CellCoord> {
        self.positions.get(&player).copied()
    }

    /// Whether the coordinate is inside the grid and walkable.
    #[must_use]
    pub(crate) fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(false, |index| self.passable[index])
    }

    /// Passability of every field in row-major order, bottom row first.
    #[must_use]
    pub(crate) fn passability(&self) -> &[bool] {
        &self.passable
    }

    /// The orb, once spawned.
    #[must_use]
    pub(crate) fn orb(&self) -> Option<&Orb> {
        self.orb.as_ref()
    }

    /// Field the orb is on. A carried orb sits on its carrier's field.
    #[must_use]
    pub(crate) fn orb_position(&self) -> Option<CellCoord> {
        match self.orb?.location() {
            OrbLocation::OnGround(cell) => Some(cell),
            OrbLocation::Carried(player) => self.position_of(player),
        }
    }

    /// Existing, passable and unoccupied neighbors in North, South, West,
    /// East order.
    #[must_use]
    pub(crate) fn passable_neighbors(&self, cell: CellCoord) -> Vec<CellCoord> {
        Direction::SCAN_ORDER
            .iter()
            .filter_map(|direction| cell.step(*direction))
            .filter(|neighbor| self.is_passable(*neighbor) && self.player_at(*neighbor).is_none())
            .collect()
    }

    /// Every field of the given kind in map reading order: top row first,
    /// left to right.
    #[must_use]
    pub(crate) fn cells_of_kind(&self, kind: TileKind) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let cell = CellCoord::new(x, y);
                if self.tile_at(cell).map(Tile::kind) == Some(kind) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Places the player on the field, vacating its previous field.
    ///
    /// The destination must be free; callers check occupancy first.
    pub(crate) fn set_player_at(&mut self, player: PlayerId, cell: CellCoord) {
        let Some(index) = self.index(cell) else {
            return;
        };
        debug_assert!(
            self.occupants[index].map_or(true, |occupant| occupant == player),
            "destination must be free"
        );

        if let Some(previous) = self.positions.insert(player, cell) {
            if let Some(previous_index) = self.index(previous) {
                if previous_index != index {
                    self.occupants[previous_index] = None;
                }
            }
        }
        self.occupants[index] = Some(player);
    }

    /// Puts the orb on the ground at the coordinate, spawning it if needed.
    pub(crate) fn set_orb_at(&mut self, cell: CellCoord) {
        match self.orb.as_mut() {
            Some(orb) => orb.put_down(cell),
            None => self.orb = Some(Orb::on_ground(cell)),
        }
    }

    pub(crate) fn orb_mut(&mut self) -> Option<&mut Orb> {
        self.orb.as_mut()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.y()).ok()?;
        let column = usize::try_from(cell.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: u32, height: u32) -> FieldGrid {
        let count = (width * height) as usize;
        FieldGrid::new(width, height, vec![TileKind::Floor; count])
    }

    #[test]
    fn set_player_at_keeps_index_and_slots_in_lockstep() {
        let mut grid = open_grid(3, 3);
        let player = PlayerId::new(0);

        grid.set_player_at(player, CellCoord::new(0, 0));
        grid.set_player_at(player, CellCoord::new(1, 0));

        assert_eq!(grid.position_of(player), Some(CellCoord::new(1, 0)));
        assert_eq!(grid.player_at(CellCoord::new(1, 0)), Some(player));
        assert_eq!(grid.player_at(CellCoord::new(0, 0)), None);
    }

    #[test]
    fn passable_neighbors_skip_walls_occupants_and_edges() {
        let mut tiles = vec![TileKind::Floor; 9];
        tiles[3] = TileKind::Wall;
        let mut grid = FieldGrid::new(3, 3, tiles);
        grid.set_player_at(PlayerId::new(4), CellCoord::new(1, 2));

        let neighbors = grid.passable_neighbors(CellCoord::new(1, 1));
        assert_eq!(neighbors, vec![CellCoord::new(1, 0), CellCoord::new(2, 1)]);

        let corner = grid.passable_neighbors(CellCoord::new(0, 0));
        assert_eq!(corner, vec![CellCoord::new(1, 0)]);
    }

    #[test]
    fn passable_neighbors_follow_north_south_west_east() {
        let grid = open_grid(3, 3);
        assert_eq!(
            grid.passable_neighbors(CellCoord::new(1, 1)),
            vec![
                CellCoord::new(1, 2),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(2, 1),
            ]
        );
    }

    #[test]
    fn cells_of_kind_reads_top_row_first() {
        let mut tiles = vec![TileKind::Floor; 4];
        tiles[0] = TileKind::RedSpawn;
        tiles[3] = TileKind::RedSpawn;
        let grid = FieldGrid::new(2, 2, tiles);

        assert_eq!(
            grid.cells_of_kind(TileKind::RedSpawn),
            vec![CellCoord::new(1, 1), CellCoord::new(0, 0)]
        );
    }

    #[test]
    fn carried_orb_reports_carrier_field() {
        let mut grid = open_grid(2, 2);
        let player = PlayerId::new(1);
        grid.set_player_at(player, CellCoord::new(0, 0));
        grid.set_orb_at(CellCoord::new(0, 0));
        grid.orb_mut()
            .expect("orb spawned")
            .pick_up(player)
            .expect("orb is free");

        grid.set_player_at(player, CellCoord::new(1, 1));

        assert_eq!(grid.orb_position(), Some(CellCoord::new(1, 1)));
        assert!(grid.field(CellCoord::new(1, 1)).expect("in bounds").orb);
        assert!(!grid.field(CellCoord::new(0, 0)).expect("in bounds").orb);
    }

    #[test]
    fn lookups_outside_grid_return_none() {
        let grid = open_grid(2, 2);
        assert!(grid.tile_at(CellCoord::new(2, 0)).is_none());
        assert!(grid.field(CellCoord::new(0, 5)).is_none());
        assert!(!grid.is_passable(CellCoord::new(9, 9)));
    }
}

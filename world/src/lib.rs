#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Orb Arena.
//!
//! The [`World`] owns every field, the players standing on them and the
//! single orb. Mutations only happen through [`apply`]; reads go through the
//! [`query`] module.

pub mod map_import;

mod grid;
mod movement;
mod navigation;
mod orb;

use grid::FieldGrid;
use orb_arena_core::{CellCoord, Command, Event, PickUpError, PlayerId, SpawnError, Team, TileKind};
use tracing::{debug, info};

pub use grid::Field;
pub use map_import::MapLoadError;
pub use movement::MoveOutcome;
pub use navigation::Pathfinder;
pub use orb::{Orb, OrbLocation};

/// A participant registered with the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    team: Team,
}

impl Player {
    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Team the player competes for.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }
}

/// Represents the authoritative arena state.
#[derive(Clone, Debug)]
pub struct World {
    grid: FieldGrid,
    pathfinder: Pathfinder,
    players: Vec<Player>,
    next_player_id: u32,
}

impl World {
    /// Creates an arena from row-major tiles, row zero being the bottom row.
    pub fn from_tiles(
        width: u32,
        height: u32,
        tiles: Vec<TileKind>,
    ) -> Result<Self, MapLoadError> {
        let expected = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX);
        if expected == 0 {
            return Err(MapLoadError::Empty);
        }
        if tiles.len() != expected {
            return Err(MapLoadError::SizeMismatch {
                expected,
                found: tiles.len(),
            });
        }

        let grid = FieldGrid::new(width, height, tiles);
        let pathfinder = Pathfinder::from_matrix(width, height, grid.passability().to_vec());
        Ok(Self {
            grid,
            pathfinder,
            players: Vec::new(),
            next_player_id: 0,
        })
    }

    fn player(&self, player: PlayerId) -> Option<&Player> {
        self.players.iter().find(|candidate| candidate.id == player)
    }

    fn spawn_player(
        &mut self,
        name: String,
        team: Team,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        let rejection = match self.grid.tile_at(cell) {
            None => Some(SpawnError::OutOfBounds),
            Some(tile) if !tile.passable() => Some(SpawnError::Impassable),
            Some(_) if self.grid.player_at(cell).is_some() => Some(SpawnError::Occupied),
            Some(_) => None,
        };
        if let Some(reason) = rejection {
            debug!(name = %name, ?cell, %reason, "player_spawn_rejected");
            out_events.push(Event::PlayerSpawnRejected { name, cell, reason });
            return;
        }

        let id = PlayerId::new(self.next_player_id);
        self.next_player_id = self.next_player_id.saturating_add(1);
        self.grid.set_player_at(id, cell);
        info!(player = id.get(), name = %name, team = team.label(), ?cell, "player_spawned");
        self.players.push(Player { id, name, team });
        out_events.push(Event::PlayerSpawned {
            player: id,
            team,
            cell,
        });
    }

    fn spawn_orb(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let rejection = if self.grid.orb().is_some() {
            Some(SpawnError::OrbAlreadySpawned)
        } else {
            match self.grid.tile_at(cell) {
                None => Some(SpawnError::OutOfBounds),
                Some(tile) if !tile.passable() => Some(SpawnError::Impassable),
                Some(_) => None,
            }
        };
        if let Some(reason) = rejection {
            debug!(?cell, %reason, "orb_spawn_rejected");
            out_events.push(Event::OrbSpawnRejected { cell, reason });
            return;
        }

        self.grid.set_orb_at(cell);
        info!(?cell, "orb_spawned");
        out_events.push(Event::OrbSpawned { cell });
    }

    fn move_player(&mut self, player: PlayerId, target: CellCoord, out_events: &mut Vec<Event>) {
        let outcome = match movement::resolve_move(&mut self.grid, player, target) {
            Ok(outcome) => outcome,
            Err(reason) => {
                debug!(player = player.get(), ?target, %reason, "move_rejected");
                out_events.push(Event::MoveRejected {
                    player,
                    target,
                    reason,
                });
                return;
            }
        };

        let (from, to) = match outcome {
            MoveOutcome::Stayed { at } => {
                debug!(player = player.get(), cell = ?at, "move_noop");
                return;
            }
            MoveOutcome::Moved { from, to } => (from, to),
            MoveOutcome::Redirected {
                from,
                to,
                requested,
            } => {
                debug!(player = player.get(), ?requested, sidestep = ?to, "move_redirected");
                (from, to)
            }
        };
        out_events.push(Event::PlayerMoved {
            player,
            from,
            to,
            requested: target,
        });
        self.check_delivery(player, to, out_events);
    }

    /// Reports a delivery when `player` holds the orb on its own spawn field.
    fn check_delivery(&self, player: PlayerId, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.grid.orb().and_then(Orb::carrier) != Some(player) {
            return;
        }
        let Some(team) = self.player(player).map(Player::team) else {
            return;
        };
        if self.grid.tile_at(cell).map(|tile| tile.kind()) != Some(team.spawn_tile()) {
            return;
        }
        info!(player = player.get(), team = team.label(), ?cell, "orb_delivered");
        out_events.push(Event::OrbDelivered { player, team, cell });
    }

    fn pick_up_orb(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        match self.try_pick_up(player) {
            Ok(cell) => {
                info!(player = player.get(), ?cell, "orb_picked_up");
                out_events.push(Event::OrbPickedUp { player, cell });
                self.check_delivery(player, cell, out_events);
            }
            Err(reason) => {
                debug!(player = player.get(), %reason, "pick_up_rejected");
                out_events.push(Event::PickUpRejected { player, reason });
            }
        }
    }

    fn try_pick_up(&mut self, player: PlayerId) -> Result<CellCoord, PickUpError> {
        let cell = self.grid.position_of(player).ok_or(PickUpError::NotOnMap)?;
        let orb = self.grid.orb().copied().ok_or(PickUpError::NoOrbPresent)?;
        if orb.is_carried() {
            return Err(PickUpError::OrbAlreadyCarried);
        }
        if orb.location() != OrbLocation::OnGround(cell) {
            return Err(PickUpError::NoOrbPresent);
        }
        self.grid
            .orb_mut()
            .ok_or(PickUpError::NoOrbPresent)?
            .pick_up(player)?;
        Ok(cell)
    }

    fn drop_orb(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let carrier = self.grid.orb().and_then(Orb::carrier);
        let result = match (self.grid.position_of(player), carrier) {
            (None, _) => Err(PickUpError::NotOnMap),
            (Some(cell), Some(carrier)) if carrier == player => Ok(cell),
            (Some(_), _) => Err(PickUpError::NoOrbPresent),
        };
        match result {
            Ok(cell) => {
                self.grid.set_orb_at(cell);
                info!(player = player.get(), ?cell, "orb_dropped");
                out_events.push(Event::OrbDropped { player, cell });
            }
            Err(reason) => {
                debug!(player = player.get(), %reason, "drop_rejected");
                out_events.push(Event::PickUpRejected { player, reason });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnPlayer { name, team, cell } => {
            world.spawn_player(name, team, cell, out_events);
        }
        Command::SpawnOrb { cell } => world.spawn_orb(cell, out_events),
        Command::MovePlayer { player, target } => world.move_player(player, target, out_events),
        Command::PickUpOrb { player } => world.pick_up_orb(player, out_events),
        Command::DropOrb { player } => world.drop_orb(player, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use orb_arena_core::{CellCoord, PlayerId, Tile, TileKind};

    use super::{Field, Orb, Pathfinder, Player, World};

    /// Read-only access to the static pathfinder.
    #[must_use]
    pub fn pathfinder(world: &World) -> &Pathfinder {
        &world.pathfinder
    }

    /// Width and height of the arena in fields.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Complete view of a single field.
    #[must_use]
    pub fn field(world: &World, cell: CellCoord) -> Option<Field> {
        world.grid.field(cell)
    }

    /// Tile at the coordinate.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<&'static Tile> {
        world.grid.tile_at(cell)
    }

    /// Player standing at the coordinate.
    #[must_use]
    pub fn player_at(world: &World, cell: CellCoord) -> Option<PlayerId> {
        world.grid.player_at(cell)
    }

    /// Field the player stands on.
    #[must_use]
    pub fn position_of(world: &World, player: PlayerId) -> Option<CellCoord> {
        world.grid.position_of(player)
    }

    /// The orb, once spawned.
    #[must_use]
    pub fn orb(world: &World) -> Option<&Orb> {
        world.grid.orb()
    }

    /// Field the orb is on, following its carrier when carried.
    #[must_use]
    pub fn orb_position(world: &World) -> Option<CellCoord> {
        world.grid.orb_position()
    }

    /// Player carrying the orb.
    #[must_use]
    pub fn orb_carrier(world: &World) -> Option<PlayerId> {
        world.grid.orb().and_then(Orb::carrier)
    }

    /// Free, passable neighbors in North, South, West, East order.
    #[must_use]
    pub fn passable_neighbors(world: &World, cell: CellCoord) -> Vec<CellCoord> {
        world.grid.passable_neighbors(cell)
    }

    /// Every field of the given kind in map reading order.
    #[must_use]
    pub fn cells_of_kind(world: &World, kind: TileKind) -> Vec<CellCoord> {
        world.grid.cells_of_kind(kind)
    }

    /// One step along the shortest static path from `start` to `goal`.
    #[must_use]
    pub fn next_step(world: &World, start: CellCoord, goal: CellCoord) -> Option<CellCoord> {
        world.pathfinder.next_step(start, goal)
    }

    /// Closest reachable field of the given kind, by walking distance.
    #[must_use]
    pub fn nearest_cell_of_kind(
        world: &World,
        from: CellCoord,
        kind: TileKind,
    ) -> Option<CellCoord> {
        let candidates = world.grid.cells_of_kind(kind);
        world.pathfinder.nearest(from, &candidates)
    }

    /// Registered players in spawn order.
    #[must_use]
    pub fn players(world: &World) -> &[Player] {
        &world.players
    }

    /// Registered player by identifier.
    #[must_use]
    pub fn player(world: &World, player: PlayerId) -> Option<&Player> {
        world.player(player)
    }
}

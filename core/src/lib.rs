#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Orb Arena simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative arena, and pure systems. Systems turn arena queries into
//! [`Action`] values, actions become [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point,
//! and then broadcasts [`Event`] values describing what actually happened.
//! Rejected commands are reported as events rather than errors so a tick is
//! never aborted by a single player's illegal request.

mod tiles;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tiles::{tile_for_color, Tile, TileKind, TILE_CATALOG};

/// Display color used for the orb when it lies on the ground.
pub const ORB_DISPLAY_COLOR: Rgb = Rgb::new(130, 80, 200);

/// Byte RGB triplet used both for map import and for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// The two sides competing for the orb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Red team, returning the orb to `RED_SPAWN` tiles.
    Red,
    /// Blue team, returning the orb to `BLUE_SPAWN` tiles.
    Blue,
}

impl Team {
    /// Tile kind that marks this team's base.
    #[must_use]
    pub const fn spawn_tile(self) -> TileKind {
        match self {
            Self::Red => TileKind::RedSpawn,
            Self::Blue => TileKind::BlueSpawn,
        }
    }

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Color used to draw players of this team.
    #[must_use]
    pub const fn display_color(self) -> Rgb {
        match self {
            Self::Red => Rgb::new(255, 0, 0),
            Self::Blue => Rgb::new(0, 0, 255),
        }
    }

    /// Upper-case label used in logs and messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
        }
    }
}

/// Unique identifier assigned to a player by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single field in arena coordinates.
///
/// The origin sits in the bottom-left corner of the map: `x` grows to the
/// east and `y` grows to the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new field coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the field.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the field, counted from the bottom of the map.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Coordinate one step away in the given direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::South => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
        }
    }
}

/// Cardinal directions available to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing `y`.
    North,
    /// Toward decreasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
    /// Toward increasing `x`.
    East,
}

impl Direction {
    /// Fixed neighbor scan order used for adjacency listings and conflict
    /// redirects.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// Decision produced by a strategy for a single player in a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// The player does nothing this tick.
    Idle,
    /// The player steps toward the provided field.
    Move {
        /// Field the player wants to occupy next.
        target: CellCoord,
    },
    /// The player picks up the orb lying on its field.
    PickUp,
}

impl Action {
    /// Translates the action into the world command that enacts it.
    #[must_use]
    pub fn into_command(self, player: PlayerId) -> Option<Command> {
        match self {
            Self::Idle => None,
            Self::Move { target } => Some(Command::MovePlayer { player, target }),
            Self::PickUp => Some(Command::PickUpOrb { player }),
        }
    }
}

/// Commands that express all permissible arena mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Places a new player on the provided field.
    SpawnPlayer {
        /// Display name of the player.
        name: String,
        /// Team the player competes for.
        team: Team,
        /// Field the player starts on.
        cell: CellCoord,
    },
    /// Places the orb on the provided field.
    SpawnOrb {
        /// Field the orb starts on.
        cell: CellCoord,
    },
    /// Requests that a player move onto the provided field.
    MovePlayer {
        /// Identifier of the moving player.
        player: PlayerId,
        /// Field the player wants to occupy.
        target: CellCoord,
    },
    /// Requests that a player pick up the orb on its current field.
    PickUpOrb {
        /// Identifier of the player reaching for the orb.
        player: PlayerId,
    },
    /// Requests that a carrier put the orb down on its current field.
    DropOrb {
        /// Identifier of the carrier.
        player: PlayerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a player entered the arena.
    PlayerSpawned {
        /// Identifier allocated to the player.
        player: PlayerId,
        /// Team the player competes for.
        team: Team,
        /// Field the player occupies.
        cell: CellCoord,
    },
    /// Reports that a player could not be placed.
    PlayerSpawnRejected {
        /// Name supplied with the spawn request.
        name: String,
        /// Field requested for the spawn.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that the orb was placed on the ground.
    OrbSpawned {
        /// Field the orb lies on.
        cell: CellCoord,
    },
    /// Reports that the orb could not be placed.
    OrbSpawnRejected {
        /// Field requested for the orb.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a player moved between two fields.
    PlayerMoved {
        /// Identifier of the player that moved.
        player: PlayerId,
        /// Field the player occupied before moving.
        from: CellCoord,
        /// Field the player occupies after moving.
        to: CellCoord,
        /// Field the player asked for. Differs from `to` when the move was
        /// redirected around an occupied field.
        requested: CellCoord,
    },
    /// Reports that a move request left the arena untouched.
    MoveRejected {
        /// Identifier of the player whose move failed.
        player: PlayerId,
        /// Field the player asked for.
        target: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a player picked up the orb.
    OrbPickedUp {
        /// Identifier of the new carrier.
        player: PlayerId,
        /// Field on which the pickup happened.
        cell: CellCoord,
    },
    /// Reports that a pickup or drop request failed.
    PickUpRejected {
        /// Identifier of the player whose request failed.
        player: PlayerId,
        /// Specific reason the request failed.
        reason: PickUpError,
    },
    /// Confirms that a carrier put the orb down.
    OrbDropped {
        /// Identifier of the former carrier.
        player: PlayerId,
        /// Field the orb now lies on.
        cell: CellCoord,
    },
    /// Announces that a carrier brought the orb onto its own base.
    OrbDelivered {
        /// Identifier of the carrier.
        player: PlayerId,
        /// Team credited with the delivery.
        team: Team,
        /// Base field the carrier stepped onto.
        cell: CellCoord,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// The player does not occupy any field.
    #[error("player is not on the map")]
    NotOnMap,
    /// The requested field lies outside the grid.
    #[error("target is out of bounds")]
    OutOfBounds,
    /// The requested field cannot be walked on.
    #[error("target is not passable")]
    Impassable,
    /// The requested field is occupied and no free neighbor exists.
    #[error("target is occupied and no sidestep is available")]
    Blocked,
}

/// Reasons a pickup or drop request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PickUpError {
    /// The player does not occupy any field.
    #[error("player is not on the map")]
    NotOnMap,
    /// Someone already carries the orb.
    #[error("orb is already carried")]
    OrbAlreadyCarried,
    /// There is no orb on the player's field, or the player does not carry it.
    #[error("no orb present")]
    NoOrbPresent,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SpawnError {
    /// The requested field lies outside the grid.
    #[error("spawn field is out of bounds")]
    OutOfBounds,
    /// The requested field cannot be walked on.
    #[error("spawn field is not passable")]
    Impassable,
    /// Another player already stands on the requested field.
    #[error("spawn field is occupied")]
    Occupied,
    /// The orb already exists; there is only ever one.
    #[error("orb already spawned")]
    OrbAlreadySpawned,
}

#[cfg(test)]
mod tests {
    use super::{Action, CellCoord, Command, Direction, Event, MoveError, PlayerId, Team, TileKind};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_follows_bottom_left_origin() {
        let cell = CellCoord::new(2, 2);
        assert_eq!(cell.step(Direction::North), Some(CellCoord::new(2, 3)));
        assert_eq!(cell.step(Direction::South), Some(CellCoord::new(2, 1)));
        assert_eq!(cell.step(Direction::West), Some(CellCoord::new(1, 2)));
        assert_eq!(cell.step(Direction::East), Some(CellCoord::new(3, 2)));
    }

    #[test]
    fn step_refuses_to_underflow() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::South), None);
        assert_eq!(origin.step(Direction::West), None);
    }

    #[test]
    fn teams_map_to_their_own_spawn_tiles() {
        assert_eq!(Team::Red.spawn_tile(), TileKind::RedSpawn);
        assert_eq!(Team::Blue.spawn_tile(), TileKind::BlueSpawn);
        assert_eq!(Team::Red.opponent(), Team::Blue);
    }

    #[test]
    fn idle_action_has_no_command() {
        let player = PlayerId::new(3);
        assert_eq!(Action::Idle.into_command(player), None);
        assert_eq!(
            Action::PickUp.into_command(player),
            Some(Command::PickUpOrb { player })
        );
    }

    #[test]
    fn rejection_event_survives_bincode_event_log() {
        let event = Event::MoveRejected {
            player: PlayerId::new(7),
            target: CellCoord::new(9, 0),
            reason: MoveError::OutOfBounds,
        };
        let bytes = bincode::serialize(&event).expect("serialize");
        let restored: Event = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, event);
    }
}

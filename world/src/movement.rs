//! Movement resolution for a single move request.

use orb_arena_core::{CellCoord, MoveError, PlayerId};

use crate::grid::FieldGrid;

/// What a successful move request did to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved onto the requested field.
    Moved {
        /// Field the player left.
        from: CellCoord,
        /// Field the player now occupies.
        to: CellCoord,
    },
    /// The requested field was taken, so the player sidestepped onto the
    /// first free neighbor of its own field.
    Redirected {
        /// Field the player left.
        from: CellCoord,
        /// Field the player now occupies.
        to: CellCoord,
        /// Field the player asked for.
        requested: CellCoord,
    },
    /// The player asked for the field it already stands on.
    Stayed {
        /// Field the player occupies.
        at: CellCoord,
    },
}

impl MoveOutcome {
    /// Field the player occupies after the move.
    #[must_use]
    pub const fn destination(&self) -> CellCoord {
        match *self {
            Self::Moved { to, .. } | Self::Redirected { to, .. } => to,
            Self::Stayed { at } => at,
        }
    }
}

/// Validates and applies a move request.
///
/// Rejections leave the grid untouched. A carried orb follows its carrier
/// implicitly because its position is the carrier's field.
pub(crate) fn resolve_move(
    grid: &mut FieldGrid,
    player: PlayerId,
    target: CellCoord,
) -> Result<MoveOutcome, MoveError> {
    let from = grid.position_of(player).ok_or(MoveError::NotOnMap)?;
    let tile = grid.tile_at(target).ok_or(MoveError::OutOfBounds)?;
    if !tile.passable() {
        return Err(MoveError::Impassable);
    }

    let outcome = match grid.player_at(target) {
        Some(occupant) if occupant == player => return Ok(MoveOutcome::Stayed { at: from }),
        Some(_) => {
            let sidestep = grid
                .passable_neighbors(from)
                .first()
                .copied()
                .ok_or(MoveError::Blocked)?;
            MoveOutcome::Redirected {
                from,
                to: sidestep,
                requested: target,
            }
        }
        None => MoveOutcome::Moved { from, to: target },
    };

    grid.set_player_at(player, outcome.destination());
    Ok(outcome)
}

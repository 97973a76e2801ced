//! Orb state machine.

use orb_arena_core::{CellCoord, PickUpError, PlayerId};

/// Where the orb currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrbLocation {
    /// Lying on the given field.
    OnGround(CellCoord),
    /// Carried by the given player; the orb shares the carrier's field.
    Carried(PlayerId),
}

/// The single shared objective of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orb {
    location: OrbLocation,
}

impl Orb {
    pub(crate) const fn on_ground(cell: CellCoord) -> Self {
        Self {
            location: OrbLocation::OnGround(cell),
        }
    }

    /// Current location of the orb.
    #[must_use]
    pub const fn location(&self) -> OrbLocation {
        self.location
    }

    /// Whether any player carries the orb.
    #[must_use]
    pub const fn is_carried(&self) -> bool {
        matches!(self.location, OrbLocation::Carried(_))
    }

    /// Player carrying the orb.
    #[must_use]
    pub const fn carrier(&self) -> Option<PlayerId> {
        match self.location {
            OrbLocation::Carried(player) => Some(player),
            OrbLocation::OnGround(_) => None,
        }
    }

    /// Hands the orb to the player. Co-location is the caller's concern.
    pub(crate) fn pick_up(&mut self, player: PlayerId) -> Result<(), PickUpError> {
        if self.is_carried() {
            return Err(PickUpError::OrbAlreadyCarried);
        }
        self.location = OrbLocation::Carried(player);
        Ok(())
    }

    pub(crate) fn put_down(&mut self, cell: CellCoord) {
        self.location = OrbLocation::OnGround(cell);
    }
}

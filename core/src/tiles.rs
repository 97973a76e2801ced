//! Static tile catalog mapping import colors to tile kinds.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Kinds of tiles a map can be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid wall.
    Wall,
    /// Open floor.
    Floor,
    /// Field where the orb appears at the start of a match.
    OrbSpawn,
    /// Red team base.
    RedSpawn,
    /// Blue team base.
    BlueSpawn,
    /// Any import color the catalog does not recognise.
    Unknown,
}

impl TileKind {
    /// Catalog entry describing this kind.
    #[must_use]
    pub fn tile(self) -> &'static Tile {
        match self {
            Self::Wall => &TILE_CATALOG[0],
            Self::Floor => &TILE_CATALOG[1],
            Self::OrbSpawn => &TILE_CATALOG[2],
            Self::RedSpawn => &TILE_CATALOG[3],
            Self::BlueSpawn => &TILE_CATALOG[4],
            Self::Unknown => &TILE_CATALOG[5],
        }
    }

    /// Whether players may stand on tiles of this kind.
    #[must_use]
    pub fn is_passable(self) -> bool {
        self.tile().passable()
    }
}

/// Immutable catalog entry shared by every field of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    kind: TileKind,
    name: &'static str,
    import_color: Option<Rgb>,
    display_color: Rgb,
    passable: bool,
}

impl Tile {
    const fn new(
        kind: TileKind,
        name: &'static str,
        import_color: Option<Rgb>,
        display_color: Rgb,
        passable: bool,
    ) -> Self {
        Self {
            kind,
            name,
            import_color,
            display_color,
            passable,
        }
    }

    /// Kind this entry describes.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Upper-case identifier, e.g. `RED_SPAWN`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Color used when presenting the tile.
    #[must_use]
    pub const fn display_color(&self) -> Rgb {
        self.display_color
    }

    /// Whether players may stand on the tile.
    #[must_use]
    pub const fn passable(&self) -> bool {
        self.passable
    }
}

/// Every known tile, in lookup order. `UNKNOWN` is last and has no import
/// color, so it only ever matches as the fallback.
pub const TILE_CATALOG: [Tile; 6] = [
    Tile::new(
        TileKind::Wall,
        "WALL",
        Some(Rgb::new(0, 0, 0)),
        Rgb::new(50, 50, 50),
        false,
    ),
    Tile::new(
        TileKind::Floor,
        "FLOOR",
        Some(Rgb::new(255, 255, 255)),
        Rgb::new(200, 200, 200),
        true,
    ),
    Tile::new(
        TileKind::OrbSpawn,
        "ORB_SPAWN",
        Some(Rgb::new(118, 66, 138)),
        Rgb::new(118, 66, 138),
        true,
    ),
    Tile::new(
        TileKind::RedSpawn,
        "RED_SPAWN",
        Some(Rgb::new(172, 50, 50)),
        Rgb::new(172, 50, 50),
        true,
    ),
    Tile::new(
        TileKind::BlueSpawn,
        "BLUE_SPAWN",
        Some(Rgb::new(99, 155, 255)),
        Rgb::new(99, 155, 255),
        true,
    ),
    Tile::new(
        TileKind::Unknown,
        "UNKNOWN",
        None,
        Rgb::new(255, 0, 255),
        false,
    ),
];

/// Resolves a map pixel color to its catalog entry.
///
/// Unmatched colors resolve to `UNKNOWN`; this never fails.
#[must_use]
pub fn tile_for_color(color: Rgb) -> &'static Tile {
    TILE_CATALOG
        .iter()
        .find(|tile| tile.import_color == Some(color))
        .unwrap_or(&TILE_CATALOG[TILE_CATALOG.len() - 1])
}

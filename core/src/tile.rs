use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Identity of a memory tile, unique within an engine instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Which side of a memory tile is showing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFace {
    /// Color visible.
    #[default]
    Revealed,
    /// Face-down placeholder visible.
    Hidden,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    color: Rgb,
    is_target: bool,
    face: TileFace,
    matched: bool,
}

impl Tile {
    pub(crate) const fn new(id: TileId, color: Rgb, is_target: bool) -> Self {
        Self {
            id,
            color,
            is_target,
            face: TileFace::Revealed,
            matched: false,
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Whether the generator placed this tile as one of the round's required matches.
    ///
    /// Bookkeeping only, hosts must not show it to the player.
    pub const fn is_target(&self) -> bool {
        self.is_target
    }

    pub const fn face(&self) -> TileFace {
        self.face
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.face, TileFace::Revealed)
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.face, TileFace::Hidden)
    }

    /// Already counted as a match this round, stays face-up.
    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    pub(crate) fn flip(&mut self, face: TileFace) {
        self.face = face;
    }

    pub(crate) fn mark_matched(&mut self) {
        self.matched = true;
        self.face = TileFace::Revealed;
    }
}

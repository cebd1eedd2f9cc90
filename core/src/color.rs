use core::fmt;
use serde::{Deserialize, Serialize};

/// Color held by a cell of the grid game.
///
/// `Neutral` is the unset placeholder a freshly reset grid is filled with, it is never a valid
/// target and never satisfies a win condition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColor {
    Red,
    Green,
    Blue,
    Yellow,
    #[default]
    Neutral,
}

impl CellColor {
    /// Colors eligible for gameplay, in cycle order.
    pub const PLAYABLE: [CellColor; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Next color in the cycle `Red -> Green -> Blue -> Yellow -> Red`, `Neutral` enters at `Red`.
    pub const fn next(self) -> Self {
        use CellColor::*;
        match self {
            Red => Green,
            Green => Blue,
            Blue => Yellow,
            Yellow => Red,
            Neutral => Red,
        }
    }

    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Neutral)
    }

    /// Single letter used by text renderers.
    pub const fn symbol(self) -> char {
        use CellColor::*;
        match self {
            Red => 'R',
            Green => 'G',
            Blue => 'B',
            Yellow => 'Y',
            Neutral => '.',
        }
    }
}

/// Arbitrary color used by the memory game, not restricted to the playable set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

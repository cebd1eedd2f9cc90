use alloc::vec::Vec;

use crate::*;
pub use random::*;
pub use scripted::*;

mod random;
mod scripted;

/// Source of every random decision the engines make.
pub trait ColorSource {
    /// Uniform index in `0..upper`, callers never pass zero.
    fn pick_index(&mut self, upper: usize) -> usize;

    /// Arbitrary color for memory tiles.
    fn pick_rgb(&mut self) -> Rgb;

    fn pick_playable(&mut self) -> CellColor {
        CellColor::PLAYABLE[self.pick_index(CellColor::PLAYABLE.len())]
    }

    /// Fisher-Yates shuffle driven by [`ColorSource::pick_index`].
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Freshly generated memory round.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayout {
    pub target: Rgb,
    pub tiles: Vec<Tile>,
}

/// Builds a shuffled round of `grid_size²` face-up tiles with the target placed exactly
/// `required_matches` times.
///
/// Filler colors are drawn independently and may coincide with the target. Such tiles are not
/// flagged as targets but still match when tapped.
pub fn generate_tiles<C: ColorSource + ?Sized>(
    source: &mut C,
    config: RoundConfig,
    first_id: TileId,
) -> TileLayout {
    let total = usize::from(config.tile_count());
    let required = usize::from(config.required_matches);

    let required = if required > total {
        log::warn!(
            "Round asks for {} matches but only has {} tiles, clamping",
            required,
            total
        );
        total
    } else {
        required
    };

    let target = source.pick_rgb();
    let mut colors: Vec<(Rgb, bool)> = Vec::with_capacity(total);
    colors.extend(core::iter::repeat_n((target, true), required));
    while colors.len() < total {
        colors.push((source.pick_rgb(), false));
    }

    source.shuffle(&mut colors);

    let tiles = colors
        .into_iter()
        .zip(first_id.0..)
        .map(|((color, is_target), id)| Tile::new(TileId(id), color, is_target))
        .collect();

    TileLayout { target, tiles }
}

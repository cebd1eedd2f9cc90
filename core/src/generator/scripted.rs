use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::*;

/// Replays fixed sequences, for deterministic tests and replays.
///
/// Indices are reduced modulo the requested range. Once a sequence runs out, indices fall back to 0
/// and colors to mid gray.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedColorSource {
    indices: VecDeque<usize>,
    colors: VecDeque<Rgb>,
}

impl ScriptedColorSource {
    pub fn new(indices: Vec<usize>, colors: Vec<Rgb>) -> Self {
        Self {
            indices: indices.into(),
            colors: colors.into(),
        }
    }

    pub fn push_indices(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.indices.extend(indices);
    }

    pub fn push_colors(&mut self, colors: impl IntoIterator<Item = Rgb>) {
        self.colors.extend(colors);
    }
}

impl ColorSource for ScriptedColorSource {
    fn pick_index(&mut self, upper: usize) -> usize {
        let index = self.indices.pop_front().unwrap_or(0);
        if upper == 0 { 0 } else { index % upper }
    }

    fn pick_rgb(&mut self) -> Rgb {
        self.colors
            .pop_front()
            .unwrap_or(Rgb::new(128, 128, 128))
    }
}

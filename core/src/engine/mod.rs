pub use grid::*;
pub use memory::*;

mod grid;
mod memory;

/// Folds an engine call result into "did anything change".
pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<MoveOutcome, E> {
    fn has_update(self) -> bool {
        self.is_ok_and(|outcome| outcome.has_update())
    }
}

impl<E> HasUpdate for Result<TapOutcome, E> {
    fn has_update(self) -> bool {
        self.is_ok_and(|outcome| outcome.has_update())
    }
}

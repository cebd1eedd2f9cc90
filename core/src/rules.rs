//! Win predicates and hint ranking of the grid game, evaluated on a bare board.

use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Every cell equals the top left cell, and that color is playable.
pub fn is_uniform(board: &Array2<CellColor>) -> bool {
    let Some(&first) = board.first() else {
        return false;
    };
    first.is_playable() && board.iter().all(|&cell| cell == first)
}

/// Exactly `target_count` cells hold `target` and no two of them are orthogonal neighbors.
pub fn is_isolated_count(
    board: &Array2<CellColor>,
    target: CellColor,
    target_count: CellCount,
) -> bool {
    let mut count: CellCount = 0;
    for (index, &cell) in board.indexed_iter() {
        if cell != target {
            continue;
        }
        count += 1;
        if board
            .iter_neighbor_cells(index.to_coord2())
            .any(|neighbor| neighbor == target)
        {
            return false;
        }
    }
    count == target_count
}

pub fn is_satisfied(
    rule: WinRule,
    board: &Array2<CellColor>,
    target: Option<CellColor>,
    target_count: CellCount,
) -> bool {
    match rule {
        WinRule::Uniform => is_uniform(board),
        WinRule::IsolatedCount => {
            target.is_some_and(|target| is_isolated_count(board, target, target_count))
        }
    }
}

/// Cells not yet showing `target`, in row-major order.
pub fn uniform_hint_candidates(board: &Array2<CellColor>, target: CellColor) -> Vec<Coord2> {
    board
        .indexed_iter()
        .filter(|&(_, &cell)| cell != target)
        .map(|(index, _)| index.to_coord2())
        .collect()
}

/// Non-target cell with the most target-colored neighbors, earliest in row-major order on ties.
pub fn isolated_hint(board: &Array2<CellColor>, target: CellColor) -> Option<Coord2> {
    let mut best: Option<(Coord2, usize)> = None;
    for (index, &cell) in board.indexed_iter() {
        if cell == target {
            continue;
        }
        let coords = index.to_coord2();
        let adjacent = board
            .iter_neighbor_cells(coords)
            .filter(|&neighbor| neighbor == target)
            .count();
        if best.is_none_or(|(_, most)| adjacent > most) {
            best = Some((coords, adjacent));
        }
    }
    best.map(|(coords, _)| coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CellColor::*;

    fn board(rows: &[&[CellColor]]) -> Array2<CellColor> {
        let size = rows.len();
        Array2::from_shape_fn([size, size], |(row, col)| rows[row][col])
    }

    #[test]
    fn uniform_requires_playable_color() {
        assert!(!is_uniform(&Array2::from_elem([3, 3], Neutral)));
        assert!(is_uniform(&Array2::from_elem([3, 3], Blue)));
    }

    #[test]
    fn uniform_breaks_on_any_single_cell() {
        for row in 0..4 {
            for col in 0..4 {
                let mut cells = Array2::from_elem([4, 4], Yellow);
                cells[[row, col]] = Red;
                assert!(!is_uniform(&cells));
            }
        }
    }

    #[test]
    fn isolated_count_rejects_adjacent_targets() {
        let adjacent = board(&[
            &[Red, Red, Green],
            &[Green, Green, Red],
            &[Red, Green, Red],
        ]);
        assert!(!is_isolated_count(&adjacent, Red, 5));

        let separated = board(&[
            &[Red, Green, Red],
            &[Green, Red, Green],
            &[Red, Green, Red],
        ]);
        assert!(is_isolated_count(&separated, Red, 5));
    }

    #[test]
    fn isolated_count_needs_exact_count() {
        let four = board(&[
            &[Red, Green, Red],
            &[Green, Blue, Green],
            &[Red, Green, Red],
        ]);
        assert!(!is_isolated_count(&four, Red, 5));
        assert!(is_isolated_count(&four, Red, 4));
    }

    #[test]
    fn isolated_rule_without_target_never_wins() {
        let cells = Array2::from_elem([3, 3], Red);
        assert!(!is_satisfied(WinRule::IsolatedCount, &cells, None, 9));
        assert!(is_satisfied(WinRule::Uniform, &cells, None, 0));
    }

    #[test]
    fn isolated_hint_prefers_most_target_neighbors() {
        let cells = board(&[
            &[Red, Green, Green],
            &[Green, Green, Red],
            &[Green, Red, Green],
        ]);
        assert_eq!(isolated_hint(&cells, Red), Some((1, 1)));
    }

    #[test]
    fn isolated_hint_breaks_ties_by_scan_order() {
        let cells = board(&[
            &[Red, Green, Green],
            &[Green, Green, Green],
            &[Green, Green, Green],
        ]);
        assert_eq!(isolated_hint(&cells, Red), Some((0, 1)));
        assert_eq!(isolated_hint(&Array2::from_elem([3, 3], Red), Red), None);
    }

    #[test]
    fn uniform_candidates_skip_target_cells() {
        let cells = board(&[
            &[Red, Red, Red],
            &[Red, Blue, Red],
            &[Red, Red, Green],
        ]);
        assert_eq!(uniform_hint_candidates(&cells, Red), [(1, 1), (2, 2)]);
    }
}

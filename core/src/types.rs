use ndarray::Array2;

/// Single coordinate axis used for grid sizes and positions.
pub type Coord = u8;

/// Count type used for cell totals, target counts and move budgets.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, `(0, 0)` is the top left cell.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Inverse of [`ToNdIndex`] for the `(row, col)` pairs ndarray hands out while iterating.
pub trait ToCoord2 {
    fn to_coord2(self) -> Coord2;
}

impl ToCoord2 for (usize, usize) {
    fn to_coord2(self) -> Coord2 {
        let clamp = |axis: usize| Coord::try_from(axis).unwrap_or(Coord::MAX);
        (clamp(self.0), clamp(self.1))
    }
}

/// Number of cells on a square grid with `side` cells per axis.
pub const fn cell_total(side: Coord) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// One step from `(row, col)`, `None` when it leaves a grid of `rows × cols`.
    fn step(self, (row, col): Coord2, (rows, cols): Coord2) -> Option<Coord2> {
        let next = match self {
            Self::Up => (row.checked_sub(1)?, col),
            Self::Down => (row.checked_add(1)?, col),
            Self::Left => (row, col.checked_sub(1)?),
            Self::Right => (row, col.checked_add(1)?),
        };
        (next.0 < rows && next.1 < cols).then_some(next)
    }
}

/// In-bounds orthogonal neighbors of a cell, in up, down, left, right order.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    directions: core::array::IntoIter<Direction, 4>,
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let (center, bounds) = (self.center, self.bounds);
        self.directions
            .by_ref()
            .find_map(|direction| direction.step(center, bounds))
    }
}

pub trait NeighborExt<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter;

    /// Values of the neighbors of `center`.
    fn iter_neighbor_cells(&self, center: Coord2) -> impl Iterator<Item = T> + '_;
}

impl<T: Copy> NeighborExt<T> for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        NeighborIter {
            center,
            bounds: (rows, cols).to_coord2(),
            directions: Direction::ALL.into_iter(),
        }
    }

    fn iter_neighbor_cells(&self, center: Coord2) -> impl Iterator<Item = T> + '_ {
        self.iter_neighbors(center)
            .map(|pos| self[pos.to_nd_index()])
    }
}

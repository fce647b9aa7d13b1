use smallvec::SmallVec;

use crate::coordinates::Coordinate;
use crate::units::{Height, Width};

pub type DirectionSmallVec = SmallVec<[Direction; 4]>;

/// The four moves available from a lattice cell.
///
/// `Up` increases `y`, `Down` decreases it, matching the layout the level payload is consumed in.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in their canonical order: up, right, down, left.
    pub fn all() -> DirectionSmallVec {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
            .iter()
            .cloned()
            .collect::<DirectionSmallVec>()
    }

    /// Offset from one lattice cell to the next lattice cell in this direction.
    ///
    /// Lattice cells are two apart so there is always a wall cell between two of them.
    #[inline]
    pub fn lattice_delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, 2),
            Direction::Right => (2, 0),
            Direction::Down => (0, -2),
            Direction::Left => (-2, 0),
        }
    }

    /// Offset of a single cell step, which from a lattice cell lands on the wall towards its neighbour.
    #[inline]
    pub fn step_delta(self) -> (isize, isize) {
        let (dx, dy) = self.lattice_delta();
        (dx / 2, dy / 2)
    }
}

/// Shift `coord` by `delta`.
/// Returns None if the result would fall outside `[0, width) x [0, height)`.
pub fn offset_coordinate(coord: Coordinate,
                         delta: (isize, isize),
                         width: Width,
                         height: Height)
                         -> Option<Coordinate> {
    let x = offset_axis(coord.x, delta.0, width.0)?;
    let y = offset_axis(coord.y, delta.1, height.0)?;
    Some(Coordinate::new(x, y))
}

fn offset_axis(value: usize, delta: isize, limit: usize) -> Option<usize> {
    let moved = if delta < 0 {
        value.checked_sub(delta.unsigned_abs())?
    } else {
        value.checked_add(delta as usize)?
    };

    if moved < limit {
        Some(moved)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_direction_order() {
        assert_eq!(&*Direction::all(),
                   &[Direction::Up, Direction::Right, Direction::Down, Direction::Left]);
    }

    #[test]
    fn wall_sits_halfway_to_lattice_neighbour() {
        for dir in Direction::all() {
            let (dx, dy) = dir.lattice_delta();
            let (wx, wy) = dir.step_delta();
            assert_eq!((wx * 2, wy * 2), (dx, dy));
            assert_eq!(dx.abs() + dy.abs(), 2);
        }
    }

    #[test]
    fn lattice_offsets_within_bounds() {
        let gc = |x, y| Coordinate::new(x, y);
        let check = |coord, dir: Direction, expected| {
            assert_eq!(offset_coordinate(coord, dir.lattice_delta(), Width(5), Height(5)),
                       expected);
        };
        check(gc(1, 1), Direction::Up, Some(gc(1, 3)));
        check(gc(1, 1), Direction::Right, Some(gc(3, 1)));
        check(gc(1, 1), Direction::Down, None);
        check(gc(1, 1), Direction::Left, None);

        check(gc(3, 3), Direction::Up, None);
        check(gc(3, 3), Direction::Right, None);
        check(gc(3, 3), Direction::Down, Some(gc(3, 1)));
        check(gc(3, 3), Direction::Left, Some(gc(1, 3)));
    }

    #[test]
    fn offset_to_the_last_row_and_column() {
        let gc = |x, y| Coordinate::new(x, y);
        assert_eq!(offset_coordinate(gc(2, 2), Direction::Up.lattice_delta(), Width(5), Height(5)),
                   Some(gc(2, 4)));
        assert_eq!(offset_coordinate(gc(2, 2), Direction::Right.lattice_delta(), Width(5), Height(5)),
                   Some(gc(4, 2)));
        assert_eq!(offset_coordinate(gc(0, 0), Direction::Down.lattice_delta(), Width(5), Height(5)),
                   None);
        assert_eq!(offset_coordinate(gc(usize::MAX, 0), Direction::Right.step_delta(), Width(5), Height(5)),
                   None);
    }
}

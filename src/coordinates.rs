use std::convert::From;

/// A cell position on a grid, `x` across the columns and `y` down the rows.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Coordinate {
        Coordinate { x, y }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from(x_y_pair: (usize, usize)) -> Coordinate {
        Coordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

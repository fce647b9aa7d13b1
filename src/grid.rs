use itertools::Itertools;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::ser::{Serialize, Serializer};
use std::fmt;

use crate::cells::{self, Direction};
use crate::coordinates::Coordinate;
use crate::units::{CellsCount, Height, Width};

pub const WALL: u8 = 1;
pub const PASSAGE: u8 = 0;

// Each adjacency is seen once by only looking up and to the right.
static FORWARD_DIRECTIONS: [Direction; 2] = [Direction::Up, Direction::Right];

/// A `width` x `height` maze layout. Each cell is either `WALL` (1) or `PASSAGE` (0).
///
/// Cells are addressed `[x][y]` and stored column by column, so the serialized form is a list of
/// columns.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    width: Width,
    height: Height,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, open cells: {}",
               self.width, self.height, self.open_cells_count())
    }
}

impl Grid {
    /// A grid where every cell is a wall.
    pub fn walled(width: Width, height: Height) -> Grid {
        Grid {
            cells: vec![WALL; width.0 * height.0],
            width,
            height,
        }
    }

    /// Build a grid from `[x][y]` indexed columns.
    ///
    /// Returns None unless the columns are non-empty, all the same length and only hold 0 or 1.
    pub fn from_columns(columns: &[Vec<u8>]) -> Option<Grid> {
        let height = columns.first()?.len();
        if height == 0 {
            return None;
        }
        let well_formed = columns.iter()
            .all(|column| column.len() == height &&
                          column.iter().all(|&cell| cell == WALL || cell == PASSAGE));
        if !well_formed {
            return None;
        }

        Some(Grid {
            cells: columns.concat(),
            width: Width(columns.len()),
            height: Height(height),
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.cells.len())
    }

    /// Is the coordinate within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.x < self.width.0 && coord.y < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional column major index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.x * self.height.0 + coord.y)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, coord: Coordinate) -> Option<u8> {
        self.coordinate_to_index(coord).map(|index| self.cells[index])
    }

    #[inline]
    pub fn is_passage(&self, coord: Coordinate) -> bool {
        self.get(coord) == Some(PASSAGE)
    }

    /// Anything outside the grid counts as wall.
    #[inline]
    pub fn is_wall(&self, coord: Coordinate) -> bool {
        !self.is_passage(coord)
    }

    /// Knock a cell through to a passage. Returns false if the coordinate is not on the grid.
    pub(crate) fn open(&mut self, coord: Coordinate) -> bool {
        if let Some(index) = self.coordinate_to_index(coord) {
            self.cells[index] = PASSAGE;
            true
        } else {
            false
        }
    }

    /// All coordinates, column by column.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> {
        (0..self.width.0)
            .cartesian_product(0..self.height.0)
            .map(Coordinate::from)
    }

    pub fn passages<'a>(&'a self) -> impl Iterator<Item = Coordinate> + 'a {
        self.iter().filter(move |&coord| self.is_passage(coord))
    }

    pub fn open_cells_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == PASSAGE).count()
    }

    /// Number of adjacent open cell pairs, i.e. the edges of the passage graph.
    pub fn links_count(&self) -> usize {
        self.passages()
            .map(|coord| self.forward_passage_neighbours(coord).count())
            .sum()
    }

    /// Cells as `[x][y]` indexed columns.
    pub fn columns(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.height.0.max(1))
            .map(|column| column.to_vec())
            .collect()
    }

    /// Undirected graph with a node per open cell and an edge per pair of adjacent open cells.
    pub fn passage_graph(&self) -> UnGraph<Coordinate, ()> {
        let open_count = self.open_cells_count();
        let mut graph = UnGraph::with_capacity(open_count, open_count);
        let mut node_indices: Vec<Option<NodeIndex>> = vec![None; self.cells.len()];

        for coord in self.passages() {
            if let Some(index) = self.coordinate_to_index(coord) {
                node_indices[index] = Some(graph.add_node(coord));
            }
        }

        let node_at = |coord| self.coordinate_to_index(coord).and_then(|index| node_indices[index]);
        for coord in self.passages() {
            for neighbour in self.forward_passage_neighbours(coord) {
                if let (Some(a), Some(b)) = (node_at(coord), node_at(neighbour)) {
                    graph.add_edge(a, b, ());
                }
            }
        }

        graph
    }

    /// A perfect maze: the open cells form a single tree, so exactly one simple path joins any two of them.
    pub fn is_perfect(&self) -> bool {
        let graph = self.passage_graph();
        graph.node_count() > 0 &&
        graph.node_count() == graph.edge_count() + 1 &&
        connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph)
    }

    fn forward_passage_neighbours<'a>(&'a self,
                                      coord: Coordinate)
                                      -> impl Iterator<Item = Coordinate> + 'a {
        FORWARD_DIRECTIONS
            .iter()
            .filter_map(move |dir| {
                cells::offset_coordinate(coord, dir.step_delta(), self.width, self.height)
            })
            .filter(move |&neighbour| self.is_passage(neighbour))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_BLOCK: char = '█';
        const OPEN: char = ' ';

        let rows = (0..self.height.0)
            .map(|y| {
                (0..self.width.0)
                    .map(|x| if self.is_passage(Coordinate::new(x, y)) { OPEN } else { WALL_BLOCK })
                    .collect::<String>()
            })
            .join("\n");
        write!(f, "{}", rows)
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.collect_seq(self.cells.chunks(self.height.0.max(1)))
    }
}

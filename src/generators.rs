use bit_set::BitSet;
use log::{debug, trace, warn};
use rand::Rng;

use crate::cells::{self, Direction, DirectionSmallVec};
use crate::coordinates::Coordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Where carving begins unless the options ask for a random start.
pub const FIXED_START: Coordinate = Coordinate { x: 1, y: 1 };

/// How the recursive backtracker picks its first cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StartMode {
    /// Always start at `(1, 1)`.
    Fixed,
    /// Start at a uniformly chosen odd-odd lattice cell away from the border.
    Random,
}

impl Default for StartMode {
    fn default() -> StartMode {
        StartMode::Fixed
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct GeneratorOptions {
    pub start_mode: StartMode,
}

impl GeneratorOptions {
    pub fn with_start_mode(start_mode: StartMode) -> GeneratorOptions {
        GeneratorOptions { start_mode }
    }
}

/// Generate a perfect maze of `width` x `height` cells carved from `(1, 1)`.
///
/// See `recursive_backtracker` for the details.
pub fn generate<R: Rng + ?Sized>(width: Width, height: Height, rng: &mut R) -> Result<Grid> {
    recursive_backtracker(width, height, &GeneratorOptions::default(), rng)
}

/// Carve a perfect maze with the randomized depth first (recursive backtracker) algorithm.
///
/// Cells are either walls (1) or passages (0). Rooms sit on a lattice two cells apart starting at an
/// odd offset, the cells in between are walls that get knocked through when the walk moves from one
/// room to the next. From the current cell an untried direction is picked uniformly at random until
/// one leads to an unvisited room inside the grid. When none does the walk backtracks to the most
/// recently carved room. A room is only ever carved into once, so the passages form a tree.
///
/// Output is fully determined by the `rng` stream.
///
/// Errors with `InvalidDimensions` if either dimension is zero.
/// Grids too small to hold the start cell (width or height below 2) are returned as solid wall,
/// and grids below 3x3 only ever open the start cell. Both are intentional, not failures.
pub fn recursive_backtracker<R: Rng + ?Sized>(width: Width,
                                              height: Height,
                                              options: &GeneratorOptions,
                                              rng: &mut R)
                                              -> Result<Grid> {
    if width.0 == 0 || height.0 == 0 {
        return Err(ErrorKind::InvalidDimensions(width.0, height.0).into());
    }

    let mut grid = Grid::walled(width, height);
    let start = start_cell(width, height, options.start_mode, rng);
    if !grid.is_valid_coordinate(start) {
        warn!("Start cell {:?} is outside the {}x{} grid, leaving it as solid wall",
              start, width.0, height.0);
        return Ok(grid);
    }

    let mut visited = BitSet::with_capacity(grid.size().0);
    let mut backtrack: Vec<Coordinate> = vec![start];
    let mut cursor = start;

    while !backtrack.is_empty() {
        if let Some(index) = grid.coordinate_to_index(cursor) {
            visited.insert(index);
        }
        grid.open(cursor);

        if let Some(next) = carve_towards_unvisited(&mut grid, &visited, cursor, rng) {
            backtrack.push(next);
            cursor = next;
        } else if let Some(previous) = backtrack.pop() {
            trace!("Dead end at {:?}, backtracking to {:?}", cursor, previous);
            cursor = previous;
        }
    }

    debug!("Generated {}x{} maze from {:?} with {} open cells",
           width.0, height.0, start, grid.open_cells_count());
    Ok(grid)
}

/// Try the directions from `cursor` in random order and carve through to the first unvisited
/// lattice neighbour found. Returns the neighbour, or None if `cursor` is a dead end.
fn carve_towards_unvisited<R: Rng + ?Sized>(grid: &mut Grid,
                                            visited: &BitSet,
                                            cursor: Coordinate,
                                            rng: &mut R)
                                            -> Option<Coordinate> {
    let (width, height) = (grid.width(), grid.height());
    let mut candidates: DirectionSmallVec = Direction::all();

    while !candidates.is_empty() {
        let direction = candidates.remove(rng.gen_range(0..candidates.len()));

        let neighbour = match cells::offset_coordinate(cursor, direction.lattice_delta(), width, height) {
            Some(coord) => coord,
            None => continue,
        };
        let neighbour_visited = grid.coordinate_to_index(neighbour)
            .map_or(true, |index| visited.contains(index));
        if neighbour_visited {
            continue;
        }

        // The wall lies between two in-bounds cells so it is always on the grid too.
        if let Some(wall) = cells::offset_coordinate(cursor, direction.step_delta(), width, height) {
            grid.open(wall);
        }
        grid.open(neighbour);
        return Some(neighbour);
    }

    None
}

fn start_cell<R: Rng + ?Sized>(width: Width, height: Height, mode: StartMode, rng: &mut R) -> Coordinate {
    match mode {
        StartMode::Fixed => FIXED_START,
        StartMode::Random => {
            match (interior_lattice_positions(width.0), interior_lattice_positions(height.0)) {
                (0, _) | (_, 0) => FIXED_START,
                (columns, rows) => {
                    Coordinate::new(rng.gen_range(0..columns) * 2 + 1,
                                    rng.gen_range(0..rows) * 2 + 1)
                }
            }
        }
    }
}

/// Count of odd positions in `[1, length - 2]`.
fn interior_lattice_positions(length: usize) -> usize {
    length.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;
    use rand::rngs::mock::StepRng;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::thread;

    use super::*;
    use crate::grid::{PASSAGE, WALL};

    fn zero_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn seeded(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn maze(w: usize, h: usize, seed: u64) -> Grid {
        generate(Width(w), Height(h), &mut seeded(seed)).expect("valid dimensions")
    }

    // Sizes of 2..=41 on either side.
    fn arbitrary_side(n: u8) -> usize {
        (n % 40) as usize + 2
    }

    // Every odd-odd cell on the grid, the rooms the walk can reach.
    fn lattice_rooms(w: usize, h: usize) -> usize {
        (w / 2) * (h / 2)
    }

    fn off_lattice_openings_are_walls_between_rooms(g: &Grid) -> bool {
        g.passages().all(|coord| {
            let Coordinate { x, y } = coord;
            match (x % 2, y % 2) {
                (1, 1) => true,
                (0, 0) => false,
                (1, 0) => y > 0 && g.is_passage(Coordinate::new(x, y - 1)) &&
                          g.is_passage(Coordinate::new(x, y + 1)),
                _ => x > 0 && g.is_passage(Coordinate::new(x - 1, y)) &&
                     g.is_passage(Coordinate::new(x + 1, y)),
            }
        })
    }

    #[test]
    fn zero_stream_regression_5x5() {
        let g = generate(Width(5), Height(5), &mut zero_rng()).expect("valid dimensions");
        assert_eq!(g.columns(),
                   vec![vec![1, 1, 1, 1, 1],
                        vec![1, 0, 0, 0, 1],
                        vec![1, 1, 1, 0, 1],
                        vec![1, 0, 0, 0, 1],
                        vec![1, 1, 1, 1, 1]]);

        let again = generate(Width(5), Height(5), &mut zero_rng()).expect("valid dimensions");
        assert_eq!(g, again);
    }

    #[test]
    fn generates_from_a_dyn_rng() {
        let mut boxed: Box<dyn RngCore> = Box::new(zero_rng());
        let rng: &mut dyn RngCore = &mut *boxed;
        let g = generate(Width(5), Height(5), rng).expect("valid dimensions");
        assert_eq!(g, generate(Width(5), Height(5), &mut zero_rng()).expect("valid dimensions"));

        let mut seeded_rng = seeded(21);
        let options = GeneratorOptions::with_start_mode(StartMode::Random);
        let g = recursive_backtracker(Width(13), Height(9), &options, &mut seeded_rng as &mut dyn RngCore)
            .expect("valid dimensions");
        assert!(g.is_perfect());
    }

    #[test]
    fn same_seed_same_maze() {
        for seed in 0..10 {
            assert_eq!(maze(25, 25, seed), maze(25, 25, seed));
        }
    }

    #[test]
    fn different_seeds_vary_the_maze() {
        assert_ne!(maze(25, 25, 1), maze(25, 25, 2));
    }

    #[test]
    fn level_sized_maze_is_perfect() {
        let g = maze(25, 25, 7);
        assert!(g.is_perfect());
        assert_eq!(g.open_cells_count(), g.links_count() + 1);
        assert_eq!(g.open_cells_count(), 2 * lattice_rooms(25, 25) - 1);
    }

    #[test]
    fn start_cell_is_open() {
        for &(w, h) in &[(2, 2), (2, 7), (3, 3), (4, 9), (25, 25)] {
            assert!(maze(w, h, 3).is_passage(FIXED_START));
        }
    }

    #[test]
    fn border_stays_wall_on_odd_dimensions() {
        let g = maze(21, 15, 11);
        for coord in g.iter() {
            let on_border = coord.x == 0 || coord.y == 0 || coord.x == 20 || coord.y == 14;
            if on_border {
                assert_eq!(g.get(coord), Some(WALL), "{:?} should be wall", coord);
            }
        }
    }

    #[test]
    fn zero_dimensions_are_invalid() {
        for &(w, h) in &[(0, 0), (0, 5), (5, 0)] {
            let result = generate(Width(w), Height(h), &mut zero_rng());
            match result {
                Err(Error(ErrorKind::InvalidDimensions(ew, eh), _)) => {
                    assert_eq!((ew, eh), (w, h));
                }
                other => panic!("expected InvalidDimensions, got {:?}", other),
            }
        }
    }

    #[test]
    fn one_by_one_is_solid_wall() {
        let g = generate(Width(1), Height(1), &mut zero_rng()).expect("valid dimensions");
        assert_eq!(g.columns(), vec![vec![WALL]]);
    }

    #[test]
    fn thin_grids_are_solid_wall() {
        for &(w, h) in &[(1, 9), (9, 1)] {
            let g = maze(w, h, 5);
            assert_eq!(g.open_cells_count(), 0);
        }
    }

    #[test]
    fn two_by_two_only_opens_the_start() {
        let g = generate(Width(2), Height(2), &mut zero_rng()).expect("valid dimensions");
        assert_eq!(g.columns(), vec![vec![WALL, WALL], vec![WALL, PASSAGE]]);
    }

    #[test]
    fn even_sized_grids_reach_every_room() {
        let g = maze(8, 6, 13);
        assert!(g.is_perfect());
        assert_eq!(g.open_cells_count(), 2 * lattice_rooms(8, 6) - 1);
    }

    #[test]
    fn random_start_is_an_interior_room() {
        let options = GeneratorOptions::with_start_mode(StartMode::Random);
        let mut rng = seeded(17);
        for _ in 0..200 {
            let start = start_cell(Width(9), Height(6), options.start_mode, &mut rng);
            assert_eq!(start.x % 2, 1);
            assert_eq!(start.y % 2, 1);
            assert!(start.x <= 7);
            assert!(start.y <= 4);
        }
    }

    #[test]
    fn random_start_falls_back_to_fixed_on_small_grids() {
        let mut rng = seeded(17);
        assert_eq!(start_cell(Width(2), Height(9), StartMode::Random, &mut rng), FIXED_START);
        assert_eq!(start_cell(Width(9), Height(1), StartMode::Random, &mut rng), FIXED_START);
    }

    #[test]
    fn random_start_mazes_are_perfect() {
        let options = GeneratorOptions::with_start_mode(StartMode::Random);
        for seed in 0..20 {
            let g = recursive_backtracker(Width(15), Height(11), &options, &mut seeded(seed))
                .expect("valid dimensions");
            assert!(g.is_perfect());
            assert_eq!(g.open_cells_count(), 2 * lattice_rooms(15, 11) - 1);
        }
    }

    #[test]
    fn default_options_start_fixed() {
        assert_eq!(GeneratorOptions::default().start_mode, StartMode::Fixed);
    }

    #[test]
    fn interior_lattice_position_counts() {
        let counts = (0..8).map(interior_lattice_positions).collect::<Vec<_>>();
        assert_eq!(counts, vec![0, 0, 0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn independent_generators_across_threads() {
        let handles = (0..4u64)
            .map(|seed| thread::spawn(move || maze(31, 31, seed)))
            .collect::<Vec<_>>();
        for (seed, handle) in handles.into_iter().enumerate() {
            let g = handle.join().expect("generator thread panicked");
            assert_eq!(g, maze(31, 31, seed as u64));
            assert!(g.is_perfect());
        }
    }

    #[test]
    fn quickcheck_mazes_are_perfect() {
        fn p(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (arbitrary_side(w), arbitrary_side(h));
            let g = maze(w, h, seed);
            g.is_perfect() &&
            g.open_cells_count() == g.links_count() + 1 &&
            g.open_cells_count() == 2 * lattice_rooms(w, h) - 1
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }

    #[test]
    fn quickcheck_carving_keeps_to_the_lattice() {
        fn p(w: u8, h: u8, seed: u64) -> bool {
            let g = maze(arbitrary_side(w), arbitrary_side(h), seed);
            off_lattice_openings_are_walls_between_rooms(&g)
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }

    #[test]
    fn quickcheck_grid_matches_requested_dimensions() {
        fn p(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 50 + 1, h as usize % 50 + 1);
            let g = maze(w, h, seed);
            g.width() == Width(w) && g.height() == Height(h) && g.columns().len() == w &&
            g.columns().iter().all(|column| column.len() == h)
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }
}

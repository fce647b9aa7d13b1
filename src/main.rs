use docopt::Docopt;
use log::debug;
use maze_level::{
    generators::{self, GeneratorOptions, StartMode},
    level::{GameId, Level},
    renderers,
    units::{Height, Width},
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_derive::Deserialize;
use std::{
    fs,
    path::Path,
};

const USAGE: &str = "Maze levels

Usage:
    maze_level_driver -h | --help
    maze_level_driver [render] [--width=<w>] [--height=<h>] [--seed=<s>] [--random-start] [--json] [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>]
    maze_level_driver level [--game-id=<id>] [--seed=<s>] [--random-start]
    maze_level_driver game-id [--seed=<s>]

Options:
    -h --help            Show this screen.
    --width=<w>          Maze width in cells [default: 25].
    --height=<h>         Maze height in cells [default: 25].
    --seed=<s>           Seed the random number generator for reproducible output.
    --random-start       Start carving from a random room instead of (1, 1).
    --json               Print the maze as JSON, a list of columns of 0 (passage) and 1 (wall).
    --text-out=<path>    Write the maze to a file instead of standard output.
    --image-out=<path>   Also render the maze to a PNG image file.
    --cell-pixels=<n>    Pixel count to render one maze cell in an image [default: 10] max 255.
    --game-id=<id>       Game id to echo back with the level. A new one is issued if not given.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_render: bool,
    cmd_level: bool,
    cmd_game_id: bool,
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u64>,
    flag_random_start: bool,
    flag_json: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_game_id: Option<String>,
}

mod errors {
    // The driver's own Error, ErrorKind, ResultExt and Result, chaining the library errors.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_level::errors::Error, ::maze_level::errors::ErrorKind);
        }

        foreign_links {
            Json(::serde_json::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: DriverArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    debug!("{:?}", args);

    let mut boxed_rng = driver_rng(args.flag_seed);
    let rng: &mut dyn RngCore = boxed_rng.as_mut();
    let start_mode = if args.flag_random_start {
        StartMode::Random
    } else {
        StartMode::Fixed
    };
    let options = GeneratorOptions::with_start_mode(start_mode);

    if args.cmd_game_id {
        let GameId(id) = GameId::issue(&mut *rng);
        println!("{}", id);
    } else if args.cmd_level {
        let game_id = match args.flag_game_id {
            Some(ref id) => GameId::from(id.as_str()),
            None => GameId::issue(&mut *rng),
        };
        let level = Level::generate(game_id, &options, &mut *rng)?;
        println!("{}", serde_json::to_string(&level)?);
    } else {
        render_maze(&args, &options, &mut *rng)?;
    }

    Ok(())
}

/// A seeded ChaCha stream when a seed is given so runs can be repeated, otherwise the thread rng.
fn driver_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(s) => Box::new(ChaCha8Rng::seed_from_u64(s)),
        None => Box::new(rand::thread_rng()),
    }
}

fn render_maze<R: Rng + ?Sized>(args: &DriverArgs, options: &GeneratorOptions, rng: &mut R) -> Result<()> {
    let grid = generators::recursive_backtracker(Width(args.flag_width),
                                                 Height(args.flag_height),
                                                 options,
                                                 rng)?;

    let output = if args.flag_json {
        serde_json::to_string(&grid)?
    } else {
        grid.to_string()
    };

    if args.flag_text_out.is_empty() {
        println!("{}", output);
    } else {
        fs::write(&args.flag_text_out, output)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        renderers::save_image(&grid, args.flag_cell_pixels, Path::new(&args.flag_image_out))?;
    }

    Ok(())
}

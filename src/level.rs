//! The level payload served to a game client: a freshly generated maze plus the game id it belongs to.

use rand::Rng;
use serde_derive::Serialize;

use crate::errors::*;
use crate::generators::{self, GeneratorOptions};
use crate::grid::Grid;
use crate::units::{Height, Width};

pub const LEVEL_WIDTH: Width = Width(25);
pub const LEVEL_HEIGHT: Height = Height(25);

/// Game ids are issued from `0..GAME_ID_LIMIT`.
pub const GAME_ID_LIMIT: u32 = 100;

/// Opaque game session identifier, echoed back unchanged with every level.
#[derive(Eq, PartialEq, Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Draw a new small numeric game id.
    pub fn issue<R: Rng + ?Sized>(rng: &mut R) -> GameId {
        GameId(rng.gen_range(0..GAME_ID_LIMIT).to_string())
    }
}

impl<'a> From<&'a str> for GameId {
    fn from(id: &'a str) -> GameId {
        GameId(id.to_owned())
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub maze: Grid,
    pub game_id: GameId,
}

impl Level {
    /// Generate a `LEVEL_WIDTH` x `LEVEL_HEIGHT` maze for the game.
    pub fn generate<R: Rng + ?Sized>(game_id: GameId, options: &GeneratorOptions, rng: &mut R) -> Result<Level> {
        let maze = generators::recursive_backtracker(LEVEL_WIDTH, LEVEL_HEIGHT, options, rng)?;
        Ok(Level { maze, game_id })
    }
}

#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod config;
pub mod coords;
pub mod error;
pub mod game;
pub mod players;
pub mod types;

pub use board::{Board, MapSource};
pub use config::RunConfig;
pub use error::SetupError;
pub use game::{Action, Game, GameConfig, GameEvent, GameOutcome, GameState};
pub use players::Policy;

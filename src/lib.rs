pub mod chain;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;

pub use error::{ArcadeError, Result};

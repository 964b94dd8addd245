//! Minesweeper game engine: board generation and reveal resolution, a game
//! session with first-move safety, and multilevel progression.
#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use progression::*;
pub use render::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod progression;
mod render;
mod session;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

/// Result of revealing a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// The game goes on, including when the tile was already revealed.
    Continue,
    /// A bomb was revealed.
    Loss,
    /// The last non-bomb tile was revealed.
    Win,
}

impl RevealOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Loss | Self::Win)
    }
}

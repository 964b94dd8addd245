use serde::{Deserialize, Serialize};

/// State of a single grid cell.
///
/// `is_bomb` and `neighbor_bombs` are fixed for one board generation and
/// `is_revealed` only ever goes from `false` to `true`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub neighbor_bombs: u8,
    pub is_bomb: bool,
    pub is_revealed: bool,
    pub has_flag: bool,
}

impl Tile {
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed
    }

    /// Whether a flag is currently displayed on this tile.
    pub const fn is_flagged(self) -> bool {
        self.has_flag && !self.is_revealed
    }

    /// Character used by the text rendering, `show_all` draws the tile as if revealed.
    pub const fn glyph(self, show_all: bool) -> char {
        if !(self.is_revealed || show_all) {
            return if self.has_flag { 'F' } else { '?' };
        }
        if self.is_bomb {
            return '*';
        }
        match self.neighbor_bombs {
            0 => '.',
            n => (b'0' + n) as char,
        }
    }
}

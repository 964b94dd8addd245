use core::fmt;

use crate::*;

/// Text rendering of a [`Board`], one glyph per tile with row and column labels.
#[derive(Copy, Clone, Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    show_all: bool,
}

impl Board {
    /// Renders the board; with `show_all` every tile is drawn as if revealed.
    pub fn display(&self, show_all: bool) -> BoardDisplay<'_> {
        BoardDisplay {
            board: self,
            show_all,
        }
    }
}

const fn label_width(count: Coord) -> usize {
    match count {
        0..=10 => 1,
        11..=100 => 2,
        _ => 3,
    }
}

impl fmt::Display for BoardDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.board.size();
        let row_width = label_width(rows);
        let col_width = label_width(cols);

        write!(f, "{:row_width$}", "")?;
        for col in 0..cols {
            write!(f, " {col:>col_width$}")?;
        }
        writeln!(f)?;

        for row in 0..rows {
            write!(f, "{row:>row_width$}")?;
            for col in 0..cols {
                let glyph = self.board[(row, col)].glyph(self.show_all);
                write!(f, " {glyph:>col_width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

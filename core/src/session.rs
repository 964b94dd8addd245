use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing <-> PlacingFlags
/// - Playing -> Won
/// - Playing -> Lost
///
/// Won and Lost are kept until [`GameSession::reset`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Playing,
    Won,
    Lost,
    /// Clicks toggle flags instead of revealing tiles.
    PlacingFlags,
}

impl SessionState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game on one board generation, guaranteeing that the first reveal is never a bomb.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    state: SessionState,
    first_move: bool,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            state: Default::default(),
            first_move: true,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Starts a new board generation with `bomb_count` bombs.
    pub fn start(&mut self, bomb_count: CellCount) -> Result<()> {
        self.board.initialize(bomb_count)?;
        self.reset();
        Ok(())
    }

    /// Starts a new board generation with the previous bomb count.
    pub fn restart(&mut self) -> Result<()> {
        self.board.reinitialize()?;
        self.reset();
        Ok(())
    }

    /// Back to the initial state, called whenever a new board generation begins.
    pub fn reset(&mut self) {
        self.state = SessionState::Playing;
        self.first_move = true;
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        let mut outcome = self.board.reveal(coords)?;

        if self.first_move {
            let mut regenerated = 0;
            while outcome == RevealOutcome::Loss {
                self.board.reinitialize()?;
                regenerated += 1;
                outcome = self.board.reveal(coords)?;
            }
            if regenerated > 0 {
                log::debug!(
                    "First move at {:?} hit a bomb, board regenerated {} times",
                    coords,
                    regenerated
                );
            }
            self.first_move = false;
        }

        match outcome {
            RevealOutcome::Win => self.end_game(true),
            RevealOutcome::Loss => self.end_game(false),
            RevealOutcome::Continue => {}
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        self.board.toggle_flag(coords)
    }

    /// Switches between normal play and flag placement, ignored once the game has ended.
    pub fn toggle_flag_mode(&mut self) -> MarkOutcome {
        self.state = match self.state {
            SessionState::Playing => SessionState::PlacingFlags,
            SessionState::PlacingFlags => SessionState::Playing,
            SessionState::Won | SessionState::Lost => {
                log::warn!("Flag mode toggle ignored, game already ended");
                return MarkOutcome::NoChange;
            }
        };
        MarkOutcome::Changed
    }

    /// Applies a click the way a pointer-driven front end interprets it.
    ///
    /// Clicks on revealed tiles or after the game ended do nothing, in flag
    /// mode a click toggles the flag, otherwise it reveals the tile
    /// regardless of any flag on it.
    pub fn interact(&mut self, coords: Coord2) -> Result<Interaction> {
        let tile = self.board.tile_at(coords)?;
        if self.state.is_finished() || tile.is_revealed {
            return Ok(Interaction::Ignored);
        }

        if self.state == SessionState::PlacingFlags {
            self.board.toggle_flag(coords)?;
            Ok(Interaction::Flagged)
        } else {
            self.reveal(coords).map(Interaction::Revealed)
        }
    }

    fn end_game(&mut self, won: bool) {
        self.state = if won {
            SessionState::Won
        } else {
            SessionState::Lost
        };
        log::debug!("Game ended, {}", if won { "won" } else { "lost" });
    }
}

/// What [`GameSession::interact`] did with a click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    Ignored,
    Flagged,
    Revealed(RevealOutcome),
}

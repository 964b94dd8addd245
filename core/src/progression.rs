use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    SingleGame,
    #[default]
    Multilevel,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Board dimension presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BoardSize {
    /// `(rows, cols)` of the preset.
    pub const fn dimensions(self) -> Coord2 {
        match self {
            Self::Small => (10, 18),
            Self::Medium => (15, 25),
            Self::Large => (20, 36),
        }
    }
}

/// Bomb density per difficulty, in percent of the board area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityTable {
    pub easy: u8,
    pub medium: u8,
    pub hard: u8,
}

impl DensityTable {
    pub const fn percent(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn validate(&self) -> Result<()> {
        if [self.easy, self.medium, self.hard].iter().any(|&p| p >= 100) {
            Err(GameError::InvalidConfig("bomb density must be below 100%"))
        } else {
            Ok(())
        }
    }
}

/// Data tables driving bomb counts and level progression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub board_size: BoardSize,
    pub single_game: DensityTable,
    pub multilevel: DensityTable,
    /// Number of levels in multilevel mode, a single game always has one.
    pub win_level: Level,
    /// Total bomb increase over all levels, in percent of the board area.
    pub increment_percent: u8,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            difficulty: Default::default(),
            board_size: Default::default(),
            single_game: DensityTable {
                easy: 4,
                medium: 14,
                hard: 24,
            },
            multilevel: DensityTable {
                easy: 3,
                medium: 9,
                hard: 15,
            },
            win_level: 5,
            increment_percent: 8,
        }
    }
}

impl ProgressionConfig {
    pub fn validate(&self) -> Result<()> {
        self.single_game.validate()?;
        self.multilevel.validate()?;
        if self.win_level == 0 {
            return Err(GameError::InvalidConfig("win level must be at least 1"));
        }
        if self.increment_percent >= 100 {
            return Err(GameError::InvalidConfig(
                "bomb increment must be below 100%",
            ));
        }
        Ok(())
    }

    /// Initial bomb count for a board of `area` tiles, truncated toward zero.
    pub fn bomb_count(&self, mode: Mode, difficulty: Difficulty, area: CellCount) -> CellCount {
        let table = match mode {
            Mode::SingleGame => &self.single_game,
            Mode::Multilevel => &self.multilevel,
        };
        percent_of(table.percent(difficulty), area)
    }

    pub fn win_level(&self, mode: Mode) -> Level {
        match mode {
            Mode::SingleGame => 1,
            Mode::Multilevel => self.win_level,
        }
    }

    /// Bombs added on every level advance.
    pub fn bomb_increment(&self, win_level: Level, area: CellCount) -> CellCount {
        percent_of(self.increment_percent, area) / CellCount::from(win_level.max(1))
    }
}

const fn percent_of(percent: u8, area: CellCount) -> CellCount {
    (percent as u32 * area as u32 / 100) as CellCount
}

/// Where the player stands in the level sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelStatus {
    InProgress,
    /// The level was won and more levels remain.
    LevelCompleted,
    /// The final level was won.
    AllLevelsCompleted,
    Lost,
}

/// Drives a [`GameSession`] through new games, board resizes and level advances.
#[derive(Clone, Debug)]
pub struct Progression {
    config: ProgressionConfig,
    session: GameSession,
    mode: Mode,
    difficulty: Difficulty,
    bomb_count: CellCount,
    bomb_increment: CellCount,
    win_level: Level,
    current_level: Level,
}

impl Progression {
    /// Starts a new game on the configured board size preset.
    pub fn new(config: ProgressionConfig, seed: u64) -> Result<Self> {
        let size = config.board_size.dimensions();
        Self::with_size(config, size, seed)
    }

    pub fn with_size(config: ProgressionConfig, size: Coord2, seed: u64) -> Result<Self> {
        config.validate()?;
        let board = Board::new(size, seed)?;
        let mut progression = Self {
            mode: config.mode,
            difficulty: config.difficulty,
            config,
            session: GameSession::new(board),
            bomb_count: 0,
            bomb_increment: 0,
            win_level: 1,
            current_level: 1,
        };
        progression.new_game()?;
        Ok(progression)
    }

    /// Recomputes the derived counts from the current settings and starts over at level 1.
    pub fn new_game(&mut self) -> Result<()> {
        let area = self.board().total_tiles();
        let bomb_count = self.config.bomb_count(self.mode, self.difficulty, area);
        let win_level = self.config.win_level(self.mode);

        self.session.start(bomb_count)?;
        self.bomb_count = bomb_count;
        self.win_level = win_level;
        self.bomb_increment = self.config.bomb_increment(win_level, area);
        self.current_level = 1;

        log::debug!(
            "New {:?} game on {:?}: {} bombs, {} levels, +{} bombs per level",
            self.mode,
            self.difficulty,
            self.bomb_count,
            self.win_level,
            self.bomb_increment
        );
        Ok(())
    }

    /// Moves to the next level with more bombs, only after the current level was won.
    pub fn advance_level(&mut self) -> Result<()> {
        if self.session.state() != SessionState::Won {
            return Err(GameError::LevelNotCompleted);
        }
        if self.current_level >= self.win_level {
            return Err(GameError::NoNextLevel);
        }

        let bomb_count = self
            .bomb_count
            .checked_add(self.bomb_increment)
            .ok_or(GameError::TooManyBombs)?;
        self.session.start(bomb_count)?;
        self.bomb_count = bomb_count;
        self.current_level += 1;

        log::debug!(
            "Level {}/{} with {} bombs",
            self.current_level,
            self.win_level,
            self.bomb_count
        );
        Ok(())
    }

    /// Resizes the board, then starts a new game.
    pub fn resize(&mut self, size: Coord2) -> Result<()> {
        self.session.board_mut().set_grid(size)?;
        self.new_game()
    }

    pub fn resize_preset(&mut self, preset: BoardSize) -> Result<()> {
        self.resize(preset.dimensions())
    }

    /// Takes effect on the next [`Progression::new_game`].
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Takes effect on the next [`Progression::new_game`].
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn level_status(&self) -> LevelStatus {
        match self.session.state() {
            SessionState::Won if self.current_level >= self.win_level => {
                LevelStatus::AllLevelsCompleted
            }
            SessionState::Won => LevelStatus::LevelCompleted,
            SessionState::Lost => LevelStatus::Lost,
            SessionState::Playing | SessionState::PlacingFlags => LevelStatus::InProgress,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    pub fn win_level(&self) -> Level {
        self.win_level
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn bomb_increment(&self) -> CellCount {
        self.bomb_increment
    }
}

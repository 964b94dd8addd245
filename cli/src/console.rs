use std::io::{self, BufRead, Write};
use thiserror::Error;
use tilesweep_core::{
    Board, BoardSize, Coord, Coord2, Difficulty, Interaction, LevelStatus, Mode, Progression,
    SessionState,
};

const HELP: &str = "\
Enter `row col` to reveal, `f row col` to flag, `m` for flag mode, `q` to quit.
`n` starts a new game, `mode single|multilevel` and `difficulty easy|medium|hard` apply from
the next new game, `size small|medium|large` resizes the board and starts over.";

const MODES: &[(&str, Mode)] = &[
    ("single", Mode::SingleGame),
    ("multilevel", Mode::Multilevel),
];
const DIFFICULTIES: &[(&str, Difficulty)] = &[
    ("easy", Difficulty::Easy),
    ("medium", Difficulty::Medium),
    ("hard", Difficulty::Hard),
];
const SIZES: &[(&str, BoardSize)] = &[
    ("small", BoardSize::Small),
    ("medium", BoardSize::Medium),
    ("large", BoardSize::Large),
];

/// A line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    FlagMode,
    NewGame,
    SetMode(Mode),
    SetDifficulty(Difficulty),
    Resize(BoardSize),
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("expected `row col`, `f row col`, `m`, `n`, `mode`, `difficulty`, `size` or `q`")]
    Malformed,
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("`{0}` is not one of: {1}")]
    UnknownChoice(String, String),
    #[error("({row}, {col}) is outside the board")]
    OutOfBounds { row: u32, col: u32 },
    #[error("({0}, {1}) is already revealed")]
    AlreadyRevealed(Coord, Coord),
}

pub fn parse_command(line: &str, board: &Board) -> Result<Command, CommandError> {
    use Command::*;

    let mut words = line.split_whitespace();
    let command = match words.next() {
        None => return Err(CommandError::Malformed),
        Some("q" | "quit") => Quit,
        Some("m") => FlagMode,
        Some("n" | "new") => NewGame,
        Some("mode") => SetMode(parse_choice(words.next(), MODES)?),
        Some("difficulty") => SetDifficulty(parse_choice(words.next(), DIFFICULTIES)?),
        Some("size") => Resize(parse_choice(words.next(), SIZES)?),
        Some("f" | "flag") => Flag(parse_coords(words.next(), words.next(), board)?),
        Some(row) => Reveal(parse_coords(Some(row), words.next(), board)?),
    };
    if words.next().is_some() {
        return Err(CommandError::Malformed);
    }

    if let Reveal(coords) | Flag(coords) = command {
        if !board[coords].is_hidden() {
            return Err(CommandError::AlreadyRevealed(coords.0, coords.1));
        }
    }
    Ok(command)
}

fn parse_coords(
    row: Option<&str>,
    col: Option<&str>,
    board: &Board,
) -> Result<Coord2, CommandError> {
    let (Some(row), Some(col)) = (row, col) else {
        return Err(CommandError::Malformed);
    };
    let row = parse_number(row)?;
    let col = parse_number(col)?;

    if row >= u32::from(board.rows()) || col >= u32::from(board.cols()) {
        return Err(CommandError::OutOfBounds { row, col });
    }
    Ok((row as Coord, col as Coord))
}

fn parse_number(word: &str) -> Result<u32, CommandError> {
    word.parse().map_err(|_| CommandError::NotANumber(word.to_owned()))
}

fn parse_choice<T: Copy>(word: Option<&str>, choices: &[(&str, T)]) -> Result<T, CommandError> {
    let word = word.ok_or(CommandError::Malformed)?;
    choices
        .iter()
        .find(|(name, _)| *name == word)
        .map(|&(_, value)| value)
        .ok_or_else(|| {
            let names: Vec<_> = choices.iter().map(|(name, _)| *name).collect();
            CommandError::UnknownChoice(word.to_owned(), names.join(", "))
        })
}

/// Text front end reading moves from `input` and drawing the board to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Plays until the player quits or the input ends.
    pub fn run(&mut self, progression: &mut Progression) -> anyhow::Result<()> {
        writeln!(self.output, "\n*****MINE SWEEPER****\n")?;
        writeln!(self.output, "{HELP}")?;

        loop {
            let status = progression.level_status();
            if status != LevelStatus::InProgress {
                write!(self.output, "\n{}", progression.board().display(true))?;
            }

            match status {
                LevelStatus::InProgress => {
                    self.print_status(progression)?;
                    write!(self.output, "{}", progression.board().display(false))?;
                    if !self.play_turn(progression)? {
                        break;
                    }
                }
                LevelStatus::LevelCompleted => {
                    writeln!(self.output, "\nLevel completed! Press Enter to continue.")?;
                    if self.read_line()?.is_none() {
                        break;
                    }
                    progression.advance_level()?;
                }
                LevelStatus::AllLevelsCompleted | LevelStatus::Lost => {
                    let message = if status == LevelStatus::Lost {
                        "You have lost."
                    } else {
                        "Congratulations, you have won!"
                    };
                    writeln!(self.output, "\n{message}\n")?;
                    if !self.confirm("Wanna try again? (y | n)")? {
                        break;
                    }
                    progression.new_game()?;
                }
            }
        }

        writeln!(self.output, "\nThank you for playing!")?;
        Ok(())
    }

    /// Reads and applies one command, returns `false` when the player is done.
    fn play_turn(&mut self, progression: &mut Progression) -> anyhow::Result<bool> {
        let prompt = match progression.session().state() {
            SessionState::PlacingFlags => "flag",
            _ => "reveal",
        };
        write!(self.output, "[{prompt}] > ")?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(false);
        };

        match parse_command(&line, progression.board()) {
            Ok(Command::Quit) => return Ok(false),
            Ok(Command::FlagMode) => {
                progression.session_mut().toggle_flag_mode();
            }
            Ok(Command::Flag(coords)) => {
                progression.session_mut().toggle_flag(coords)?;
            }
            Ok(Command::Reveal(coords)) => {
                let interaction = progression.session_mut().interact(coords)?;
                log::debug!("{:?} at {:?}", interaction, coords);
                if let Interaction::Revealed(outcome) = interaction {
                    if outcome.is_final() {
                        log::info!("Level {} ended: {:?}", progression.current_level(), outcome);
                    }
                }
            }
            Ok(Command::NewGame) => {
                progression.new_game()?;
                writeln!(self.output, "New game started.")?;
            }
            Ok(Command::SetMode(mode)) => {
                progression.set_mode(mode);
                self.print_next_game(progression)?;
            }
            Ok(Command::SetDifficulty(difficulty)) => {
                progression.set_difficulty(difficulty);
                self.print_next_game(progression)?;
            }
            Ok(Command::Resize(preset)) => {
                if self.confirm("This change will start a new game. Proceed? (y | n)")? {
                    progression.resize_preset(preset)?;
                    let (rows, cols) = progression.board().size();
                    writeln!(self.output, "New game started on a {rows}x{cols} board.")?;
                }
            }
            Err(err) => {
                log::debug!("Rejected input {:?}: {}", line.trim(), err);
                writeln!(self.output, "Invalid input: {err}")?;
            }
        }
        Ok(true)
    }

    fn print_status(&mut self, progression: &Progression) -> io::Result<()> {
        let board = progression.board();
        writeln!(
            self.output,
            "\nLEVEL {}/{} : {} bombs, {} tiles left, {} flags",
            progression.current_level(),
            progression.win_level(),
            progression.bomb_count(),
            board.tiles_remaining(),
            board.flag_count()
        )
    }

    fn print_next_game(&mut self, progression: &Progression) -> io::Result<()> {
        writeln!(
            self.output,
            "Next game: {:?} on {:?}, enter `n` to start it.",
            progression.mode(),
            progression.difficulty()
        )
    }

    /// Asks a yes/no question until answered, end of input counts as no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            writeln!(self.output, "{question}")?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            match line.trim() {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => continue,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tilesweep_core::{Difficulty, Mode, ProgressionConfig};

    fn play(progression: &mut Progression, input: &str) -> String {
        let mut console = Console::new(Cursor::new(input.to_owned()), Vec::new());
        console.run(progression).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn parses_commands() {
        let board = Board::with_bombs((3, 4), &[(0, 0)], 0).unwrap();

        assert_eq!(parse_command("1 2\n", &board), Ok(Command::Reveal((1, 2))));
        assert_eq!(parse_command(" f 2 3 ", &board), Ok(Command::Flag((2, 3))));
        assert_eq!(parse_command("m", &board), Ok(Command::FlagMode));
        assert_eq!(parse_command("n", &board), Ok(Command::NewGame));
        assert_eq!(
            parse_command("mode single", &board),
            Ok(Command::SetMode(Mode::SingleGame))
        );
        assert_eq!(
            parse_command("difficulty hard", &board),
            Ok(Command::SetDifficulty(Difficulty::Hard))
        );
        assert_eq!(
            parse_command("size large\n", &board),
            Ok(Command::Resize(BoardSize::Large))
        );
        assert_eq!(parse_command("quit", &board), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        let mut board = Board::with_bombs((3, 4), &[(0, 0)], 0).unwrap();
        board.reveal((0, 1)).unwrap();

        assert_eq!(parse_command("", &board), Err(CommandError::Malformed));
        assert_eq!(parse_command("1", &board), Err(CommandError::Malformed));
        assert_eq!(parse_command("1 2 3", &board), Err(CommandError::Malformed));
        assert_eq!(
            parse_command("x 2", &board),
            Err(CommandError::NotANumber("x".to_owned()))
        );
        assert_eq!(
            parse_command("3 0", &board),
            Err(CommandError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            parse_command("0 1", &board),
            Err(CommandError::AlreadyRevealed(0, 1))
        );
        assert_eq!(parse_command("mode", &board), Err(CommandError::Malformed));
        assert_eq!(
            parse_command("difficulty insane", &board),
            Err(CommandError::UnknownChoice(
                "insane".to_owned(),
                "easy, medium, hard".to_owned()
            ))
        );
        assert_eq!(parse_command("size small big", &board), Err(CommandError::Malformed));
    }

    #[test]
    fn plays_through_every_level() {
        // two tiles and no bombs, every first reveal wins the level
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (1, 2), 0).unwrap();
        assert_eq!(progression.bomb_count(), 0);

        let input = "0 0\n\n".repeat(4) + "0 0\nn\n";
        let output = play(&mut progression, &input);

        assert_eq!(output.matches("Level completed!").count(), 4);
        assert!(output.contains("LEVEL 5/5 : 0 bombs, 2 tiles left"));
        assert!(output.contains("Congratulations, you have won!"));
        assert!(output.ends_with("Thank you for playing!\n"));
        assert_eq!(progression.level_status(), LevelStatus::AllLevelsCompleted);
    }

    #[test]
    fn revealing_a_bomb_loses() {
        let config = ProgressionConfig {
            mode: Mode::SingleGame,
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let mut progression = Progression::with_size(config, (1, 5), 3).unwrap();
        assert_eq!(progression.bomb_count(), 1);

        // play a numbered tile first so the bomb can no longer move
        let (numbered, _) = progression
            .board()
            .iter()
            .find(|(_, tile)| !tile.is_bomb && tile.neighbor_bombs > 0)
            .unwrap();
        progression.session_mut().reveal(numbered).unwrap();
        let (bomb, _) = progression.board().iter().find(|(_, tile)| tile.is_bomb).unwrap();

        let output = play(&mut progression, &format!("{} {}\nmaybe\nn\n", bomb.0, bomb.1));

        assert!(output.contains("You have lost."));
        assert_eq!(output.matches("Wanna try again? (y | n)").count(), 2);
        assert!(output.contains('*'));
        assert_eq!(progression.session().state(), SessionState::Lost);
    }

    #[test]
    fn invalid_input_is_reported_and_play_continues() {
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (4, 4), 8).unwrap();

        let output = play(&mut progression, "9 9\nabc 1\nm\nf 1 1\nq\n");

        assert!(output.contains("Invalid input: (9, 9) is outside the board"));
        assert!(output.contains("Invalid input: `abc` is not a number"));
        assert!(output.contains("[flag] > "));
        assert!(output.contains("1 flags"));
        assert!(output.ends_with("Thank you for playing!\n"));
    }

    #[test]
    fn mode_and_difficulty_apply_on_next_new_game() {
        // 20 tiles: multilevel medium is 9% (1 bomb), single game hard 24% (4 bombs)
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (4, 5), 2).unwrap();

        let output = play(&mut progression, "mode single\ndifficulty hard\nq\n");

        assert!(output.contains("Next game: SingleGame on Medium"));
        assert!(output.contains("Next game: SingleGame on Hard"));
        assert_eq!(output.matches("LEVEL 1/5 : 1 bombs").count(), 3);
        assert_eq!(progression.bomb_count(), 1);
        assert_eq!(progression.win_level(), 5);

        let output = play(&mut progression, "n\nq\n");

        assert!(output.contains("New game started."));
        assert!(output.contains("LEVEL 1/1 : 4 bombs, 16 tiles left"));
        assert_eq!(progression.board().bomb_count(), 4);
        assert_eq!(progression.win_level(), 1);
    }

    #[test]
    fn resize_restarts_at_level_one() {
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (1, 2), 0).unwrap();

        let output = play(&mut progression, "0 0\n\nsize small\ny\nq\n");

        assert!(output.contains("LEVEL 2/5 : 0 bombs, 2 tiles left"));
        assert!(output.contains("This change will start a new game. Proceed? (y | n)"));
        assert!(output.contains("New game started on a 10x18 board."));
        assert!(output.contains("LEVEL 1/5 : 16 bombs, 164 tiles left, 0 flags"));
        assert_eq!(progression.board().size(), (10, 18));
        assert_eq!(progression.current_level(), 1);
        assert_eq!(progression.bomb_count(), 16);
    }

    #[test]
    fn declined_resize_keeps_the_game() {
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (4, 4), 8).unwrap();
        progression.session_mut().toggle_flag((1, 1)).unwrap();

        let output = play(&mut progression, "size large\nmaybe\nn\nq\n");

        assert_eq!(output.matches("Proceed? (y | n)").count(), 2);
        assert!(!output.contains("New game started"));
        assert_eq!(progression.board().size(), (4, 4));
        assert_eq!(progression.board().flag_count(), 1);
    }

    #[test]
    fn end_of_input_stops_the_game() {
        let mut progression =
            Progression::with_size(ProgressionConfig::default(), (4, 4), 8).unwrap();

        let output = play(&mut progression, "");

        assert!(output.contains("[reveal] > "));
        assert!(output.ends_with("Thank you for playing!\n"));
    }
}

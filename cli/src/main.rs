use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use rand::Rng;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io;
use std::path::PathBuf;
use tilesweep_core::{BoardSize, Difficulty, Mode, Progression};

use console::Console;

mod config;
mod console;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Single,
    Multilevel,
}

impl From<ModeArg> for Mode {
    fn from(other: ModeArg) -> Self {
        match other {
            ModeArg::Single => Mode::SingleGame,
            ModeArg::Multilevel => Mode::Multilevel,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(other: DifficultyArg) -> Self {
        match other {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SizeArg {
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for BoardSize {
    fn from(other: SizeArg) -> Self {
        match other {
            SizeArg::Small => BoardSize::Small,
            SizeArg::Medium => BoardSize::Medium,
            SizeArg::Large => BoardSize::Large,
        }
    }
}

/// Console minesweeper with multilevel progression.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// TOML file with the progression tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    #[arg(short, long, value_enum)]
    size: Option<SizeArg>,

    /// Seed for bomb placement, random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // stdout carries the board, log records go to stderr
    let log_config = ConfigBuilder::new().add_filter_allow_str("tilesweep").build();
    TermLogger::init(
        args.verbose.log_level_filter(),
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let mut config = config::load(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty.into();
    }
    if let Some(size) = args.size {
        config.board_size = size.into();
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Starting with seed {}", seed);

    let mut progression = Progression::new(config, seed)?;
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    console.run(&mut progression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_map_to_settings() {
        let args = Args::parse_from([
            "tilesweep", "-m", "single", "-d", "hard", "-s", "large", "--seed", "4", "-vv",
        ]);

        assert_eq!(Mode::from(args.mode.unwrap()), Mode::SingleGame);
        assert_eq!(Difficulty::from(args.difficulty.unwrap()), Difficulty::Hard);
        assert_eq!(BoardSize::from(args.size.unwrap()), BoardSize::Large);
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Debug);
    }
}

use crate::{Host, render, utc_now};
use chromatch_core as game;
use clap::{Args, ValueEnum};
use game::{MoveOutcome, RoundResult};
use std::io::{self, BufRead, Write};
use web_time::Instant;

#[derive(Args, Debug)]
pub(crate) struct GridArgs {
    /// Grid size: easy 3×3, medium 4×4, hard 5×5
    #[arg(short, long, value_enum, default_value_t)]
    mode: Difficulty,

    /// Win condition
    #[arg(short, long, value_enum, default_value_t)]
    rule: Rule,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for game::GridMode {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Easy => Self::Easy,
            Difficulty::Medium => Self::Medium,
            Difficulty::Hard => Self::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Rule {
    /// Every cell the same color
    #[default]
    Uniform,
    /// Exact number of target cells, none touching, within a move budget
    Isolated,
}

impl From<Rule> for game::WinRule {
    fn from(value: Rule) -> Self {
        match value {
            Rule::Uniform => Self::Uniform,
            Rule::Isolated => Self::IsolatedCount,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Input {
    Move(game::Coord2),
    Hint,
    Restart,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "h" | "hint" => return Input::Hint,
        "n" | "new" => return Input::Restart,
        "q" | "quit" => return Input::Quit,
        _ => {}
    }

    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse::<game::Coord>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) => Input::Move((row, col)),
        _ => Input::Unknown,
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

pub(crate) fn run(host: &mut Host, args: GridArgs) -> anyhow::Result<()> {
    let Host {
        store,
        remote,
        settings,
        seed,
    } = host;

    let config = game::GridConfig::new(args.mode.into(), args.rule.into());
    let mut engine = game::GridEngine::new(config, game::SeededColorSource::new(*seed), store);
    engine.restart();

    println!("Commands: <row> <col>, h(int), n(ew), q(uit)");
    print!("{}", render::grid(&engine.snapshot()));
    prompt()?;

    let mut lines = io::stdin().lock().lines();
    let mut pacer = game::TickPacer::new();
    let mut last = Instant::now();

    while let Some(line) = lines.next() {
        let line = line?;
        let now = Instant::now();
        for _ in 0..pacer.advance(now.duration_since(last)) {
            engine.on_tick();
        }
        last = now;

        match parse_input(&line) {
            Input::Move(coords) => match engine.apply_move(coords) {
                Ok(MoveOutcome::Changed) => {}
                Ok(MoveOutcome::Won(result)) => {
                    print!("{}", render::grid(&engine.snapshot()));
                    announce("Solved", result);
                    print!("Name for the leaderboard [{}]: ", settings.player_name());
                    io::stdout().flush()?;

                    let name = match lines.next().transpose()? {
                        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                        _ => settings.player_name().to_string(),
                    };
                    let timestamp = utc_now().timestamp().try_into().unwrap_or_default();
                    if let Ok(entry) = engine.submit_score(&name, timestamp) {
                        settings.player_name = Some(name);
                        game::publish(remote, settings.user_id.as_deref(), &entry);
                    }
                    println!("n for a new round, q to quit");
                    prompt()?;
                    continue;
                }
                Ok(MoveOutcome::OutOfMoves(result)) => announce("Out of moves", result),
                Err(err) => println!("{err}"),
            },
            Input::Hint => match engine.hint() {
                Some((row, col)) => println!("Try {row} {col}"),
                None => println!("No hint right now"),
            },
            Input::Restart => engine.restart(),
            Input::Quit => break,
            Input::Unknown => println!("Commands: <row> <col>, h(int), n(ew), q(uit)"),
        }

        print!("{}", render::grid(&engine.snapshot()));
        prompt()?;
    }

    Ok(())
}

fn announce(what: &str, result: RoundResult) {
    println!(
        "{what}: {} moves in {}s, score {}",
        result.moves, result.elapsed_secs, result.score
    );
}

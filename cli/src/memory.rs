use crate::{Host, render, utc_now};
use chromatch_core as game;
use clap::{Args, ValueEnum};
use game::{GameOverKind, MemoryEvent, TapOutcome};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use web_time::Instant;

#[derive(Args, Debug)]
pub(crate) struct MemoryArgs {
    /// Difficulty, or level-up for progressive play
    #[arg(short, long, value_enum, default_value_t)]
    mode: MemoryDifficulty,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum MemoryDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    LevelUp,
}

impl From<MemoryDifficulty> for game::MemoryMode {
    fn from(value: MemoryDifficulty) -> Self {
        match value {
            MemoryDifficulty::Easy => Self::Easy,
            MemoryDifficulty::Medium => Self::Medium,
            MemoryDifficulty::Hard => Self::Hard,
            MemoryDifficulty::LevelUp => Self::LevelUp,
        }
    }
}

/// Reads stdin on its own thread so the tick loop never blocks on input.
fn spawn_input() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Prints what the player needs to know about `events`, returns whether the board should be drawn.
fn report(events: &[MemoryEvent]) -> bool {
    let mut redraw = false;
    for event in events {
        match *event {
            MemoryEvent::RoundStarted { round } => {
                println!("Round {round}, memorize!");
                redraw = true;
            }
            MemoryEvent::RevealFinished => {
                println!("Tiles hidden, pick the target by number, q to end");
                redraw = true;
            }
            MemoryEvent::CountdownStarted { seconds } => println!("{seconds}s on the clock"),
            MemoryEvent::Second { remaining } if remaining <= 5 || remaining % 10 == 0 => {
                println!("{remaining}s left");
            }
            MemoryEvent::Matched { .. } => {
                println!("Match!");
                redraw = true;
            }
            MemoryEvent::Missed { .. } => {
                println!("Miss");
                redraw = true;
            }
            MemoryEvent::FlippedBack { .. } => redraw = true,
            MemoryEvent::RoundCleared { round } => println!("Round {round} cleared"),
            MemoryEvent::LevelUp { level } => println!("Level {level}!"),
            MemoryEvent::GameOver(_)
            | MemoryEvent::RevealProgress(_)
            | MemoryEvent::Second { .. } => {}
        }
    }
    redraw
}

pub(crate) fn run(host: &mut Host, args: MemoryArgs) -> anyhow::Result<()> {
    let Host {
        store,
        remote,
        settings,
        seed,
    } = host;

    let mode = game::MemoryMode::from(args.mode);
    let mut engine = game::MemoryEngine::new(mode, game::SeededColorSource::new(*seed), store);
    let input = spawn_input();

    let mut redraw = report(&engine.start_game(mode));
    let mut pacer = game::TickPacer::new();
    let mut last = Instant::now();

    let kind = loop {
        if redraw {
            print!("{}", render::memory(&engine.snapshot(), engine.config().grid_size));
            io::stdout().flush()?;
        }
        redraw = false;

        match input.recv_timeout(game::TICK) {
            Ok(line) => match line.trim() {
                "q" | "quit" => {
                    engine.end_game()?;
                }
                text => match text.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                    Some(index) => {
                        let id = engine.tiles().get(index).map(game::Tile::id);
                        let tapped = id
                            .ok_or(game::GameError::UnknownTile)
                            .and_then(|id| engine.tile_tapped(id));
                        match tapped {
                            Ok(TapOutcome::Flipped) => redraw = true,
                            Ok(TapOutcome::NoChange) => {}
                            Err(err) => println!("{err}"),
                        }
                    }
                    None => println!("Tile number or q"),
                },
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if engine.game_over().is_none() {
                    engine.end_game()?;
                }
            }
        }

        let now = Instant::now();
        for _ in 0..pacer.advance(now.duration_since(last)) {
            redraw |= report(&engine.on_tick());
        }
        last = now;

        if let Some(kind) = engine.game_over() {
            break kind;
        }
    };

    print!("{}", render::memory(&engine.snapshot(), engine.config().grid_size));
    match kind {
        GameOverKind::TimesUp => println!("Time's up! Final score {}", engine.score()),
        GameOverKind::NewHighScore => {
            println!("New high score: {}", engine.score());
            print!("Name for the leaderboard [{}]: ", settings.player_name());
            io::stdout().flush()?;

            let name = match input.recv() {
                Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => settings.player_name().to_string(),
            };
            let timestamp = utc_now().timestamp().try_into().unwrap_or_default();
            let entry = engine.submit_high_score(&name, timestamp)?;
            settings.player_name = Some(name);
            game::publish(remote, settings.user_id.as_deref(), &entry);
        }
    }

    Ok(())
}

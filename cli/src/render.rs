//! Text rendering of engine snapshots.

use chromatch_core as game;
use chrono::prelude::*;
use std::fmt::Write;

fn swatch(color: game::Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m  \x1b[0m", color.r, color.g, color.b)
}

pub(crate) fn grid(snapshot: &game::GridSnapshot<'_>) -> String {
    let mut out = String::new();
    let size = snapshot.board.dim().1;

    out.push_str("   ");
    for col in 0..size {
        let _ = write!(out, " {col}");
    }
    out.push('\n');

    for (row, cells) in snapshot.board.rows().into_iter().enumerate() {
        let _ = write!(out, "{row:>2} ");
        for (col, cell) in cells.iter().enumerate() {
            let hinted = snapshot.hint == Some((row as game::Coord, col as game::Coord));
            let _ = write!(out, "{}{}", if hinted { '>' } else { ' ' }, cell.symbol());
        }
        out.push('\n');
    }

    let target = snapshot.target.map_or('-', game::CellColor::symbol);
    let _ = write!(
        out,
        "target {target}  moves {}  score {}  time {}s",
        snapshot.moves, snapshot.score, snapshot.elapsed_secs
    );
    if let Some(left) = snapshot.moves_left {
        let _ = write!(out, "  left {left}  goal {} isolated", snapshot.target_count);
    }
    out.push('\n');
    if snapshot.best.score > 0 {
        let _ = writeln!(
            out,
            "best {} in {}s",
            snapshot.best.score, snapshot.best.time_secs
        );
    }
    out
}

pub(crate) fn memory(snapshot: &game::MemorySnapshot<'_>, grid_size: game::Coord) -> String {
    let mut out = String::new();
    let columns = usize::from(grid_size.max(1));

    if let Some(target) = snapshot.target {
        let _ = writeln!(out, "find {} {}", swatch(target), target);
    }
    for (index, tile) in snapshot.tiles.iter().enumerate() {
        if tile.is_revealed() {
            let _ = write!(out, "{:>2} {} ", index + 1, swatch(tile.color()));
        } else {
            let _ = write!(out, "{:>2} ?? ", index + 1);
        }
        if (index + 1) % columns == 0 {
            out.push('\n');
        }
    }

    let _ = write!(
        out,
        "round {}  matches {}/{}  score {}  time {}s",
        snapshot.round,
        snapshot.matches_found,
        snapshot.required_matches,
        snapshot.score,
        snapshot.time_remaining
    );
    if snapshot.mode.is_progressive() {
        let _ = write!(out, "  level {}", snapshot.level);
    }
    out.push('\n');
    out
}

pub(crate) fn leaderboard(board: &game::Leaderboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", board.mode_key());
    if board.is_empty() {
        out.push_str("  no scores yet\n");
    }
    for (rank, entry) in board.entries().iter().enumerate() {
        let secs = entry.timestamp.try_into().unwrap_or(i64::MAX);
        let when = DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = write!(out, "{:>3}. {:<16} {:>5}", rank + 1, entry.player_name, entry.score);
        if let Some(secs) = entry.elapsed_secs {
            let _ = write!(out, " {secs:>4}s");
        }
        let _ = writeln!(out, "  {when}");
    }
    out
}

pub(crate) fn stats(stats: &game::ScoreboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "total   {}", stats.total_score);
    let _ = writeln!(out, "played  {}", stats.modes_played);
    let _ = writeln!(out, "average {}", stats.average_score);
    if let Some((mode, score)) = &stats.best {
        let _ = writeln!(out, "best    {score} ({mode})");
    }
    out
}

//! Score rules of both games, kept free of engine state.

use crate::Coord;

pub const BASE_SCORE: u32 = 1000;
pub const SCORE_FLOOR: u32 = 100;
pub const UNIFORM_MOVE_PENALTY: u32 = 20;
pub const ISOLATED_MOVE_PENALTY: u32 = 15;

pub const MATCH_POINTS_PER_SIDE: u32 = 10;
pub const MISS_PENALTY: u32 = 5;
pub const LEVEL_BONUS: u32 = 50;

/// Grid game score after `moves` moves: `max(1000 - moves × penalty, 100)`.
pub const fn grid_score(moves: u32, move_penalty: u32) -> u32 {
    let score = BASE_SCORE.saturating_sub(moves.saturating_mul(move_penalty));
    if score < SCORE_FLOOR { SCORE_FLOOR } else { score }
}

pub const fn match_award(score: u32, grid_size: Coord) -> u32 {
    score.saturating_add(MATCH_POINTS_PER_SIDE * grid_size as u32)
}

/// Wrong tile, never drops below zero.
pub const fn miss_penalty(score: u32) -> u32 {
    score.saturating_sub(MISS_PENALTY)
}

pub const fn level_bonus(score: u32) -> u32 {
    score.saturating_add(LEVEL_BONUS)
}

/// Score change caused by a memory game event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScoreDelta {
    Match { grid_size: Coord },
    Miss,
    LevelUp,
}

pub const fn apply(score: u32, delta: ScoreDelta) -> u32 {
    match delta {
        ScoreDelta::Match { grid_size } => match_award(score, grid_size),
        ScoreDelta::Miss => miss_penalty(score),
        ScoreDelta::LevelUp => level_bonus(score),
    }
}

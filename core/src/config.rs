use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty of the grid game, the value is the side of the square grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridMode {
    Easy,
    Medium,
    Hard,
}

impl GridMode {
    pub const ALL: [GridMode; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn grid_size(self) -> Coord {
        match self {
            Self::Easy => 3,
            Self::Medium => 4,
            Self::Hard => 5,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Win condition used by the grid game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinRule {
    /// Every cell shows the same playable color.
    #[default]
    Uniform,
    /// Exactly `target_count` cells show the target color and none of them touch orthogonally.
    IsolatedCount,
}

impl WinRule {
    pub const fn move_penalty(self) -> u32 {
        match self {
            Self::Uniform => scoring::UNIFORM_MOVE_PENALTY,
            Self::IsolatedCount => scoring::ISOLATED_MOVE_PENALTY,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::IsolatedCount => "isolated",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    pub mode: GridMode,
    pub rule: WinRule,
}

impl GridConfig {
    pub const fn new(mode: GridMode, rule: WinRule) -> Self {
        Self { mode, rule }
    }

    pub const fn grid_size(&self) -> Coord {
        self.mode.grid_size()
    }

    pub const fn total_cells(&self) -> CellCount {
        let size = self.grid_size();
        cell_total(size)
    }

    /// `floor(N² × ratio)` with ratio 0.6, 0.7 and 0.8 for the three sizes.
    pub const fn target_count(&self) -> CellCount {
        let tenths = match self.mode {
            GridMode::Easy => 6,
            GridMode::Medium => 7,
            GridMode::Hard => 8,
        };
        self.total_cells() * tenths / 10
    }

    /// Move budget, only the isolated-count rule enforces one.
    pub const fn max_moves(&self) -> Option<CellCount> {
        match self.rule {
            WinRule::Uniform => None,
            WinRule::IsolatedCount => Some(match self.mode {
                GridMode::Easy => 15,
                GridMode::Medium => 20,
                GridMode::Hard => 25,
            }),
        }
    }

    pub const fn move_penalty(&self) -> u32 {
        self.rule.move_penalty()
    }

    /// Storage key for records of this configuration, for example `isolated-hard`.
    pub fn key(&self) -> alloc::string::String {
        alloc::format!("{}-{}", self.rule.key(), self.mode.key())
    }
}

/// Parameters of a single memory round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundConfig {
    pub grid_size: Coord,
    pub time_limit_secs: u32,
    pub reveal_time_ms: u32,
    pub required_matches: u8,
}

const LEVEL_TABLE: [RoundConfig; 6] = [
    RoundConfig::new(3, 30, 2000, 1),
    RoundConfig::new(3, 25, 1800, 1),
    RoundConfig::new(4, 25, 1600, 2),
    RoundConfig::new(4, 20, 1400, 2),
    RoundConfig::new(5, 20, 1200, 3),
    RoundConfig::new(5, 18, 1000, 3),
];

impl RoundConfig {
    pub const fn new(
        grid_size: Coord,
        time_limit_secs: u32,
        reveal_time_ms: u32,
        required_matches: u8,
    ) -> Self {
        Self {
            grid_size,
            time_limit_secs,
            reveal_time_ms,
            required_matches,
        }
    }

    /// Configuration of a progressive level, level 0 is treated as level 1.
    ///
    /// Levels past the table hold a 5×5 grid with three matches while the time limit and the
    /// reveal window shrink, bottoming out at 10 seconds and 0.5 seconds.
    pub const fn for_level(level: u32) -> Self {
        let level = if level == 0 { 1 } else { level };
        if level as usize <= LEVEL_TABLE.len() {
            return LEVEL_TABLE[level as usize - 1];
        }

        let time_limit_secs = 15u32.saturating_sub(level);
        let time_limit_secs = if time_limit_secs < 10 { 10 } else { time_limit_secs };
        let reveal_time_ms = 1000u32.saturating_sub((level - 6).saturating_mul(100));
        let reveal_time_ms = if reveal_time_ms < 500 { 500 } else { reveal_time_ms };

        Self::new(5, time_limit_secs, reveal_time_ms, 3)
    }

    pub const fn tile_count(&self) -> CellCount {
        cell_total(self.grid_size)
    }
}

/// Difficulty selection of the memory game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryMode {
    Easy,
    Medium,
    Hard,
    /// Progressive play escalating through levels within one session.
    LevelUp,
}

impl MemoryMode {
    pub const ALL: [MemoryMode; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::LevelUp];

    /// Configuration at session start.
    pub const fn config(self) -> RoundConfig {
        match self {
            Self::Easy => RoundConfig::new(3, 30, 2000, 1),
            Self::Medium => RoundConfig::new(4, 45, 1500, 2),
            Self::Hard => RoundConfig::new(5, 60, 1000, 3),
            Self::LevelUp => RoundConfig::for_level(1),
        }
    }

    pub const fn is_progressive(self) -> bool {
        matches!(self, Self::LevelUp)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::LevelUp => "Level Up",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "memory-easy",
            Self::Medium => "memory-medium",
            Self::Hard => "memory-hard",
            Self::LevelUp => "memory-levelup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_counts_follow_ratio() {
        let count = |mode| GridConfig::new(mode, WinRule::IsolatedCount).target_count();
        assert_eq!(count(GridMode::Easy), 5);
        assert_eq!(count(GridMode::Medium), 11);
        assert_eq!(count(GridMode::Hard), 20);
    }

    #[test]
    fn only_isolated_rule_has_move_budget() {
        assert_eq!(GridConfig::new(GridMode::Hard, WinRule::Uniform).max_moves(), None);
        assert_eq!(
            GridConfig::new(GridMode::Medium, WinRule::IsolatedCount).max_moves(),
            Some(20)
        );
    }

    #[test]
    fn config_key_combines_rule_and_mode() {
        assert_eq!(
            GridConfig::new(GridMode::Hard, WinRule::IsolatedCount).key(),
            "isolated-hard"
        );
    }

    #[test]
    fn first_level_matches_easy() {
        assert_eq!(RoundConfig::for_level(1), MemoryMode::Easy.config());
        assert_eq!(RoundConfig::for_level(0), RoundConfig::for_level(1));
    }

    #[test]
    fn levels_past_table_decay_to_floor() {
        assert_eq!(RoundConfig::for_level(7), RoundConfig::new(5, 10, 900, 3));
        assert_eq!(RoundConfig::for_level(9), RoundConfig::new(5, 10, 700, 3));
        assert_eq!(RoundConfig::for_level(11), RoundConfig::new(5, 10, 500, 3));
        assert_eq!(RoundConfig::for_level(40), RoundConfig::new(5, 10, 500, 3));
    }
}

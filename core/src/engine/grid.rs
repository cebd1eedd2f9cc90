use core::iter;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridState {
    /// Freshly created, all cells neutral and no target chosen.
    #[default]
    Idle,
    Active,
    Won,
    /// Move budget spent without winning.
    OutOfMoves,
}

impl GridState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::OutOfMoves)
    }
}

/// Terminal figures of a grid round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub score: u32,
    pub moves: u32,
    pub elapsed_secs: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Changed,
    Won(RoundResult),
    OutOfMoves(RoundResult),
}

impl MoveOutcome {
    /// Every accepted move recolors at least the tapped cell.
    pub const fn has_update(self) -> bool {
        true
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Changed)
    }
}

/// Read-only view of a grid round for renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSnapshot<'a> {
    pub board: &'a Array2<CellColor>,
    pub target: Option<CellColor>,
    pub target_count: CellCount,
    pub state: GridState,
    pub moves: u32,
    pub moves_left: Option<CellCount>,
    pub score: u32,
    pub elapsed_secs: u32,
    pub hint: Option<Coord2>,
    pub best: BestRecord,
}

/// Color-cycling grid puzzle: a tap advances the tapped cell and its orthogonal neighbors by one
/// color.
#[derive(Clone, Debug)]
pub struct GridEngine<C, S> {
    config: GridConfig,
    board: Array2<CellColor>,
    target: Option<CellColor>,
    state: GridState,
    moves: u32,
    moves_left: Option<CellCount>,
    score: u32,
    hint: Option<Coord2>,
    clock: Option<RoundTimer>,
    last_result: Option<RoundResult>,
    submitted: bool,
    best: BestRecord,
    tokens: TokenSource,
    source: C,
    store: S,
}

impl<C: ColorSource, S: KeyValueStore> GridEngine<C, S> {
    pub fn new(config: GridConfig, source: C, store: S) -> Self {
        let size = config.grid_size();
        let best = BestRecord::load(&store, &config.key());
        Self {
            config,
            board: Array2::default((size, size).to_nd_index()),
            target: None,
            state: Default::default(),
            moves: 0,
            moves_left: config.max_moves(),
            score: scoring::BASE_SCORE,
            hint: None,
            clock: None,
            last_result: None,
            submitted: false,
            best,
            tokens: Default::default(),
            source,
            store,
        }
    }

    /// Starts a fresh round of `config`: neutral grid, new random target, clock running.
    pub fn reset(&mut self, config: GridConfig) {
        if let Some(clock) = self.clock.as_mut() {
            clock.cancel();
        }

        let size = config.grid_size();
        self.config = config;
        self.board = Array2::from_elem((size, size).to_nd_index(), CellColor::Neutral);
        self.target = Some(self.source.pick_playable());
        self.state = GridState::Active;
        self.moves = 0;
        self.moves_left = config.max_moves();
        self.score = scoring::grid_score(0, config.move_penalty());
        self.hint = None;
        self.clock = Some(RoundTimer::stopwatch(self.tokens.issue()));
        self.last_result = None;
        self.submitted = false;
        self.best = BestRecord::load(&self.store, &config.key());

        log::debug!(
            "Grid round {} started, target {:?}, {} target cells, budget {:?}",
            config.key(),
            self.target,
            config.target_count(),
            self.moves_left
        );
    }

    /// Same configuration again.
    pub fn restart(&mut self) {
        self.reset(self.config);
    }

    pub fn apply_move(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;
        if self.moves_left == Some(0) {
            return Err(GameError::OutOfMoves);
        }

        let footprint: SmallVec<[Coord2; 5]> = self.footprint(coords).collect();
        for &pos in &footprint {
            let cell = &mut self.board[pos.to_nd_index()];
            *cell = cell.next();
        }
        log::trace!("{:?} tapped, {} cells recolored", coords, footprint.len());

        self.moves = self.moves.saturating_add(1);
        self.moves_left = self.moves_left.map(|left| left.saturating_sub(1));
        self.score = scoring::grid_score(self.moves, self.config.move_penalty());
        self.hint = None;

        Ok(if self.check_win() {
            MoveOutcome::Won(self.finish(GridState::Won))
        } else if self.moves_left == Some(0) {
            MoveOutcome::OutOfMoves(self.finish(GridState::OutOfMoves))
        } else {
            MoveOutcome::Changed
        })
    }

    /// Cells a tap at `coords` would recolor, empty when out of bounds.
    pub fn move_footprint(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.validate_coords(coords)
            .ok()
            .into_iter()
            .flat_map(|coords| self.footprint(coords))
    }

    pub fn check_win(&self) -> bool {
        rules::is_satisfied(
            self.config.rule,
            &self.board,
            self.target,
            self.config.target_count(),
        )
    }

    /// Suggests a cell worth changing and remembers it until the next move.
    pub fn hint(&mut self) -> Option<Coord2> {
        if !self.state.is_active() {
            return None;
        }
        let hint = match self.config.rule {
            WinRule::Uniform => {
                // any cell unlike the top left one keeps the board from being uniform
                let reference = *self.board.first()?;
                let candidates = rules::uniform_hint_candidates(&self.board, reference);
                if candidates.is_empty() {
                    None
                } else {
                    candidates
                        .get(self.source.pick_index(candidates.len()))
                        .copied()
                }
            }
            WinRule::IsolatedCount => rules::isolated_hint(&self.board, self.target?),
        };

        log::debug!("Hint: {:?}", hint);
        self.hint = hint;
        hint
    }

    pub fn on_tick(&mut self) -> TimerEvent {
        match self.clock.as_mut() {
            Some(clock) if self.state.is_active() => clock.tick(),
            _ => TimerEvent::Idle,
        }
    }

    /// Enters a won round into the leaderboard of its mode.
    pub fn submit_score(&mut self, player_name: &str, timestamp: u64) -> Result<LeaderboardEntry> {
        let result = match (self.state, self.last_result) {
            (GridState::Won, Some(result)) if !self.submitted => result,
            _ => return Err(GameError::NothingToSubmit),
        };

        let mode_key = self.config.key();
        let entry = LeaderboardEntry {
            player_name: player_name.into(),
            score: result.score,
            elapsed_secs: Some(result.elapsed_secs),
            mode: mode_key.clone(),
            timestamp,
        };

        let mut board = Leaderboard::load(&self.store, &mode_key);
        let rank = board.insert(entry.clone());
        if let Err(err) = board.save(&mut self.store) {
            log::warn!("Could not save leaderboard {}: {}", mode_key, err);
        }
        log::debug!("Submitted {} for {}, rank {:?}", result.score, mode_key, rank);

        self.submitted = true;
        Ok(entry)
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.grid_size()
    }

    /// Color at `coords`, `None` outside the board.
    pub fn cell_at(&self, coords: Coord2) -> Option<CellColor> {
        self.board.get(coords.to_nd_index()).copied()
    }

    pub fn board(&self) -> &Array2<CellColor> {
        &self.board
    }

    pub fn target(&self) -> Option<CellColor> {
        self.target
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn moves_left(&self) -> Option<CellCount> {
        self.moves_left
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.as_ref().map_or(0, RoundTimer::elapsed_secs)
    }

    pub fn hint_position(&self) -> Option<Coord2> {
        self.hint
    }

    pub fn best(&self) -> BestRecord {
        self.best
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, GridState::Won)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot {
            board: &self.board,
            target: self.target,
            target_count: self.config.target_count(),
            state: self.state,
            moves: self.moves,
            moves_left: self.moves_left,
            score: self.score,
            elapsed_secs: self.elapsed_secs(),
            hint: self.hint,
            best: self.best,
        }
    }

    fn finish(&mut self, state: GridState) -> RoundResult {
        if let Some(clock) = self.clock.as_mut() {
            clock.cancel();
        }
        self.state = state;

        let result = RoundResult {
            score: self.score,
            moves: self.moves,
            elapsed_secs: self.elapsed_secs(),
        };
        self.last_result = Some(result);
        log::debug!("Grid round ended {:?}: {:?}", state, result);

        if matches!(state, GridState::Won) {
            let improvement = self.best.offer(result.score, Some(result.elapsed_secs));
            if improvement.any() {
                let mode_key = self.config.key();
                if let Err(err) = self.best.save(&mut self.store, &mode_key) {
                    log::warn!("Could not save best record for {}: {}", mode_key, err);
                }
            }
        }

        result
    }

    fn footprint(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        iter::once(coords).chain(self.board.iter_neighbors(coords))
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_active(&self) -> Result<()> {
        match self.state {
            GridState::Active => Ok(()),
            GridState::Idle => Err(GameError::NotStarted),
            GridState::Won => Err(GameError::AlreadyEnded),
            GridState::OutOfMoves => Err(GameError::OutOfMoves),
        }
    }
}

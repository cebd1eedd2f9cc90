use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Delay between flipping a tapped tile and judging it.
pub const JUDGE_DELAY_MS: u32 = 300;
/// Delay between the final match of a round and the next round or level.
pub const ADVANCE_DELAY_MS: u32 = 500;
/// How long a missed tile stays face-up after being judged.
pub const FLIP_BACK_DELAY_MS: u32 = 1000;
/// Pause between a level up and the next reveal.
pub const LEVEL_TRANSITION_MS: u32 = 1500;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryState {
    #[default]
    Idle,
    /// Tiles face-up, input rejected.
    Revealing,
    /// Tiles face-down, taps accepted.
    Guessing,
    /// Every required match found, waiting to advance.
    RoundCleared,
    /// Progressive mode only, waiting to regenerate at the new level.
    LevelTransition,
    GameOver,
}

impl MemoryState {
    pub const fn is_playing(self) -> bool {
        !matches!(self, Self::Idle | Self::GameOver)
    }
}

/// How a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverKind {
    /// Final score made the mode's leaderboard, the host should ask for a name.
    NewHighScore,
    TimesUp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tile was already face-up.
    NoChange,
    /// Tile flipped face-up, judgement pending.
    Flipped,
}

impl TapOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Flipped)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MemoryEvent {
    RoundStarted { round: u32 },
    RevealProgress(f32),
    RevealFinished,
    CountdownStarted { seconds: u32 },
    Second { remaining: u32 },
    Matched { tile: TileId, matches_found: u8 },
    Missed { tile: TileId },
    FlippedBack { tile: TileId },
    RoundCleared { round: u32 },
    LevelUp { level: u32 },
    GameOver(GameOverKind),
}

pub type MemoryEvents = SmallVec<[MemoryEvent; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Resolution {
    Judge(TileId),
    FlipBack(TileId),
    Advance,
    Regenerate,
}

/// Delayed action, dropped if its round generation is no longer current when it comes due.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PendingResolution {
    kind: Resolution,
    generation: u32,
    resolve_at: u64,
}

/// Read-only view of a memory session for renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct MemorySnapshot<'a> {
    pub tiles: &'a [Tile],
    pub target: Option<Rgb>,
    pub state: MemoryState,
    pub mode: MemoryMode,
    pub score: u32,
    pub round: u32,
    pub level: u32,
    pub matches_found: u8,
    pub required_matches: u8,
    pub time_remaining: u32,
    pub reveal_progress: f32,
    pub game_over: Option<GameOverKind>,
}

/// Memorize-then-find game: tiles are shown briefly, then the player taps the ones showing the
/// target color before the session countdown runs out.
#[derive(Clone, Debug)]
pub struct MemoryEngine<C, S> {
    mode: MemoryMode,
    config: RoundConfig,
    state: MemoryState,
    tiles: Vec<Tile>,
    target: Option<Rgb>,
    score: u32,
    round: u32,
    level: u32,
    matches_found: u8,
    required_matches: u8,
    generation: u32,
    next_tile_id: u32,
    reveal: Option<RoundTimer>,
    countdown: Option<RoundTimer>,
    pending: SmallVec<[PendingResolution; 4]>,
    now: u64,
    game_over: Option<GameOverKind>,
    submitted: bool,
    tokens: TokenSource,
    source: C,
    store: S,
}

impl<C: ColorSource, S: KeyValueStore> MemoryEngine<C, S> {
    pub fn new(mode: MemoryMode, source: C, store: S) -> Self {
        Self {
            mode,
            config: mode.config(),
            state: Default::default(),
            tiles: Vec::new(),
            target: None,
            score: 0,
            round: 0,
            level: 1,
            matches_found: 0,
            required_matches: mode.config().required_matches,
            generation: 0,
            next_tile_id: 0,
            reveal: None,
            countdown: None,
            pending: SmallVec::new(),
            now: 0,
            game_over: None,
            submitted: false,
            tokens: Default::default(),
            source,
            store,
        }
    }

    /// Starts a session of `mode` from zero and enters its first round.
    pub fn start_game(&mut self, mode: MemoryMode) -> MemoryEvents {
        self.reset();
        self.mode = mode;
        self.config = mode.config();
        log::debug!("Memory session {} started: {:?}", mode.key(), self.config);

        let mut events = MemoryEvents::new();
        self.begin_round(&mut events);
        events
    }

    /// Abandons the current round and deals the next one at the current configuration.
    pub fn start_new_round(&mut self) -> Result<MemoryEvents> {
        self.check_playing()?;
        let mut events = MemoryEvents::new();
        self.begin_round(&mut events);
        Ok(events)
    }

    /// Replaces the tiles with a fresh shuffled layout and returns its target color.
    ///
    /// Any delayed resolution of the previous layout is dropped.
    pub(crate) fn generate_grid(&mut self) -> Rgb {
        self.invalidate_pending();

        let layout = generator::generate_tiles(
            &mut self.source,
            self.config,
            TileId(self.next_tile_id),
        );
        let count: u32 = layout.tiles.len().try_into().unwrap_or(u32::MAX);
        self.next_tile_id = self.next_tile_id.wrapping_add(count);
        self.tiles = layout.tiles;
        self.target = Some(layout.target);

        log::debug!(
            "Round {} dealt {} tiles, target {}",
            self.round,
            self.tiles.len(),
            layout.target
        );
        layout.target
    }

    pub fn tile_tapped(&mut self, id: TileId) -> Result<TapOutcome> {
        match self.state {
            MemoryState::Guessing => {}
            MemoryState::Idle => return Err(GameError::NotStarted),
            MemoryState::GameOver => return Err(GameError::AlreadyEnded),
            _ => return Err(GameError::NotAccepting),
        }

        let tile = self.tile_mut(id).ok_or(GameError::UnknownTile)?;
        if tile.is_revealed() {
            return Ok(TapOutcome::NoChange);
        }
        tile.flip(TileFace::Revealed);
        log::trace!("Tile {:?} tapped", id);

        self.schedule(Resolution::Judge(id), JUDGE_DELAY_MS);
        Ok(TapOutcome::Flipped)
    }

    /// Advances every clock by one tick and resolves whatever came due.
    pub fn on_tick(&mut self) -> MemoryEvents {
        let mut events = MemoryEvents::new();
        if !self.state.is_playing() {
            return events;
        }
        self.now += 1;

        match self.countdown.as_mut().map_or(TimerEvent::Idle, RoundTimer::tick) {
            TimerEvent::Second { remaining } => events.push(MemoryEvent::Second { remaining }),
            TimerEvent::Expired => {
                let kind = self.finish_game();
                events.push(MemoryEvent::GameOver(kind));
                return events;
            }
            _ => {}
        }

        if matches!(self.state, MemoryState::Revealing) {
            match self.reveal.as_mut().map_or(TimerEvent::Idle, RoundTimer::tick) {
                TimerEvent::Progress(fraction) => {
                    events.push(MemoryEvent::RevealProgress(fraction))
                }
                TimerEvent::Completed => self.finish_reveal(&mut events),
                _ => {}
            }
        }

        let now = self.now;
        let due: SmallVec<[PendingResolution; 4]> = self
            .pending
            .iter()
            .copied()
            .filter(|pending| pending.resolve_at <= now)
            .collect();
        self.pending.retain(|pending| pending.resolve_at > now);

        for pending in due {
            if pending.generation != self.generation {
                log::trace!("Dropping stale {:?}", pending.kind);
                continue;
            }
            self.resolve(pending.kind, &mut events);
        }

        events
    }

    /// Moves a progressive session to the next level and schedules its first round.
    pub fn level_up(&mut self) -> Result<MemoryEvents> {
        self.check_playing()?;
        if !self.mode.is_progressive() {
            return Err(GameError::NotAccepting);
        }

        let mut events = MemoryEvents::new();
        self.enter_next_level(&mut events);
        Ok(events)
    }

    /// Stops the session and reports whether the score made the leaderboard.
    pub fn end_game(&mut self) -> Result<GameOverKind> {
        self.check_playing()?;
        Ok(self.finish_game())
    }

    /// Enters the finished session's score into the mode's leaderboard.
    pub fn submit_high_score(
        &mut self,
        player_name: &str,
        timestamp: u64,
    ) -> Result<LeaderboardEntry> {
        if self.game_over != Some(GameOverKind::NewHighScore) || self.submitted {
            return Err(GameError::NothingToSubmit);
        }

        let mode_key = self.mode.key();
        let entry = LeaderboardEntry {
            player_name: player_name.into(),
            score: self.score,
            elapsed_secs: None,
            mode: mode_key.into(),
            timestamp,
        };

        let mut board = Leaderboard::load(&self.store, mode_key);
        let rank = board.insert(entry.clone());
        if let Err(err) = board.save(&mut self.store) {
            log::warn!("Could not save leaderboard {}: {}", mode_key, err);
        }

        let mut best = BestRecord::load(&self.store, mode_key);
        if best.offer(self.score, None).any() {
            if let Err(err) = best.save(&mut self.store, mode_key) {
                log::warn!("Could not save best record for {}: {}", mode_key, err);
            }
        }

        log::debug!("Submitted {} for {}, rank {:?}", self.score, mode_key, rank);
        self.submitted = true;
        Ok(entry)
    }

    /// Back to idle, keeping the selected mode. Every timer and pending resolution is cancelled.
    pub fn reset(&mut self) {
        self.cancel_timers();
        self.reveal = None;
        self.countdown = None;
        self.invalidate_pending();
        self.config = self.mode.config();
        self.state = MemoryState::Idle;
        self.tiles.clear();
        self.target = None;
        self.score = 0;
        self.round = 0;
        self.level = 1;
        self.matches_found = 0;
        self.required_matches = self.config.required_matches;
        self.game_over = None;
        self.submitted = false;
    }

    pub fn state(&self) -> MemoryState {
        self.state
    }

    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id() == id)
    }

    pub fn target(&self) -> Option<Rgb> {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn matches_found(&self) -> u8 {
        self.matches_found
    }

    pub fn required_matches(&self) -> u8 {
        self.required_matches
    }

    /// Seconds left on the session countdown, the full limit until it starts.
    pub fn time_remaining(&self) -> u32 {
        self.countdown
            .as_ref()
            .map_or(self.config.time_limit_secs, RoundTimer::remaining_secs)
    }

    pub fn reveal_progress(&self) -> f32 {
        self.reveal.as_ref().map_or(0.0, RoundTimer::progress_fraction)
    }

    pub fn game_over(&self) -> Option<GameOverKind> {
        self.game_over
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshot(&self) -> MemorySnapshot<'_> {
        MemorySnapshot {
            tiles: &self.tiles,
            target: self.target,
            state: self.state,
            mode: self.mode,
            score: self.score,
            round: self.round,
            level: self.level,
            matches_found: self.matches_found,
            required_matches: self.required_matches,
            time_remaining: self.time_remaining(),
            reveal_progress: self.reveal_progress(),
            game_over: self.game_over,
        }
    }

    fn begin_round(&mut self, events: &mut MemoryEvents) {
        self.round += 1;
        self.matches_found = 0;
        self.required_matches = self.config.required_matches;
        self.generate_grid();
        self.reveal_colors_temporarily();
        events.push(MemoryEvent::RoundStarted { round: self.round });
    }

    fn reveal_colors_temporarily(&mut self) {
        for tile in &mut self.tiles {
            tile.flip(TileFace::Revealed);
        }
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.cancel();
        }
        self.reveal = Some(RoundTimer::progress(
            self.tokens.issue(),
            self.config.reveal_time_ms,
        ));
        self.state = MemoryState::Revealing;
    }

    fn finish_reveal(&mut self, events: &mut MemoryEvents) {
        for tile in self.tiles.iter_mut().filter(|tile| !tile.is_matched()) {
            tile.flip(TileFace::Hidden);
        }
        self.state = MemoryState::Guessing;
        events.push(MemoryEvent::RevealFinished);

        // session countdown starts with the first round only
        if self.countdown.is_none() {
            let seconds = self.config.time_limit_secs;
            self.countdown = Some(RoundTimer::countdown(self.tokens.issue(), seconds));
            events.push(MemoryEvent::CountdownStarted { seconds });
        }
    }

    fn resolve(&mut self, kind: Resolution, events: &mut MemoryEvents) {
        match kind {
            Resolution::Judge(id) => self.judge(id, events),
            Resolution::FlipBack(id) => {
                if let Some(tile) = self.tile_mut(id).filter(|tile| !tile.is_matched()) {
                    tile.flip(TileFace::Hidden);
                    events.push(MemoryEvent::FlippedBack { tile: id });
                }
            }
            Resolution::Advance => {
                if self.mode.is_progressive() {
                    self.enter_next_level(events);
                } else {
                    self.begin_round(events);
                }
            }
            Resolution::Regenerate => self.begin_round(events),
        }
    }

    fn judge(&mut self, id: TileId, events: &mut MemoryEvents) {
        let target = self.target;
        let Some(tile) = self.tile_mut(id) else {
            log::warn!("Judging unknown tile {:?}", id);
            return;
        };
        if tile.is_matched() {
            return;
        }

        if Some(tile.color()) == target {
            tile.mark_matched();
            self.matches_found = self.matches_found.saturating_add(1);
            self.score = scoring::apply(
                self.score,
                ScoreDelta::Match {
                    grid_size: self.config.grid_size,
                },
            );
            events.push(MemoryEvent::Matched {
                tile: id,
                matches_found: self.matches_found,
            });

            if self.matches_found >= self.required_matches {
                self.state = MemoryState::RoundCleared;
                self.invalidate_pending();
                self.schedule(Resolution::Advance, ADVANCE_DELAY_MS);
                events.push(MemoryEvent::RoundCleared { round: self.round });
                log::debug!("Round {} cleared, score {}", self.round, self.score);
            }
        } else {
            self.score = scoring::apply(self.score, ScoreDelta::Miss);
            self.schedule(Resolution::FlipBack(id), FLIP_BACK_DELAY_MS);
            events.push(MemoryEvent::Missed { tile: id });
        }
    }

    fn enter_next_level(&mut self, events: &mut MemoryEvents) {
        self.level = self.level.saturating_add(1);
        self.config = RoundConfig::for_level(self.level);
        self.score = scoring::apply(self.score, ScoreDelta::LevelUp);

        self.cancel_timers();
        let seconds = self.config.time_limit_secs;
        self.countdown = Some(RoundTimer::countdown(self.tokens.issue(), seconds));

        self.state = MemoryState::LevelTransition;
        self.invalidate_pending();
        self.schedule(Resolution::Regenerate, LEVEL_TRANSITION_MS);

        log::debug!("Level {}: {:?}", self.level, self.config);
        events.push(MemoryEvent::LevelUp { level: self.level });
        events.push(MemoryEvent::CountdownStarted { seconds });
    }

    fn finish_game(&mut self) -> GameOverKind {
        self.cancel_timers();
        self.invalidate_pending();
        self.state = MemoryState::GameOver;

        let board = Leaderboard::load(&self.store, self.mode.key());
        let kind = if board.qualifies(self.score) {
            GameOverKind::NewHighScore
        } else {
            GameOverKind::TimesUp
        };
        self.game_over = Some(kind);

        log::debug!("Memory session over with {}: {:?}", self.score, kind);
        kind
    }

    fn schedule(&mut self, kind: Resolution, delay_ms: u32) {
        self.pending.push(PendingResolution {
            kind,
            generation: self.generation,
            resolve_at: self.now + u64::from(ms_to_ticks(delay_ms)),
        });
    }

    fn invalidate_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }

    fn cancel_timers(&mut self) {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.cancel();
        }
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id() == id)
    }

    fn check_playing(&self) -> Result<()> {
        match self.state {
            MemoryState::Idle => Err(GameError::NotStarted),
            MemoryState::GameOver => Err(GameError::AlreadyEnded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    type Engine = MemoryEngine<ScriptedColorSource, MemoryStore>;

    const TARGET: Rgb = Rgb::new(250, 10, 10);

    fn colors(fillers: u8) -> Vec<Rgb> {
        let mut colors = vec![TARGET];
        colors.extend((1..=fillers).map(|i| Rgb::new(0, i, 0)));
        colors
    }

    fn started(mode: MemoryMode, store: MemoryStore) -> Engine {
        let config = mode.config();
        let fillers = (config.tile_count() - u16::from(config.required_matches)) as u8;
        let source = ScriptedColorSource::new(vec![], colors(fillers));
        let mut engine = MemoryEngine::new(mode, source, store);
        engine.start_game(mode);
        engine
    }

    fn run(engine: &mut Engine, ticks: u32) -> Vec<MemoryEvent> {
        (0..ticks).flat_map(|_| engine.on_tick()).collect()
    }

    fn target_tile(engine: &Engine) -> TileId {
        engine
            .tiles()
            .iter()
            .find(|tile| tile.is_target())
            .map(Tile::id)
            .unwrap()
    }

    fn filler_tile(engine: &Engine) -> TileId {
        engine
            .tiles()
            .iter()
            .find(|tile| !tile.is_target())
            .map(Tile::id)
            .unwrap()
    }

    fn reveal_ticks(engine: &Engine) -> u32 {
        ms_to_ticks(engine.config().reveal_time_ms)
    }

    #[test]
    fn start_game_deals_first_round() {
        let engine = started(MemoryMode::Easy, MemoryStore::new());

        assert_eq!(engine.state(), MemoryState::Revealing);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tiles().len(), 9);
        assert_eq!(engine.target(), Some(TARGET));
        assert_eq!(engine.time_remaining(), 30);
        let same = engine.tiles().iter().filter(|tile| tile.color() == TARGET).count();
        assert_eq!(same, 1);
        assert!(engine.tiles().iter().all(Tile::is_revealed));
    }

    #[test]
    fn taps_during_reveal_are_rejected() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        let id = target_tile(&engine);

        assert_eq!(engine.tile_tapped(id), Err(GameError::NotAccepting));
        assert_eq!(engine.tile_tapped(TileId(999)), Err(GameError::NotAccepting));
    }

    #[test]
    fn reveal_hides_tiles_and_starts_countdown() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());

        let events = run(&mut engine, 39);
        assert_eq!(events.first(), Some(&MemoryEvent::RevealProgress(0.025)));
        assert_eq!(engine.state(), MemoryState::Revealing);

        let events = engine.on_tick();
        assert_eq!(
            events.as_slice(),
            [
                MemoryEvent::RevealFinished,
                MemoryEvent::CountdownStarted { seconds: 30 }
            ]
        );
        assert_eq!(engine.state(), MemoryState::Guessing);
        assert!(engine.tiles().iter().all(Tile::is_hidden));

        let events = run(&mut engine, TICKS_PER_SECOND);
        assert_eq!(events, [MemoryEvent::Second { remaining: 29 }]);
    }

    #[test]
    fn matching_target_clears_round_and_advances() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        let id = target_tile(&engine);

        assert_eq!(engine.tile_tapped(id), Ok(TapOutcome::Flipped));
        assert!(engine.tile(id).unwrap().is_revealed());
        assert_eq!(engine.matches_found(), 0);

        let events = run(&mut engine, 6);
        assert!(events.contains(&MemoryEvent::Matched {
            tile: id,
            matches_found: 1
        }));
        assert!(events.contains(&MemoryEvent::RoundCleared { round: 1 }));
        assert_eq!(engine.score(), 30);
        assert_eq!(engine.state(), MemoryState::RoundCleared);
        assert_eq!(engine.tile_tapped(filler_tile(&engine)), Err(GameError::NotAccepting));

        let events = run(&mut engine, 10);
        assert!(events.contains(&MemoryEvent::RoundStarted { round: 2 }));
        assert_eq!(engine.round(), 2);
        assert_eq!(engine.matches_found(), 0);
        assert_eq!(engine.state(), MemoryState::Revealing);
        assert!(engine.tile(id).is_none());
    }

    #[test]
    fn countdown_keeps_running_through_later_reveals() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        engine.tile_tapped(target_tile(&engine)).unwrap();
        run(&mut engine, 16);
        assert_eq!(engine.state(), MemoryState::Revealing);

        let events = run(&mut engine, 4);
        assert!(events.contains(&MemoryEvent::Second { remaining: 29 }));
        let events = run(&mut engine, 40);
        assert!(events.contains(&MemoryEvent::RevealFinished));
        assert!(!events.iter().any(|event| matches!(event, MemoryEvent::CountdownStarted { .. })));
    }

    #[test]
    fn miss_deducts_and_flips_back() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        let id = filler_tile(&engine);

        engine.tile_tapped(id).unwrap();
        assert_eq!(engine.tile_tapped(id), Ok(TapOutcome::NoChange));

        let events = run(&mut engine, 6);
        assert_eq!(events, [MemoryEvent::Missed { tile: id }]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.matches_found(), 0);
        assert!(engine.tile(id).unwrap().is_revealed());

        run(&mut engine, 19);
        assert!(engine.tile(id).unwrap().is_revealed());
        let events = engine.on_tick();
        assert_eq!(events.as_slice(), [MemoryEvent::FlippedBack { tile: id }]);
        assert!(engine.tile(id).unwrap().is_hidden());
    }

    #[test]
    fn new_round_mid_guessing_deals_fresh_revealed_tiles() {
        let mut engine = started(MemoryMode::Medium, MemoryStore::new());
        let ticks = reveal_ticks(&engine);
        run(&mut engine, ticks);
        engine.tile_tapped(target_tile(&engine)).unwrap();
        run(&mut engine, 6);
        assert_eq!(engine.matches_found(), 1);
        let stale = filler_tile(&engine);
        engine.tile_tapped(stale).unwrap();

        let events = engine.start_new_round().unwrap();

        assert_eq!(events.as_slice(), [MemoryEvent::RoundStarted { round: 2 }]);
        assert_eq!(engine.state(), MemoryState::Revealing);
        assert_eq!(engine.matches_found(), 0);
        assert_eq!(engine.tiles().len(), 16);
        assert!(engine.tiles().iter().all(Tile::is_revealed));
        assert!(engine.tile(stale).is_none());

        let events = run(&mut engine, 25);
        assert!(!events.iter().any(|event| matches!(event, MemoryEvent::Missed { .. })));
    }

    #[test]
    fn unknown_tile_is_rejected() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);

        assert_eq!(engine.tile_tapped(TileId(999)), Err(GameError::UnknownTile));
    }

    #[test]
    fn resolutions_of_a_cleared_round_are_dropped() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        let target = target_tile(&engine);
        let filler = filler_tile(&engine);

        engine.tile_tapped(target).unwrap();
        engine.tile_tapped(filler).unwrap();
        let events = run(&mut engine, 6);

        assert!(events.contains(&MemoryEvent::RoundCleared { round: 1 }));
        assert!(!events.contains(&MemoryEvent::Missed { tile: filler }));
        assert_eq!(engine.score(), 30);
    }

    #[test]
    fn end_game_drops_pending_and_stops_clocks() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        engine.tile_tapped(target_tile(&engine)).unwrap();

        assert_eq!(engine.end_game(), Ok(GameOverKind::NewHighScore));
        assert!(run(&mut engine, 100).is_empty());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.state(), MemoryState::GameOver);
        assert_eq!(engine.end_game(), Err(GameError::AlreadyEnded));
        assert_eq!(engine.tile_tapped(TileId(0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn countdown_expiry_ends_game() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);

        let events = run(&mut engine, 30 * TICKS_PER_SECOND);

        assert_eq!(events.last(), Some(&MemoryEvent::GameOver(GameOverKind::NewHighScore)));
        assert_eq!(engine.game_over(), Some(GameOverKind::NewHighScore));
        assert_eq!(engine.time_remaining(), 0);
    }

    #[test]
    fn full_leaderboard_means_times_up() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::new("memory-easy");
        for i in 0..LEADERBOARD_CAPACITY as u64 {
            board.insert(LeaderboardEntry {
                player_name: "p".to_string(),
                score: 100,
                elapsed_secs: None,
                mode: "memory-easy".to_string(),
                timestamp: i,
            });
        }
        board.save(&mut store).unwrap();

        let mut engine = started(MemoryMode::Easy, store);
        run(&mut engine, 40);

        assert_eq!(engine.end_game(), Ok(GameOverKind::TimesUp));
        assert_eq!(engine.submit_high_score("ana", 1), Err(GameError::NothingToSubmit));
    }

    #[test]
    fn high_score_submission_persists_entry_and_best() {
        let mut engine = started(MemoryMode::Easy, MemoryStore::new());
        run(&mut engine, 40);
        engine.tile_tapped(target_tile(&engine)).unwrap();
        run(&mut engine, 6);
        engine.end_game().unwrap();

        let entry = engine.submit_high_score("ana", 77).unwrap();

        assert_eq!(entry.score, 30);
        assert_eq!(entry.mode, "memory-easy");
        assert_eq!(Leaderboard::load(engine.store(), "memory-easy").entries(), [entry]);
        assert_eq!(BestRecord::load(engine.store(), "memory-easy").score, 30);
        assert_eq!(engine.submit_high_score("ana", 78), Err(GameError::NothingToSubmit));
    }

    #[test]
    fn progressive_mode_levels_up_after_clearing() {
        let mut engine = started(MemoryMode::LevelUp, MemoryStore::new());
        run(&mut engine, 40);
        engine.tile_tapped(target_tile(&engine)).unwrap();
        run(&mut engine, 6);

        let events = run(&mut engine, 10);
        assert!(events.contains(&MemoryEvent::LevelUp { level: 2 }));
        assert!(events.contains(&MemoryEvent::CountdownStarted { seconds: 25 }));
        assert_eq!(engine.state(), MemoryState::LevelTransition);
        assert_eq!(engine.score(), 80);
        assert_eq!(engine.config(), RoundConfig::for_level(2));

        let events = run(&mut engine, 29);
        assert!(!events.iter().any(|event| matches!(event, MemoryEvent::RoundStarted { .. })));
        let events = engine.on_tick();
        assert!(events.contains(&MemoryEvent::RoundStarted { round: 2 }));
        assert_eq!(engine.state(), MemoryState::Revealing);
        assert_eq!(reveal_ticks(&engine), 36);
    }

    #[test]
    fn level_up_is_progressive_only() {
        let mut engine = started(MemoryMode::Hard, MemoryStore::new());
        assert_eq!(engine.level_up(), Err(GameError::NotAccepting));

        let mut engine = started(MemoryMode::LevelUp, MemoryStore::new());
        let events = engine.level_up().unwrap();
        assert_eq!(events[0], MemoryEvent::LevelUp { level: 2 });
        assert_eq!(engine.score(), 50);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut engine = started(MemoryMode::Medium, MemoryStore::new());
        run(&mut engine, 10);

        engine.reset();

        assert_eq!(engine.state(), MemoryState::Idle);
        assert!(engine.tiles().is_empty());
        assert!(run(&mut engine, 100).is_empty());
        assert_eq!(engine.start_new_round(), Err(GameError::NotStarted));
        assert_eq!(engine.mode(), MemoryMode::Medium);
    }
}

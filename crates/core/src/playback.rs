//! Playback controller - replays a generation stream onto the render models
//!
//! # Session lifecycle
//!
//! ```text
//! Idle --start--> Awaiting --generation_started--> Active --generation_complete--> Idle
//!                    |                               |
//!                    +---------- error / timeout ----+--> Failed (a new start is accepted)
//! ```
//!
//! Only one session is in flight at a time. Starting while `Awaiting` or
//! `Active` is ignored without opening a stream.
//!
//! # Tile animation
//!
//! Each valid `tile_placed` event schedules two timers under the current
//! session sequence:
//!
//! | Phase | Due | Effect |
//! |-------|-----|--------|
//! | Enter | `now + position * inter_tile_delay` | tile shown as entering |
//! | Commit | enter + `settle_delay` | tile written to the board |
//!
//! Timers whose session differs from the current sequence are dropped when
//! they come due. `generation_complete` overrides whatever the animation
//! produced with the snapshot.
//!
//! The controller never sleeps or spawns. Drive it with [`PlaybackController::pump`].

use tracing::{debug, info, warn};
use wordboard_types::{
    DEFAULT_INTER_TILE_DELAY_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_STREAM_IDLE_TIMEOUT_MS,
};

use crate::board::{BoardModel, PlacedTile};
use crate::error::{PlaybackError, ProtocolError, TransportError};
use crate::event::{EventStream, PlacementEvent, StreamEvent, StreamItem};
use crate::rack::TileRack;
use crate::schedule::{Timer, TimerPhase, TimerQueue};
use crate::snapshot::{PuzzleSnapshot, PuzzleStats};

/// Animation timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub inter_tile_delay_ms: u32,
    pub settle_delay_ms: u32,
    pub stream_idle_timeout_ms: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            inter_tile_delay_ms: DEFAULT_INTER_TILE_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            stream_idle_timeout_ms: DEFAULT_STREAM_IDLE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Idle,
    Awaiting,
    Active,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Awaiting => "awaiting",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// A stream is open or about to be
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionStatus::Awaiting | SessionStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { session: u64 },
    Ignored,
}

/// User-visible result of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Completed(PuzzleStats),
    Failed(String),
}

/// A tile currently in its entering phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnteringTile {
    pub row: u8,
    pub col: u8,
    pub tile: PlacedTile,
}

/// What one [`PlaybackController::pump`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Stream items consumed
    pub items: usize,
    /// Timers applied
    pub fired: usize,
    /// Timers dropped by the session guard
    pub discarded: usize,
}

impl PumpReport {
    pub fn changed(&self) -> bool {
        self.items > 0 || self.fired > 0
    }
}

/// Single-flight generation session state machine.
///
/// Owns the board and rack models, the open stream (if any), and the timer
/// queue. All mutation happens through `&mut self`.
#[derive(Debug)]
pub struct PlaybackController<S> {
    config: PlaybackConfig,
    status: SessionStatus,
    last_outcome: Option<SessionStatus>,
    sequence: u64,
    stream: Option<S>,
    board: BoardModel,
    rack: TileRack,
    stats: Option<PuzzleStats>,
    progress: Option<f64>,
    timers: TimerQueue,
    entering: Vec<EnteringTile>,
    words_completed: u32,
    skipped_events: u32,
    last_activity_ms: u64,
    notice: Option<Notice>,
}

impl<S: EventStream> PlaybackController<S> {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            status: SessionStatus::Idle,
            last_outcome: None,
            sequence: 0,
            stream: None,
            board: BoardModel::new(),
            rack: TileRack::new(),
            stats: None,
            progress: None,
            timers: TimerQueue::new(),
            entering: Vec::new(),
            words_completed: 0,
            skipped_events: 0,
            last_activity_ms: 0,
            notice: None,
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Status the previous session ended in, if any
    pub fn last_outcome(&self) -> Option<SessionStatus> {
        self.last_outcome
    }

    /// Current session sequence. Zero before the first start.
    pub fn session(&self) -> u64 {
        self.sequence
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    pub fn rack(&self) -> &TileRack {
        &self.rack
    }

    pub fn stats(&self) -> Option<PuzzleStats> {
        self.stats
    }

    pub fn progress(&self) -> Option<f64> {
        self.progress
    }

    pub fn entering(&self) -> &[EnteringTile] {
        &self.entering
    }

    pub fn pending_timers(&self) -> Vec<Timer> {
        self.timers.pending()
    }

    pub fn words_completed(&self) -> u32 {
        self.words_completed
    }

    pub fn skipped_events(&self) -> u32 {
        self.skipped_events
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the generate controls should accept input
    pub fn control_enabled(&self) -> bool {
        !self.status.is_in_flight()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn can_start(&self) -> bool {
        matches!(self.status, SessionStatus::Idle | SessionStatus::Failed)
    }

    /// Clear the models and advance the sequence for a new puzzle.
    fn begin_session(&mut self, now_ms: u64) {
        self.board.reset();
        self.rack.clear();
        self.stats = None;
        self.progress = None;
        self.entering.clear();
        self.words_completed = 0;
        self.skipped_events = 0;
        self.notice = None;
        self.sequence += 1;
        self.last_activity_ms = now_ms;
    }

    /// Start an animated session, opening its stream with `open`.
    ///
    /// Ignored while another session is in flight; `open` is not called then.
    pub fn start_animated<F>(&mut self, now_ms: u64, open: F) -> StartOutcome
    where
        F: FnOnce() -> Result<S, TransportError>,
    {
        if !self.can_start() {
            debug!(status = self.status.as_str(), "start ignored, session in flight");
            return StartOutcome::Ignored;
        }
        self.begin_session(now_ms);
        self.status = SessionStatus::Awaiting;
        info!(session = self.sequence, "animated generation requested");

        match open() {
            Ok(stream) => self.stream = Some(stream),
            Err(err) => self.fail(err.into()),
        }
        StartOutcome::Started {
            session: self.sequence,
        }
    }

    /// Show a puzzle fetched without animation.
    pub fn apply_plain(&mut self, now_ms: u64, snapshot: &PuzzleSnapshot) -> StartOutcome {
        if !self.can_start() {
            debug!(status = self.status.as_str(), "plain result ignored, session in flight");
            return StartOutcome::Ignored;
        }
        self.begin_session(now_ms);
        self.apply_final(snapshot);
        info!(
            session = self.sequence,
            placed = snapshot.placed_tile_count,
            remaining = snapshot.remaining_tile_count,
            "puzzle loaded"
        );
        StartOutcome::Started {
            session: self.sequence,
        }
    }

    /// Record a failed non-animated request.
    pub fn fail_request(&mut self, error: PlaybackError) {
        if !self.can_start() {
            return;
        }
        warn!(%error, "puzzle request failed");
        self.status = SessionStatus::Failed;
        self.last_outcome = Some(SessionStatus::Failed);
        self.notice = Some(Notice::Failed(error.to_string()));
    }

    /// Cancel the in-flight session without a failure notice.
    pub fn abandon(&mut self) -> bool {
        if !self.status.is_in_flight() {
            return false;
        }
        self.close_stream();
        let cancelled = self.timers.cancel_session(self.sequence);
        self.entering.clear();
        self.status = SessionStatus::Idle;
        info!(session = self.sequence, cancelled, "session abandoned");
        true
    }

    /// Dispatch one stream item.
    pub fn handle_item(&mut self, now_ms: u64, item: StreamItem) {
        if !self.status.is_in_flight() {
            debug!(status = self.status.as_str(), "ignoring stream item outside a session");
            return;
        }
        match item {
            StreamItem::Event(event) => self.handle_event(now_ms, event),
            StreamItem::Malformed(err) if err.is_skippable() => {
                self.last_activity_ms = now_ms;
                self.skip(err);
            }
            StreamItem::Malformed(err) => self.fail(err.into()),
            StreamItem::Failed(err) => self.fail(err.into()),
        }
    }

    /// Dispatch one decoded event.
    pub fn handle_event(&mut self, now_ms: u64, event: StreamEvent) {
        if !self.status.is_in_flight() {
            debug!(event = event.name(), "ignoring event outside a session");
            return;
        }
        self.last_activity_ms = now_ms;

        if self.status == SessionStatus::Awaiting {
            if !matches!(event, StreamEvent::GenerationStarted { .. }) {
                debug!(event = event.name(), "first event was not generation_started");
            }
            self.status = SessionStatus::Active;
            info!(session = self.sequence, "generation active");
        }

        match event {
            StreamEvent::GenerationStarted { message } => {
                debug!(session = self.sequence, %message, "generation started");
            }
            StreamEvent::ProgressUpdate { progress, message } => {
                debug!(progress, message = message.as_deref().unwrap_or(""), "progress");
                self.progress = Some(progress);
            }
            StreamEvent::TilePlaced(placement) => self.schedule_placement(now_ms, &placement),
            StreamEvent::WordComplete { word, direction } => {
                self.words_completed += 1;
                info!(
                    %word,
                    direction = direction.map(|d| d.as_str()).unwrap_or("?"),
                    "word complete"
                );
            }
            StreamEvent::Delay { duration_ms } => {
                // pacing is already applied by the generator
                debug!(duration_ms, "delay");
            }
            StreamEvent::GenerationComplete(snapshot) => self.complete(&snapshot),
        }
    }

    fn schedule_placement(&mut self, now_ms: u64, event: &PlacementEvent) {
        let placement = match event.validate() {
            Ok(p) => p,
            Err(err) => {
                self.skip(err);
                return;
            }
        };
        let enter_ms =
            now_ms + u64::from(event.position_in_word) * u64::from(self.config.inter_tile_delay_ms);
        let commit_ms = enter_ms + u64::from(self.config.settle_delay_ms);
        for (due_ms, phase) in [(enter_ms, TimerPhase::Enter), (commit_ms, TimerPhase::Commit)] {
            self.timers.schedule(Timer {
                due_ms,
                session: self.sequence,
                phase,
                placement,
            });
        }
        debug!(
            row = placement.row,
            col = placement.col,
            letter = %placement.tile.letter,
            word = %event.word,
            enter_ms,
            "tile scheduled"
        );
    }

    fn skip(&mut self, err: ProtocolError) {
        self.skipped_events += 1;
        warn!(session = self.sequence, error = %err, "skipping event");
    }

    /// Apply every timer due at `now_ms`. Returns (applied, discarded).
    pub fn fire_due(&mut self, now_ms: u64) -> (usize, usize) {
        let mut fired = 0;
        let mut discarded = 0;
        while let Some(timer) = self.timers.pop_due(now_ms) {
            if timer.session != self.sequence {
                debug!(timer_session = timer.session, session = self.sequence, "stale timer dropped");
                discarded += 1;
                continue;
            }
            let p = timer.placement;
            self.entering.retain(|e| (e.row, e.col) != (p.row, p.col));
            match timer.phase {
                TimerPhase::Enter => self.entering.push(EnteringTile {
                    row: p.row,
                    col: p.col,
                    tile: p.tile,
                }),
                TimerPhase::Commit => {
                    self.board.place(p.row, p.col, p.tile);
                }
            }
            fired += 1;
        }
        (fired, discarded)
    }

    /// Fail the session if the stream has been silent too long.
    pub fn check_timeout(&mut self, now_ms: u64) -> bool {
        if !self.status.is_in_flight() {
            return false;
        }
        let idle_ms = now_ms.saturating_sub(self.last_activity_ms);
        if idle_ms < u64::from(self.config.stream_idle_timeout_ms) {
            return false;
        }
        self.fail(TransportError::Timeout { idle_ms }.into());
        true
    }

    /// Drain ready stream items, fire due timers, and check the idle timeout.
    pub fn pump(&mut self, now_ms: u64) -> PumpReport {
        let mut report = PumpReport::default();
        while self.status.is_in_flight() {
            let Some(item) = self.stream.as_mut().and_then(|s| s.try_next()) else {
                break;
            };
            report.items += 1;
            self.handle_item(now_ms, item);
        }
        let (fired, discarded) = self.fire_due(now_ms);
        report.fired = fired;
        report.discarded = discarded;
        self.check_timeout(now_ms);
        report
    }

    fn complete(&mut self, snapshot: &PuzzleSnapshot) {
        let cancelled = self.timers.cancel_session(self.sequence);
        if cancelled > 0 {
            debug!(cancelled, "pending animations superseded by snapshot");
        }
        self.close_stream();
        self.apply_final(snapshot);
        info!(
            session = self.sequence,
            placed = snapshot.placed_tile_count,
            remaining = snapshot.remaining_tile_count,
            "generation complete"
        );
    }

    /// Override the board and rack with the snapshot and settle in `Idle`.
    fn apply_final(&mut self, snapshot: &PuzzleSnapshot) {
        for issue in snapshot.consistency_issues() {
            warn!(?issue, "snapshot counts disagree");
        }
        self.entering.clear();
        self.board.apply_snapshot(snapshot);
        self.rack.replace_all(snapshot.remaining_tiles.iter().copied());
        let stats = snapshot.stats();
        self.stats = Some(stats);
        self.progress = Some(100.0);
        // Completed is reported through last_outcome; the controller rests in Idle
        self.last_outcome = Some(SessionStatus::Completed);
        self.notice = Some(Notice::Completed(stats));
        self.status = SessionStatus::Idle;
    }

    fn fail(&mut self, error: PlaybackError) {
        if !self.status.is_in_flight() {
            return;
        }
        self.close_stream();
        let cancelled = self.timers.cancel_session(self.sequence);
        self.entering.clear();
        self.status = SessionStatus::Failed;
        self.last_outcome = Some(SessionStatus::Failed);
        warn!(session = self.sequence, cancelled, %error, "generation failed");
        self.notice = Some(Notice::Failed(error.to_string()));
    }

    fn close_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScriptedStream;
    use wordboard_types::Direction;

    fn controller() -> PlaybackController<ScriptedStream> {
        PlaybackController::new(PlaybackConfig {
            inter_tile_delay_ms: 100,
            settle_delay_ms: 50,
            stream_idle_timeout_ms: 1_000,
        })
    }

    fn tile(row: i64, col: i64, letter: char, pos: u32) -> StreamEvent {
        StreamEvent::TilePlaced(PlacementEvent {
            row,
            col,
            letter,
            point_value: 1,
            word: "AT".to_string(),
            direction: Direction::Horizontal,
            position_in_word: pos,
            total_tiles_in_word: 2,
            letter_multiplier: 1,
            word_multiplier: 1,
        })
    }

    fn started(c: &mut PlaybackController<ScriptedStream>) -> ScriptedStream {
        let feeder = ScriptedStream::new();
        let handed = feeder.clone();
        assert!(matches!(
            c.start_animated(0, move || Ok(handed)),
            StartOutcome::Started { .. }
        ));
        feeder
    }

    #[test]
    fn stale_timers_are_dropped_by_the_guard() {
        let mut c = controller();
        let _feeder = started(&mut c);
        c.handle_event(0, tile(7, 7, 'A', 0));
        assert_eq!(c.timers.len(), 2);

        // advance the sequence without cancelling, as a superseding session would
        c.sequence += 1;
        let (fired, discarded) = c.fire_due(1_000);
        assert_eq!((fired, discarded), (0, 2));
        assert_eq!(c.board().occupied_count(), 0);
        assert!(c.entering().is_empty());
    }

    #[test]
    fn enter_then_commit() {
        let mut c = controller();
        let _feeder = started(&mut c);
        c.handle_event(0, tile(7, 7, 'A', 0));
        c.handle_event(0, tile(7, 8, 'T', 1));

        assert_eq!(c.fire_due(0), (1, 0));
        assert_eq!(c.entering().len(), 1);
        assert!(!c.board().is_occupied(7, 7));

        assert_eq!(c.fire_due(50), (1, 0));
        assert!(c.board().is_occupied(7, 7));
        assert!(c.entering().is_empty());

        c.fire_due(150);
        assert!(c.board().is_occupied(7, 8));
        assert_eq!(c.pending_timers().len(), 0);
    }

    #[test]
    fn implicit_activation_from_awaiting() {
        let mut c = controller();
        let _feeder = started(&mut c);
        assert_eq!(c.status(), SessionStatus::Awaiting);
        assert!(!c.control_enabled());
        c.handle_event(5, StreamEvent::Delay { duration_ms: 10 });
        assert_eq!(c.status(), SessionStatus::Active);
    }

    #[test]
    fn open_failure_fails_session() {
        let mut c = controller();
        let outcome = c.start_animated(0, || Err(TransportError::Status(503)));
        assert_eq!(outcome, StartOutcome::Started { session: 1 });
        assert_eq!(c.status(), SessionStatus::Failed);
        assert!(c.control_enabled());
        assert_eq!(
            c.take_notice(),
            Some(Notice::Failed("generator responded with HTTP 503".to_string()))
        );
    }

    #[test]
    fn fatal_malformed_item_fails_session() {
        let mut c = controller();
        let _feeder = started(&mut c);
        c.handle_item(
            0,
            StreamItem::Malformed(ProtocolError::malformed("generation_complete", "bad json")),
        );
        assert_eq!(c.status(), SessionStatus::Failed);
        assert!(!c.has_stream());
    }

    #[test]
    fn events_after_failure_are_ignored() {
        let mut c = controller();
        let _feeder = started(&mut c);
        c.handle_item(0, StreamItem::Failed(TransportError::ClosedEarly));
        c.handle_event(1, tile(0, 0, 'A', 0));
        assert!(c.pending_timers().is_empty());
        assert_eq!(c.status(), SessionStatus::Failed);
    }

    #[test]
    fn timeout_measures_silence() {
        let mut c = controller();
        let _feeder = started(&mut c);
        assert!(!c.check_timeout(999));
        c.handle_event(900, StreamEvent::ProgressUpdate {
            progress: 10.0,
            message: None,
        });
        assert!(!c.check_timeout(1_500));
        assert!(c.check_timeout(1_900));
        assert_eq!(c.status(), SessionStatus::Failed);
    }
}

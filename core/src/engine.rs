use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Delay between an edit and the fill recomputation it schedules. Rapid
/// successive edits coalesce into the single latest-scheduled recompute.
pub const RECOMPUTE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Pause between winning a level and advancing to the next one.
pub const ADVANCE_DELAY: Duration = Duration::from_secs(2);

const TIMER_STEP: Duration = Duration::from_secs(1);

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> TimedOut
///
/// Terminal states are only left by building a fresh engine for a new level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleState {
    Playing,
    Won,
    TimedOut,
}

impl PuzzleState {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::TimedOut)
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Outward notifications, drained by the embedding after every call that can
/// produce them. No UI logic lives here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    TimeChanged(u32),
    Won,
    TimedOut,
    /// One-based index of the level just entered.
    LevelAdvanced(u32),
    AllLevelsComplete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Countdown {
    remaining: u32,
    next_step_at: Duration,
}

/// Work the clock can make due; recomputation wins ties so that a solve
/// landing on a timer step still counts.
enum Due {
    Recompute(Duration),
    CountdownStep(Duration),
}

/// One level from start to finish: the board, the derived fill state, the
/// debounced recomputation schedule, and the countdown timer.
///
/// Time is a logical clock advanced by the embedding through [`tick`];
/// nothing here reads a wall clock.
///
/// [`tick`]: PuzzleEngine::tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleEngine {
    grid: Grid,
    state: PuzzleState,
    clock: Duration,
    recompute_at: Option<Duration>,
    countdown: Option<Countdown>,
    events: Vec<PuzzleEvent>,
}

impl PuzzleEngine {
    /// Takes ownership of a freshly built grid. Fill state is derived
    /// immediately so presentation reads are valid from the first frame, but
    /// the win check waits for the first debounced recomputation; an edit
    /// landing inside that window supersedes it.
    pub fn new(grid: Grid, time_limit: Option<u32>) -> Self {
        let mut engine = Self {
            grid,
            state: PuzzleState::Playing,
            clock: Duration::ZERO,
            recompute_at: Some(RECOMPUTE_DEBOUNCE),
            countdown: None,
            events: Vec::new(),
        };
        flow::recompute(&mut engine.grid);
        if let Some(secs) = time_limit {
            engine.countdown = Some(Countdown {
                remaining: secs,
                next_step_at: TIMER_STEP,
            });
            engine.events.push(PuzzleEvent::TimeChanged(secs));
        }
        engine
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_at(&self, coords: Coord2) -> PipeCell {
        self.grid.cell_at(coords)
    }

    /// Seconds left on the countdown, if one is configured and running.
    pub fn remaining_time(&self) -> Option<u32> {
        self.countdown.map(|countdown| countdown.remaining)
    }

    /// Whether a recomputation is scheduled and not yet run.
    pub fn recompute_pending(&self) -> bool {
        self.recompute_at.is_some()
    }

    /// Primary player action: rotate the cell a quarter turn clockwise.
    pub fn rotate_cell(&mut self, coords: Coord2) -> Result<EditOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_playing()?;

        let outcome = self.grid.rotate(coords);
        if outcome.has_update() {
            log::debug!("rotate at {:?}", coords);
            self.schedule_recompute();
        }
        Ok(outcome)
    }

    /// Editor/debug action: retype the cell (kind `Empty` erases it).
    pub fn set_cell_kind(&mut self, coords: Coord2, kind: PipeKind) -> Result<EditOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_playing()?;

        let outcome = self.grid.set_kind(coords, kind);
        if outcome.has_update() {
            log::debug!("set kind {:?} at {:?}", kind, coords);
            self.schedule_recompute();
        }
        Ok(outcome)
    }

    /// Advances the logical clock, firing due work in chronological order.
    pub fn tick(&mut self, dt: Duration) {
        let target = self.clock + dt;
        loop {
            let recompute = self.recompute_at.filter(|&at| at <= target);
            let step = self
                .countdown
                .map(|countdown| countdown.next_step_at)
                .filter(|&at| at <= target);

            let due = match (recompute, step) {
                (None, None) => break,
                (Some(at), None) => Due::Recompute(at),
                (None, Some(at)) => Due::CountdownStep(at),
                (Some(r), Some(s)) => {
                    if r <= s {
                        Due::Recompute(r)
                    } else {
                        Due::CountdownStep(s)
                    }
                }
            };
            match due {
                Due::Recompute(at) => {
                    self.clock = at;
                    self.run_recompute();
                }
                Due::CountdownStep(at) => {
                    self.clock = at;
                    self.step_countdown();
                }
            }
        }
        self.clock = target;
    }

    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        core::mem::take(&mut self.events)
    }

    /// A later edit replaces any pending recomputation: at most one is ever
    /// outstanding, and it sees the final board state.
    fn schedule_recompute(&mut self) {
        self.recompute_at = Some(self.clock + RECOMPUTE_DEBOUNCE);
    }

    fn run_recompute(&mut self) {
        self.recompute_at = None;
        let summary = flow::recompute(&mut self.grid);
        if summary.is_complete() {
            self.finish(PuzzleState::Won);
        }
    }

    fn step_countdown(&mut self) {
        let Some(countdown) = &mut self.countdown else {
            return;
        };
        countdown.remaining = countdown.remaining.saturating_sub(1);
        countdown.next_step_at += TIMER_STEP;
        let remaining = countdown.remaining;
        self.events.push(PuzzleEvent::TimeChanged(remaining));
        if remaining == 0 {
            self.finish(PuzzleState::TimedOut);
        }
    }

    /// Enters a terminal state and cancels everything still scheduled, so no
    /// stale callback can touch the board afterwards.
    fn finish(&mut self, terminal: PuzzleState) {
        if self.state.is_final() {
            return;
        }
        log::debug!("level finished: {:?}", terminal);
        self.state = terminal;
        self.recompute_at = None;
        self.countdown = None;
        self.events.push(match terminal {
            PuzzleState::Won => PuzzleEvent::Won,
            _ => PuzzleEvent::TimedOut,
        });
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_final() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

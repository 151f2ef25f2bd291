use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

/// Drives an ordered sequence of levels through one [`PuzzleEngine`] at a
/// time. Owns the input boundary: out-of-range coordinates, unknown codes,
/// and moves after a level ended are dropped silently here, so the engine
/// below only ever sees validated edits.
#[derive(Clone, Debug)]
pub struct LevelSession {
    levels: Vec<LevelData>,
    time_limit: Option<u32>,
    current: usize,
    engine: PuzzleEngine,
    clock: Duration,
    advance_at: Option<Duration>,
    all_complete: bool,
    events: Vec<PuzzleEvent>,
}

impl LevelSession {
    /// Validates every level up front; a malformed level fails construction
    /// before anything is built.
    pub fn new(levels: Vec<LevelData>, time_limit: Option<u32>) -> Result<Self> {
        if levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        for level in &levels {
            level.validate()?;
        }

        let engine = PuzzleEngine::new(levels[0].build_grid()?, time_limit);
        Ok(Self {
            levels,
            time_limit,
            current: 0,
            engine,
            clock: Duration::ZERO,
            advance_at: None,
            all_complete: false,
            events: Vec::new(),
        })
    }

    pub fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    /// One-based index of the level currently in play.
    pub fn level_number(&self) -> u32 {
        self.current as u32 + 1
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn all_levels_complete(&self) -> bool {
        self.all_complete
    }

    /// Primary input action on a cell: rotate it.
    pub fn on_cell_activate(&mut self, row: Coord, col: Coord) {
        if let Err(err) = self.engine.rotate_cell((row, col)) {
            log::debug!("activate at ({}, {}) ignored: {}", row, col, err);
        }
    }

    /// Editor/debug input action: retype a cell by wire code.
    pub fn on_cell_set_kind(&mut self, row: Coord, col: Coord, code: u8) {
        let result = PipeKind::from_code(code)
            .and_then(|kind| self.engine.set_cell_kind((row, col), kind));
        if let Err(err) = result {
            log::debug!("set kind {} at ({}, {}) ignored: {}", code, row, col, err);
        }
    }

    /// Advances time for the running level and the level-advance schedule.
    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;
        self.engine.tick(dt);

        for event in self.engine.take_events() {
            if matches!(event, PuzzleEvent::Won) && self.advance_at.is_none() {
                self.advance_at = Some(self.clock + ADVANCE_DELAY);
            }
            self.events.push(event);
        }

        if self.advance_at.is_some_and(|at| at <= self.clock) {
            self.advance_at = None;
            self.advance_level();
        }
    }

    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        core::mem::take(&mut self.events)
    }

    /// Tears down the finished level and enters the next one with a fresh
    /// engine; the discarded engine takes any still-scheduled work with it.
    fn advance_level(&mut self) {
        self.current += 1;
        if self.current >= self.levels.len() {
            log::debug!("all {} levels complete", self.levels.len());
            self.all_complete = true;
            self.events.push(PuzzleEvent::AllLevelsComplete);
            return;
        }

        match self.levels[self.current].build_grid() {
            Ok(grid) => {
                self.engine = PuzzleEngine::new(grid, self.time_limit);
                log::debug!("entering level {}", self.level_number());
                self.events.push(PuzzleEvent::LevelAdvanced(self.level_number()));
                for event in self.engine.take_events() {
                    self.events.push(event);
                }
            }
            Err(err) => {
                // levels were validated in new(), this cannot happen
                log::error!("level {} failed to load: {}", self.current + 1, err);
                self.all_complete = true;
                self.events.push(PuzzleEvent::AllLevelsComplete);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn solved_level() -> LevelData {
        LevelData::new(1, 3, vec![1, 3, 3]).unwrap()
    }

    fn unsolved_level() -> LevelData {
        LevelData::new(1, 3, vec![1, 2, 2]).unwrap()
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert!(matches!(
            LevelSession::new(vec![], None),
            Err(GameError::NoLevels)
        ));
    }

    #[test]
    fn malformed_level_fails_construction() {
        let broken = LevelData {
            rows: 2,
            cols: 2,
            cells: vec![0, 0, 0],
        };
        assert!(matches!(
            LevelSession::new(vec![solved_level(), broken], None),
            Err(GameError::InvalidLevelShape { .. })
        ));
    }

    #[test]
    fn win_advances_after_the_delay() {
        let mut session = LevelSession::new(vec![solved_level(), unsolved_level()], None).unwrap();
        assert_eq!(session.level_number(), 1);

        session.tick(RECOMPUTE_DEBOUNCE);
        assert_eq!(session.take_events(), vec![PuzzleEvent::Won]);
        assert_eq!(session.level_number(), 1);

        session.tick(ADVANCE_DELAY);
        assert_eq!(session.take_events(), vec![PuzzleEvent::LevelAdvanced(2)]);
        assert_eq!(session.level_number(), 2);
        assert_eq!(session.engine().state(), PuzzleState::Playing);
        assert!(!session.all_levels_complete());
    }

    #[test]
    fn advancing_resets_the_timer() {
        let mut session =
            LevelSession::new(vec![solved_level(), unsolved_level()], Some(60)).unwrap();
        session.tick(RECOMPUTE_DEBOUNCE);
        session.tick(ADVANCE_DELAY);

        let events = session.take_events();
        assert!(events.contains(&PuzzleEvent::LevelAdvanced(2)));
        assert!(events.contains(&PuzzleEvent::TimeChanged(60)));
        assert_eq!(session.engine().remaining_time(), Some(60));
    }

    #[test]
    fn last_level_completes_the_session() {
        let mut session = LevelSession::new(vec![solved_level()], None).unwrap();

        session.tick(RECOMPUTE_DEBOUNCE);
        session.tick(ADVANCE_DELAY);

        let events = session.take_events();
        assert!(events.contains(&PuzzleEvent::AllLevelsComplete));
        assert!(session.all_levels_complete());

        // permanently inert afterwards
        session.tick(Duration::from_secs(30));
        assert_eq!(session.take_events(), vec![]);
    }

    #[test]
    fn timeout_never_advances() {
        let mut session =
            LevelSession::new(vec![unsolved_level(), solved_level()], Some(1)).unwrap();
        session.take_events();

        session.tick(Duration::from_secs(5));

        let events = session.take_events();
        assert!(events.contains(&PuzzleEvent::TimedOut));
        assert_eq!(session.level_number(), 1);
        assert!(!session.all_levels_complete());
    }

    #[test]
    fn out_of_bounds_input_is_dropped_silently() {
        let mut session = LevelSession::new(vec![unsolved_level()], None).unwrap();
        session.on_cell_activate(7, 7);
        session.on_cell_set_kind(0, 9, 3);
        session.on_cell_set_kind(0, 0, 42);

        session.tick(Duration::from_secs(1));
        assert_eq!(session.engine().state(), PuzzleState::Playing);
        assert_eq!(session.engine().cell_at((0, 0)).kind(), PipeKind::Source);
    }

    #[test]
    fn player_solves_a_level_through_the_input_boundary() {
        // source, then two N/S straights that each need one quarter turn
        let mut session = LevelSession::new(vec![unsolved_level()], None).unwrap();
        session.on_cell_activate(0, 1);
        session.on_cell_activate(0, 2);

        session.tick(RECOMPUTE_DEBOUNCE);

        assert_eq!(session.take_events(), vec![PuzzleEvent::Won]);
        assert_eq!(session.engine().state(), PuzzleState::Won);
    }
}

//! Game session - the turn-level state machine
//!
//! Owns the board, score, and preview queue, and sequences generator ->
//! landing -> merge resolution per drop. The explicit [`Phase`] enum makes
//! invalid flag combinations (resolving while over, and so on)
//! unrepresentable; `paused` is orthogonal and only blocks new drops.

use mergedrop_types::Landing;

use crate::board::Board;
use crate::generator::BlockGenerator;
use crate::landing::landing_row;
use crate::merge::{self, Resolution};
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::SessionSnapshot;
use crate::store::{HighScoreStore, ScoreBoard};

/// Where the session is in its drop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting drop requests.
    Ready,
    /// A drop is being resolved; no second drop may be accepted.
    Resolving,
    /// Terminal. Only a restart leaves this state.
    Over,
}

/// Why a drop request was rejected. Rejection never has side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropError {
    /// Column is full and its top cell does not match the incoming value.
    Blocked,
    /// Session is over, paused, or already resolving a drop.
    InvalidState,
}

impl DropError {
    pub fn code(self) -> &'static str {
        match self {
            DropError::Blocked => "blocked",
            DropError::InvalidState => "invalid_state",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DropError::Blocked => "column cannot accept the drop",
            DropError::InvalidState => "session is not accepting drops",
        }
    }
}

/// The pair of values waiting to be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview {
    pub current: u32,
    pub next: u32,
}

/// Everything one accepted drop produced, for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DropReport {
    pub column: i8,
    pub landing: Landing,
    pub placed_value: u32,
    /// Immediate top-merge gain plus the cascade total.
    pub score_gained: u32,
    pub resolution: Resolution,
}

/// Complete session state
pub struct GameSession<R: RandomSource> {
    board: Board,
    generator: BlockGenerator<R>,
    preview: Preview,
    phase: Phase,
    paused: bool,
    ai_enabled: bool,
    score: u32,
    high_score: u32,
    submitted: bool,
    player: String,
    high_score_store: Option<Box<dyn HighScoreStore>>,
    score_board: Option<Box<dyn ScoreBoard>>,
}

impl GameSession<SimpleRng> {
    /// Create a new session with the deterministic default RNG
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Create a new session with an injected random source
    pub fn with_rng(rng: R) -> Self {
        let board = Board::new();
        let mut generator = BlockGenerator::new(rng);
        let preview = Preview {
            current: generator.generate(&board),
            next: generator.generate(&board),
        };

        Self {
            board,
            generator,
            preview,
            phase: Phase::Ready,
            paused: false,
            ai_enabled: false,
            score: 0,
            high_score: 0,
            submitted: false,
            player: String::from("anonymous"),
            high_score_store: None,
            score_board: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn preview(&self) -> Preview {
        self.preview
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn player_name(&self) -> &str {
        &self.player
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player = name.into();
    }

    /// Wire the persistent high-score collaborator. The stored best is
    /// loaded immediately and only ever raised afterwards.
    pub fn set_high_score_store(&mut self, mut store: Box<dyn HighScoreStore>) {
        self.high_score = self.high_score.max(store.load());
        self.high_score_store = Some(store);
    }

    /// Wire the leaderboard collaborator.
    pub fn set_score_board(&mut self, board: Box<dyn ScoreBoard>) {
        self.score_board = Some(board);
    }

    /// Pausing blocks new drops; it never interrupts an in-flight cascade.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Drop the current preview value into a column.
    ///
    /// Rejected without side effects when the session is over, paused,
    /// mid-resolution, or the column cannot accept the value.
    pub fn drop_column(&mut self, column: i8) -> Result<DropReport, DropError> {
        if self.paused || self.phase != Phase::Ready {
            return Err(DropError::InvalidState);
        }

        let value = self.preview.current;
        let landing = landing_row(&self.board, column, value);

        let (drop_row, immediate_gain) = match landing {
            Landing::Blocked => return Err(DropError::Blocked),
            Landing::Row(row) => {
                self.board.set(column, row, Some(value));
                (row, 0)
            }
            Landing::TopMerge => {
                // The top cell doubles in place; the doubled value counts
                // as gain before the cascade starts.
                let doubled = value * 2;
                self.board.set(column, 0, Some(doubled));
                (0, doubled)
            }
        };

        self.phase = Phase::Resolving;
        let resolution = merge::resolve(&mut self.board, column, drop_row);
        let score_gained = immediate_gain + resolution.score_gained;
        self.score += score_gained;

        if self.score > self.high_score {
            self.high_score = self.score;
            if let Some(store) = self.high_score_store.as_mut() {
                // A failed save never affects game state.
                let _ = store.save(self.high_score);
            }
        }

        self.advance_preview();

        if self.board.is_terminal() {
            self.phase = Phase::Over;
            self.submit_score();
        } else {
            self.phase = Phase::Ready;
        }

        Ok(DropReport {
            column,
            landing,
            placed_value: value,
            score_gained,
            resolution,
        })
    }

    /// Start a fresh game: empty board, zero score, reseeded preview.
    /// The high score and wired collaborators persist across restarts.
    pub fn restart(&mut self) {
        self.board.clear();
        self.score = 0;
        self.phase = Phase::Ready;
        self.paused = false;
        self.submitted = false;
        self.preview = Preview {
            current: self.generator.generate(&self.board),
            next: self.generator.generate(&self.board),
        };
    }

    fn advance_preview(&mut self) {
        self.preview = Preview {
            current: self.preview.next,
            next: self.generator.generate(&self.board),
        };
    }

    /// Report a finished session to the leaderboard, at most once.
    fn submit_score(&mut self) {
        if self.submitted || self.score == 0 {
            return;
        }
        self.submitted = true;
        if let Some(board) = self.score_board.as_mut() {
            // Submit failure never blocks restart or further play.
            let _ = board.submit(&self.player, self.score, self.ai_enabled);
        }
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.board.write_value_grid(&mut out.board);
        out.current = self.preview.current;
        out.next = self.preview.next;
        out.score = self.score;
        out.high_score = self.high_score;
        out.paused = self.paused;
        out.over = self.is_over();
        out.ai_enabled = self.ai_enabled;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use mergedrop_types::ScoreEntry;

    use crate::store::StoreError;

    /// Replays a fixed value sequence through the generator thresholds.
    struct ScriptedRng {
        rolls: Vec<f32>,
        at: usize,
    }

    impl ScriptedRng {
        fn always(roll: f32) -> Self {
            Self {
                rolls: vec![roll],
                at: 0,
            }
        }
    }

    impl RandomSource for ScriptedRng {
        fn next_f32(&mut self) -> f32 {
            let roll = self.rolls[self.at % self.rolls.len()];
            self.at += 1;
            roll
        }
    }

    /// Session that always generates 2s.
    fn session_of_twos() -> GameSession<ScriptedRng> {
        GameSession::with_rng(ScriptedRng::always(0.0))
    }

    #[derive(Default)]
    struct RecordingStores {
        saved: Vec<u32>,
        submitted: Vec<(String, u32, bool)>,
        fail: bool,
    }

    #[derive(Clone, Default)]
    struct SharedStores(Rc<RefCell<RecordingStores>>);

    impl HighScoreStore for SharedStores {
        fn load(&mut self) -> u32 {
            0
        }

        fn save(&mut self, score: u32) -> Result<(), StoreError> {
            let mut inner = self.0.borrow_mut();
            inner.saved.push(score);
            if inner.fail {
                return Err("save failed".into());
            }
            Ok(())
        }
    }

    impl ScoreBoard for SharedStores {
        fn submit(&mut self, name: &str, score: u32, is_ai: bool) -> Result<(), StoreError> {
            let mut inner = self.0.borrow_mut();
            inner.submitted.push((name.to_string(), score, is_ai));
            if inner.fail {
                return Err("submit failed".into());
            }
            Ok(())
        }

        fn top(&self, _n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(12345);

        assert_eq!(session.phase(), Phase::Ready);
        assert!(!session.paused());
        assert!(!session.is_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 0);
        assert!(session.preview().current.is_power_of_two());
        assert!(session.preview().next.is_power_of_two());
    }

    #[test]
    fn test_drop_into_empty_board_lands_on_floor() {
        let mut session = session_of_twos();

        let report = session.drop_column(2).expect("drop accepted");

        assert_eq!(report.landing, Landing::Row(7));
        assert_eq!(report.placed_value, 2);
        assert_eq!(report.score_gained, 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.board().value(2, 7), Some(2));
        assert_eq!(session.board().occupied_count(), 1);
    }

    #[test]
    fn test_preview_advances_once_per_drop() {
        let mut session = session_of_twos();
        let before = session.preview();

        session.drop_column(0).expect("drop accepted");

        let after = session.preview();
        assert_eq!(after.current, before.next);
    }

    #[test]
    fn test_rejected_drop_has_no_side_effects() {
        let mut session = session_of_twos();

        // Fill column 0 with mismatching values so the top cannot merge.
        for y in 0..8i8 {
            session
                .board_mut()
                .set(0, y, Some(if y % 2 == 0 { 64 } else { 32 }));
        }

        let before_preview = session.preview();
        let before_board = session.board().clone();

        assert_eq!(session.drop_column(0), Err(DropError::Blocked));
        assert_eq!(session.preview(), before_preview);
        assert_eq!(session.board(), &before_board);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_paused_rejects_drops() {
        let mut session = session_of_twos();

        session.set_paused(true);
        assert_eq!(session.drop_column(2), Err(DropError::InvalidState));

        session.set_paused(false);
        assert!(session.drop_column(2).is_ok());
    }

    #[test]
    fn test_pairwise_merge_scores_resulting_value() {
        let mut session = session_of_twos();

        session.drop_column(2).expect("first drop");
        let report = session.drop_column(2).expect("second drop");

        // 2 on 2 collapses to 4.
        assert_eq!(report.score_gained, 4);
        assert_eq!(session.score(), 4);
        assert_eq!(session.board().value(2, 7), Some(4));
    }

    #[test]
    fn test_top_merge_counts_doubled_value_before_cascade() {
        let mut session = session_of_twos();

        // Column 1 full, topped with a 2 that matches the incoming value.
        // Mismatched larger values below prevent any cascade.
        let column = [2u32, 64, 16, 64, 16, 64, 16, 64];
        for (y, v) in column.into_iter().enumerate() {
            session.board_mut().set(1, y as i8, Some(v));
        }

        let report = session.drop_column(1).expect("top merge accepted");

        assert_eq!(report.landing, Landing::TopMerge);
        assert_eq!(report.score_gained, 4);
        assert!(report.resolution.is_empty());
        assert_eq!(session.board().value(1, 0), Some(4));
        // No new cell was inserted.
        assert_eq!(session.board().occupied_count(), 8);
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut session = GameSession::new(777);

        let mut last = 0;
        for i in 0..200 {
            let column = (i % 5) as i8;
            match session.drop_column(column) {
                Ok(_) => {
                    assert!(session.score() >= last);
                    last = session.score();
                }
                Err(_) => break,
            }
            if session.is_over() {
                break;
            }
        }
    }

    #[test]
    fn test_terminal_board_ends_session() {
        let mut session = session_of_twos();

        // Full board, no adjacent pairs anywhere, except column 4 is left
        // one short so the final drop completes it.
        let rows = [
            [4u32, 8, 4, 8, 0],
            [8, 4, 8, 4, 8],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
        ];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    session.board_mut().set(x as i8, y as i8, Some(v));
                }
            }
        }

        // Incoming 2 fills the last hole; nothing merges.
        let report = session.drop_column(4).expect("final drop");
        assert_eq!(report.landing, Landing::Row(0));
        assert!(session.is_over());

        // Over rejects everything until restart.
        assert_eq!(session.drop_column(0), Err(DropError::InvalidState));

        session.restart();
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.score(), 0);
        assert_eq!(session.board().occupied_count(), 0);
        assert!(session.drop_column(0).is_ok());
    }

    #[test]
    fn test_high_score_saved_on_crossing_and_kept_across_restart() {
        let shared = SharedStores::default();
        let mut session = session_of_twos();
        session.set_high_score_store(Box::new(shared.clone()));

        session.drop_column(2).expect("drop");
        session.drop_column(2).expect("merge drop");
        assert_eq!(session.high_score(), 4);
        assert_eq!(shared.0.borrow().saved, vec![4]);

        session.restart();
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 4);

        // A lower score after restart does not save again.
        session.drop_column(0).expect("drop");
        assert_eq!(shared.0.borrow().saved, vec![4]);
    }

    #[test]
    fn test_store_failures_do_not_affect_game_state() {
        let shared = SharedStores::default();
        shared.0.borrow_mut().fail = true;

        let mut session = session_of_twos();
        session.set_high_score_store(Box::new(shared.clone()));

        session.drop_column(2).expect("drop");
        let report = session.drop_column(2).expect("merge drop");

        assert_eq!(report.score_gained, 4);
        assert_eq!(session.score(), 4);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_submit_exactly_once_per_session() {
        let shared = SharedStores::default();
        let mut session = session_of_twos();
        session.set_score_board(Box::new(shared.clone()));
        session.set_player_name("tester");
        session.set_ai_enabled(true);

        // Earn some score first.
        session.drop_column(2).expect("drop");
        session.drop_column(2).expect("merge drop");

        // Force the terminal state through the public drop path: fill the
        // board into a pairless full position around the existing 4.
        let rows = [
            [8u32, 4, 8, 4, 0],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
            [4, 8, 4, 8, 4],
            [8, 4, 8, 4, 8],
            [4, 8, 2, 8, 4],
        ];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    session.board_mut().set(x as i8, y as i8, Some(v));
                }
            }
        }

        session.drop_column(4).expect("terminal drop");
        assert!(session.is_over());
        assert_eq!(shared.0.borrow().submitted.len(), 1);
        let (name, score, is_ai) = shared.0.borrow().submitted[0].clone();
        assert_eq!(name, "tester");
        assert_eq!(score, session.score());
        assert!(is_ai);

        // Restart re-arms the flag for the next session.
        session.restart();
        assert!(!session.is_over());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = session_of_twos();
        session.drop_column(3).expect("drop");

        let snap = session.snapshot();
        assert_eq!(snap.board[7][3], 2);
        assert_eq!(snap.current, session.preview().current);
        assert!(snap.playable());

        session.set_paused(true);
        assert!(!session.snapshot().playable());
    }
}

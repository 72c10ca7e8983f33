//! Search orchestration.
//!
//! The controller owns the game board, the shared transposition table and
//! at most one ponder worker thread. The foreground search runs on the
//! caller's thread; the ponder worker shares nothing with it except the
//! transposition table and its two stop flags.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::board::Board;
use crate::search::{self, Evaluation, SearchError, TimeControls};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Emit per-iteration search events.
    pub log_search: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { log_search: true }
    }
}

/// A ponder search running on its own thread.
struct PonderJob {
    ponder_hit: StopFlag,
    hard_stop: StopFlag,
    handle: JoinHandle<Option<Evaluation>>,
}

pub struct Engine {
    board: Board,
    tt: Arc<TranspositionTable>,
    ponder_job: Option<PonderJob>,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            board: Board::new(),
            tt: Arc::new(TranspositionTable::new()),
            ponder_job: None,
            config,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the game position (the `position` command).
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Forget everything from the previous game.
    pub fn new_game(&mut self) {
        self.abandon_ponder();
        self.tt.reset();
        self.board = Board::new();
    }

    /// Run the foreground search to completion and return its verdict.
    pub fn go(&mut self, controls: &TimeControls) -> Result<Evaluation, SearchError> {
        self.abandon_ponder();
        let result =
            search::find_best_move(&mut self.board, &self.tt, controls, self.config.log_search);
        self.tt.prune();
        result
    }

    /// Start searching the current position speculatively on a worker
    /// thread. The caller has already applied the expected opponent reply
    /// via the `position` command.
    pub fn start_ponder(&mut self, controls: TimeControls) {
        self.abandon_ponder();

        let ponder_hit = StopFlag::new();
        let hard_stop = StopFlag::new();
        let mut board = self.board.clone();
        let tt = Arc::clone(&self.tt);
        let hit = ponder_hit.clone();
        let stop = hard_stop.clone();
        let log_search = self.config.log_search;

        let handle = thread::spawn(move || {
            search::ponder(&mut board, &tt, &hit, &stop, &controls, log_search).ok()
        });

        self.ponder_job = Some(PonderJob {
            ponder_hit,
            hard_stop,
            handle,
        });
    }

    /// The opponent played the expected move: let the ponder search finish
    /// on the normal clock budget and return its verdict.
    pub fn ponder_hit(&mut self) -> Option<Evaluation> {
        let job = self.ponder_job.take()?;
        job.ponder_hit.set();
        job.handle.join().ok().flatten()
    }

    /// Hard-stop the ponder search and return whatever its last completed
    /// iteration found.
    pub fn stop(&mut self) -> Option<Evaluation> {
        let job = self.ponder_job.take()?;
        job.hard_stop.set();
        job.handle.join().ok().flatten()
    }

    /// Kill a ponder search whose result nobody wants (any command other
    /// than `ponderhit`/`stop` arrived).
    pub fn abandon_ponder(&mut self) {
        if let Some(job) = self.ponder_job.take() {
            job.hard_stop.set();
            let _ = job.handle.join();
        }
    }

    #[must_use]
    pub fn is_pondering(&self) -> bool {
        self.ponder_job.is_some()
    }
}

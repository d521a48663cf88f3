// Test utilities that cannot be moved to the "tests" folder, because unit tests use them too.

use crate::rules::{MoveOutcome, MoveRequest, RulesEngine, RulesError, TerminalReason};
use crate::side::Side;
use crate::standard_chess::StandardChess;


pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Shortest possible checkmate: black wins on move two.
pub const FOOLS_MATE: &str = "f2f3 e7e5 g2g4 d8h4";

// Applies moves in long algebraic notation, separated by whitespace, e.g. "e2e4 e7e5".
pub fn replay_moves(engine: &mut dyn RulesEngine, log: &str) -> Result<(), RulesError> {
    for notation in log.split_whitespace() {
        let mv = MoveRequest::from_uci(notation)
            .ok_or_else(|| RulesError::Illegal(format!("Cannot parse move: {notation}")))?;
        engine.apply_move(&mv)?;
    }
    Ok(())
}

// Standard chess that fails internally on every move attempt.
pub struct BrokenEngine {
    chess: StandardChess,
}

impl BrokenEngine {
    pub fn new() -> Self { BrokenEngine { chess: StandardChess::new() } }
}

impl RulesEngine for BrokenEngine {
    fn current_state(&self) -> String { self.chess.current_state() }
    fn turn_owner(&self) -> Side { self.chess.turn_owner() }
    fn apply_move(&mut self, _candidate: &MoveRequest) -> Result<MoveOutcome, RulesError> {
        Err(RulesError::Internal("engine is broken".to_owned()))
    }
    fn is_terminal(&self) -> Option<TerminalReason> { self.chess.is_terminal() }
    fn reset(&mut self) { self.chess.reset() }
}

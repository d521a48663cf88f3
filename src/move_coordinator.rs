use log::{error, warn};

use crate::error::MoveRejection;
use crate::registry::SessionRegistry;
use crate::rules::{MoveRequest, RulesEngine, RulesError, TerminalReason};
use crate::server::ClientId;
use crate::side::Side;
use crate::turn_gate;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SubmitOutcome {
    Applied {
        position: String,
        turn: Side,
        terminal: Option<TerminalReason>,
    },
    // Nothing changed.
    Rejected(MoveRejection),
    // The engine failed unexpectedly. Nothing changed.
    Failed(String),
}

// The only path by which a move changes the position. The caller must not let anything
// else touch `engine` while this runs.
pub fn submit(
    engine: &mut dyn RulesEngine, registry: &SessionRegistry, client_id: ClientId,
    mv: &MoveRequest,
) -> SubmitOutcome {
    if engine.is_terminal().is_some() {
        return SubmitOutcome::Rejected(MoveRejection::GameOver);
    }
    let side_to_move = engine.turn_owner();
    if !turn_gate::authorize(registry, client_id, side_to_move) {
        return SubmitOutcome::Rejected(MoveRejection::NotYourTurn);
    }
    match engine.apply_move(mv) {
        Ok(_) => {}
        Err(RulesError::Illegal(_)) => return SubmitOutcome::Rejected(MoveRejection::IllegalMove),
        Err(RulesError::Internal(message)) => {
            error!("Failed to apply move {} by {:?}: {}", mv, client_id, message);
            return SubmitOutcome::Failed(message);
        }
    }
    let terminal = engine.is_terminal();
    let turn = engine.turn_owner();
    if turn == side_to_move {
        warn!("Side to move did not change after {} by {:?}", mv, side_to_move);
    }
    if !registry.snapshot().both() {
        warn!("Move {} applied while not both sides are occupied", mv);
    }
    SubmitOutcome::Applied {
        position: engine.current_state(),
        turn,
        terminal,
    }
}

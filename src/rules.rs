// The rules engine is treated as an external collaborator: the session code only talks to it
// through `RulesEngine` and never re-derives legality on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Square;
use crate::piece::PieceKind;
use crate::side::Side;


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: &str, to: &str, promotion: Option<PieceKind>) -> Self {
        MoveRequest {
            from: Square::new(from),
            to: Square::new(to),
            promotion,
        }
    }

    // Parses long algebraic notation, e.g. "e2e4" or "e7e8q".
    pub fn from_uci(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        if !notation.is_ascii() {
            return None;
        }
        match notation.len() {
            4 => Some(MoveRequest::new(&notation[0..2], &notation[2..4], None)),
            5 => {
                let promotion = PieceKind::from_algebraic(notation.chars().last()?)?;
                Some(MoveRequest::new(&notation[0..2], &notation[2..4], Some(promotion)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_algebraic())?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    // Standard algebraic notation of the applied move, e.g. "Nf3". Used for logging only.
    pub notation: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RulesError {
    // The move is not legal in the current position. The position is unchanged.
    Illegal(String),
    // The engine failed for reasons unrelated to the move itself. The position is unchanged.
    Internal(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DrawCause {
    #[serde(rename = "stalemate")]
    Stalemate,
    #[serde(rename = "repetition")]
    ThreefoldRepetition,
    #[serde(rename = "insufficient material")]
    InsufficientMaterial,
    #[serde(rename = "fifty-move rule")]
    FiftyMoveRule,
}

// Serialized the way the client expects game over notifications:
//   {"reason": "checkmate", "winner": "white"}
//   {"reason": "draw", "cause": "stalemate"}
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "lowercase")]
pub enum TerminalReason {
    Checkmate { winner: Side },
    Draw { cause: DrawCause },
}

pub trait RulesEngine {
    // Position token: a serializable snapshot sufficient to reconstruct the position (FEN).
    fn current_state(&self) -> String;
    fn turn_owner(&self) -> Side;
    // Must leave the position unchanged on error.
    fn apply_move(&mut self, candidate: &MoveRequest) -> Result<MoveOutcome, RulesError>;
    fn is_terminal(&self) -> Option<TerminalReason>;
    fn reset(&mut self);
}

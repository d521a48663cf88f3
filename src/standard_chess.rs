// Classic chess rules backed by `shakmaty`.

use std::collections::HashMap;

use log::warn;
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

use crate::internal_error_message;
use crate::rules::{DrawCause, MoveOutcome, MoveRequest, RulesEngine, RulesError, TerminalReason};
use crate::side::Side;


const FIFTY_MOVE_RULE_HALFMOVES: u32 = 100;
const REPETITIONS_FOR_DRAW: usize = 3;

#[derive(Clone, Debug)]
pub struct StandardChess {
    position: Chess,
    // Number of times each position occurred since the game started. Keyed by FEN without
    // move counters, which is exactly what matters for repetition: pieces, side to move,
    // castling rights and a legal en passant square.
    repetitions: HashMap<String, usize>,
}

impl StandardChess {
    pub fn new() -> Self { Self::with_position(Chess::default()) }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        let fen: Fen = fen.parse().map_err(|err| format!("Invalid FEN \"{fen}\": {err}"))?;
        let position: Chess =
            fen.into_position(CastlingMode::Standard).map_err(|err| format!("{err}"))?;
        Ok(Self::with_position(position))
    }

    fn with_position(position: Chess) -> Self {
        let mut ret = StandardChess { position, repetitions: HashMap::new() };
        ret.record_position();
        ret
    }

    fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    fn repetition_key(&self) -> String {
        let fen = self.fen();
        fen.rsplitn(3, ' ').last().unwrap_or(&fen).to_owned()
    }

    fn record_position(&mut self) {
        *self.repetitions.entry(self.repetition_key()).or_default() += 1;
    }

    fn is_threefold_repetition(&self) -> bool {
        self.repetitions.get(&self.repetition_key()).copied().unwrap_or(0)
            >= REPETITIONS_FOR_DRAW
    }

    fn parse_move(&self, candidate: &MoveRequest) -> Result<Move, RulesError> {
        let illegal = || RulesError::Illegal(format!("Illegal move: {candidate}"));
        let from = candidate.from.as_str().parse().map_err(|_| illegal())?;
        let to = candidate.to.as_str().parse().map_err(|_| illegal())?;
        let exact = UciMove::Normal {
            from,
            to,
            promotion: candidate.promotion.map(Into::into),
        };
        // Clients may attach a promotion piece to every move (the web client always sends
        // "q"). It only matters when the move actually promotes a pawn.
        let without_promotion = UciMove::Normal { from, to, promotion: None };
        exact
            .to_move(&self.position)
            .or_else(|_| without_promotion.to_move(&self.position))
            .map_err(|_| illegal())
    }
}

impl Default for StandardChess {
    fn default() -> Self { Self::new() }
}

impl RulesEngine for StandardChess {
    fn current_state(&self) -> String { self.fen() }

    fn turn_owner(&self) -> Side { self.position.turn().into() }

    fn apply_move(&mut self, candidate: &MoveRequest) -> Result<MoveOutcome, RulesError> {
        let mv = self.parse_move(candidate)?;
        let notation = San::from_move(&self.position, &mv).to_string();
        let position = self.position.clone().play(&mv).map_err(|err| {
            warn!("Move {} passed legality check but could not be played", candidate);
            RulesError::Internal(internal_error_message!("{err}"))
        })?;
        self.position = position;
        self.record_position();
        Ok(MoveOutcome { notation })
    }

    fn is_terminal(&self) -> Option<TerminalReason> {
        if self.position.is_checkmate() {
            // The side to move is mated.
            let winner = self.turn_owner().opponent();
            return Some(TerminalReason::Checkmate { winner });
        }
        let cause = if self.position.is_stalemate() {
            DrawCause::Stalemate
        } else if self.is_threefold_repetition() {
            DrawCause::ThreefoldRepetition
        } else if self.position.is_insufficient_material() {
            DrawCause::InsufficientMaterial
        } else if self.position.halfmoves() >= FIFTY_MOVE_RULE_HALFMOVES {
            DrawCause::FiftyMoveRule
        } else {
            return None;
        };
        Some(TerminalReason::Draw { cause })
    }

    fn reset(&mut self) { *self = Self::new(); }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::piece::PieceKind;
    use crate::test_util::{replay_moves, FOOLS_MATE, INITIAL_FEN};

    fn mv(notation: &str) -> MoveRequest { MoveRequest::from_uci(notation).unwrap() }

    #[test]
    fn initial_position() {
        let chess = StandardChess::new();
        assert_eq!(chess.current_state(), INITIAL_FEN);
        assert_eq!(chess.turn_owner(), Side::White);
        assert_eq!(chess.is_terminal(), None);
    }

    #[test]
    fn legal_move_flips_turn() {
        let mut chess = StandardChess::new();
        let outcome = chess.apply_move(&mv("g1f3")).unwrap();
        assert_eq!(outcome.notation, "Nf3");
        assert_eq!(chess.turn_owner(), Side::Black);
        assert_eq!(
            chess.current_state(),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
        );
    }

    #[test]
    fn illegal_move_keeps_position() {
        let mut chess = StandardChess::new();
        for notation in ["e2e5", "e7e5", "z9e4", "e1e1"] {
            assert!(matches!(chess.apply_move(&mv(notation)), Err(RulesError::Illegal(_))));
        }
        let garbage = MoveRequest::new("nowhere", "e4", None);
        assert!(matches!(chess.apply_move(&garbage), Err(RulesError::Illegal(_))));
        assert_eq!(chess.current_state(), INITIAL_FEN);
    }

    #[test]
    fn promotion_piece_ignored_for_ordinary_moves() {
        let mut chess = StandardChess::new();
        chess.apply_move(&MoveRequest::new("e2", "e4", Some(PieceKind::Queen))).unwrap();
        assert_eq!(chess.turn_owner(), Side::Black);
    }

    #[test]
    fn promotion_requires_piece() {
        let mut chess = StandardChess::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        assert!(matches!(chess.apply_move(&mv("e7e8")), Err(RulesError::Illegal(_))));
        assert!(matches!(chess.apply_move(&mv("e7e8k")), Err(RulesError::Illegal(_))));
        chess.apply_move(&mv("e7e8n")).unwrap();
        assert_eq!(chess.current_state(), "4N3/8/8/8/8/8/k7/4K3 b - - 0 1");
    }

    #[test]
    fn castling_with_king_move() {
        let mut chess = StandardChess::new();
        replay_moves(&mut chess, "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6").unwrap();
        let outcome = chess.apply_move(&mv("e1g1")).unwrap();
        assert_eq!(outcome.notation, "O-O");
    }

    #[test]
    fn fools_mate() {
        let mut chess = StandardChess::new();
        replay_moves(&mut chess, FOOLS_MATE).unwrap();
        assert_eq!(chess.turn_owner(), Side::White);
        assert_eq!(chess.is_terminal(), Some(TerminalReason::Checkmate { winner: Side::Black }));
    }

    #[test]
    fn stalemate() {
        let mut chess = StandardChess::from_fen("7k/8/6Q1/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(chess.is_terminal(), None);
        chess.apply_move(&mv("g6f7")).unwrap();
        assert_eq!(
            chess.is_terminal(),
            Some(TerminalReason::Draw { cause: DrawCause::Stalemate })
        );
    }

    #[test]
    fn threefold_repetition() {
        let mut chess = StandardChess::new();
        replay_moves(&mut chess, "g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1").unwrap();
        assert_eq!(chess.is_terminal(), None);
        chess.apply_move(&mv("f6g8")).unwrap();
        assert_eq!(
            chess.is_terminal(),
            Some(TerminalReason::Draw { cause: DrawCause::ThreefoldRepetition })
        );
    }

    #[test]
    fn insufficient_material() {
        let mut chess = StandardChess::from_fen("8/8/8/8/8/2k5/1R6/7K b - - 0 1").unwrap();
        assert_eq!(chess.is_terminal(), None);
        chess.apply_move(&mv("c3b2")).unwrap();
        assert_eq!(
            chess.is_terminal(),
            Some(TerminalReason::Draw { cause: DrawCause::InsufficientMaterial })
        );
    }

    #[test]
    fn fifty_move_rule() {
        let mut chess = StandardChess::from_fen("8/8/8/8/8/2k5/8/KR6 w - - 99 80").unwrap();
        assert_eq!(chess.is_terminal(), None);
        chess.apply_move(&mv("b1b2")).unwrap();
        assert_eq!(
            chess.is_terminal(),
            Some(TerminalReason::Draw { cause: DrawCause::FiftyMoveRule })
        );
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut chess = StandardChess::new();
        replay_moves(&mut chess, FOOLS_MATE).unwrap();
        chess.reset();
        assert_eq!(chess.current_state(), INITIAL_FEN);
        assert_eq!(chess.is_terminal(), None);
    }
}

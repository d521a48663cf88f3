// Wire protocol. Events are JSON-encoded and externally tagged, with tags matching what the
// web client listens to, e.g. `{"turn": {"side": "black"}}` or `"gameReset"`.

use serde::{Deserialize, Serialize};

use crate::rules::{MoveRequest, TerminalReason};
use crate::side::Side;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Occupancy {
    pub white: bool,
    pub black: bool,
}

impl Occupancy {
    pub fn both(self) -> bool { self.white && self.black }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChessServerEvent {
    // Targeted, sent on connect when a playing slot was assigned.
    PlayerRole { side: Side },
    // Targeted, sent on connect when both slots are taken.
    SpectatorRole,
    // Full position as FEN.
    GameState { position: String },
    PlayersUpdate(Occupancy),
    Turn { side: Side },
    // Echo of an applied move, so that clients can replay it on their own board.
    Move(MoveRequest),
    // Targeted, sent to the submitter of a move that was not accepted for any reason.
    InvalidMove(MoveRequest),
    GameOver(TerminalReason),
    GameReset,
    // Targeted, sent on an unexpected failure while processing a move.
    Error { message: String },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChessClientEvent {
    Move(MoveRequest),
    ResetGame,
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::DrawCause;

    fn to_json(event: &ChessServerEvent) -> String { serde_json::to_string(event).unwrap() }

    #[test]
    fn server_event_tags() {
        assert_eq!(to_json(&ChessServerEvent::PlayerRole { side: Side::White }), r#"{"playerRole":{"side":"white"}}"#);
        assert_eq!(to_json(&ChessServerEvent::SpectatorRole), r#""spectatorRole""#);
        assert_eq!(
            to_json(&ChessServerEvent::PlayersUpdate(Occupancy { white: true, black: false })),
            r#"{"playersUpdate":{"white":true,"black":false}}"#
        );
        assert_eq!(to_json(&ChessServerEvent::GameReset), r#""gameReset""#);
        assert_eq!(
            to_json(&ChessServerEvent::GameOver(TerminalReason::Draw {
                cause: DrawCause::ThreefoldRepetition
            })),
            r#"{"gameOver":{"reason":"draw","cause":"repetition"}}"#
        );
    }

    #[test]
    fn client_event_parsing() {
        let event: ChessClientEvent =
            serde_json::from_str(r#"{"move": {"from": "e2", "to": "e4", "promotion": "q"}}"#)
                .unwrap();
        let ChessClientEvent::Move(mv) = event else {
            panic!("Expected a move, got {event:?}");
        };
        assert_eq!(mv.to_string(), "e2e4q");
        assert_eq!(
            serde_json::from_str::<ChessClientEvent>(r#""resetGame""#).unwrap(),
            ChessClientEvent::ResetGame
        );
        assert!(serde_json::from_str::<ChessClientEvent>(r#""surrender""#).is_err());
    }
}

use serde::{Deserialize, Serialize};


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}

// Why a move was not accepted. The submitter is notified with `invalidMove` in every case;
// the distinction exists for logging and tests.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MoveRejection {
    // The submitter does not occupy the side to move (this includes observers).
    NotYourTurn,
    // The rules engine rejected the move.
    IllegalMove,
    // The game has already ended in checkmate or a draw. Requires a reset.
    GameOver,
}


#[cfg(test)]
mod tests {
    #[test]
    fn internal_error_message_mentions_location() {
        let message = internal_error_message!("bad {}", 42);
        assert!(message.starts_with("Internal error at src/error.rs:"), "{message}");
        assert!(message.ends_with(": bad 42."), "{message}");
    }
}

// Connection lifecycle policy, kept free of any network or engine dependency. `GameSession`
// applies these decisions and emits the corresponding events.

use crate::registry::{ReleasedSlots, SessionRegistry};
use crate::server::ClientId;


pub fn on_disconnect(registry: &mut SessionRegistry, client_id: ClientId) -> ReleasedSlots {
    registry.release(client_id)
}

// A game is abandoned when a player leaves while it is in progress. Losing a player before
// both sides were filled keeps the position as is.
pub fn should_reset(freed: ReleasedSlots, was_in_progress: bool) -> bool {
    freed.any() && was_in_progress
}

// Filling the second seat starts the game. A terminal position stays as it is until a reset,
// moves on it are refused by the move coordinator.
pub fn should_start(registry: &SessionRegistry, in_progress: bool) -> bool {
    !in_progress && registry.snapshot().both()
}

use crate::registry::SessionRegistry;
use crate::server::ClientId;
use crate::side::Side;


// Whether `client_id` may submit a move when `side_to_move` is to move. Observers and the
// occupant of the other side are never authorized.
pub fn authorize(registry: &SessionRegistry, client_id: ClientId, side_to_move: Side) -> bool {
    registry.occupant(side_to_move) == Some(client_id)
}

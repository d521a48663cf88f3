use serde::{Deserialize, Serialize};

use crate::side::Side;


// The capacity in which a connection takes part in the game. Everybody who does not occupy
// one of the two playing slots is an observer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Role {
    Player(Side),
    Observer,
}

impl Role {
    pub fn side(self) -> Option<Side> {
        match self {
            Role::Player(side) => Some(side),
            Role::Observer => None,
        }
    }
    pub fn is_player(self) -> bool { self.side().is_some() }
}

use enum_map::{EnumMap, enum_map};
use strum::IntoEnumIterator;

use crate::event::Occupancy;
use crate::role::Role;
use crate::server::ClientId;
use crate::side::Side;


#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ReleasedSlots {
    pub white_freed: bool,
    pub black_freed: bool,
}

impl ReleasedSlots {
    pub fn any(self) -> bool { self.white_freed || self.black_freed }
    pub fn sides(self) -> impl Iterator<Item = Side> {
        Side::iter().filter(move |&side| match side {
            Side::White => self.white_freed,
            Side::Black => self.black_freed,
        })
    }
}

// Tracks which connection plays which side. A connection occupies at most one side; every
// connected client not mentioned here is an observer.
#[derive(Debug)]
pub struct SessionRegistry {
    slots: EnumMap<Side, Option<ClientId>>,
}

impl SessionRegistry {
    pub fn new() -> Self { SessionRegistry { slots: enum_map! { _ => None } } }

    // First come, first served: White, then Black, then observers. Existing occupants are
    // never moved.
    pub fn assign_role(&mut self, client_id: ClientId) -> Role {
        if let Some(side) = self.side_of(client_id) {
            return Role::Player(side);
        }
        for side in Side::iter() {
            if self.slots[side].is_none() {
                self.slots[side] = Some(client_id);
                return Role::Player(side);
            }
        }
        Role::Observer
    }

    pub fn release(&mut self, client_id: ClientId) -> ReleasedSlots {
        let mut freed: EnumMap<Side, bool> = enum_map! { _ => false };
        for (side, slot) in self.slots.iter_mut() {
            if *slot == Some(client_id) {
                *slot = None;
                freed[side] = true;
            }
        }
        ReleasedSlots {
            white_freed: freed[Side::White],
            black_freed: freed[Side::Black],
        }
    }

    pub fn snapshot(&self) -> Occupancy {
        Occupancy {
            white: self.slots[Side::White].is_some(),
            black: self.slots[Side::Black].is_some(),
        }
    }

    pub fn occupant(&self, side: Side) -> Option<ClientId> { self.slots[side] }

    pub fn side_of(&self, client_id: ClientId) -> Option<Side> {
        Side::iter().find(|&side| self.slots[side] == Some(client_id))
    }

    pub fn role_of(&self, client_id: ClientId) -> Role {
        self.side_of(client_id).map_or(Role::Observer, Role::Player)
    }
}

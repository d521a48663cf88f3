#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod coord;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod move_coordinator;
pub mod piece;
pub mod registry;
pub mod role;
pub mod rules;
pub mod server;
pub mod side;
pub mod standard_chess;
pub mod test_util;
pub mod turn_gate;

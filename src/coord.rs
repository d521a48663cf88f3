use std::fmt;

use serde::{Deserialize, Serialize};


// A board square as the client names it, e.g. "e4". The server never interprets squares
// beyond handing them to the rules engine, so any string is accepted here.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Square(String);

impl Square {
    pub fn new(name: impl Into<String>) -> Self { Square(name.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

use std::sync::{Arc, Mutex};

use chess_relay::event::Occupancy;
use chess_relay::server::{Clients, GameSession};


// What the landing page shows. Written by the game session thread after every event.
#[derive(Clone, Copy, Debug)]
pub struct ServerInfo {
    pub occupancy: Occupancy,
    pub in_progress: bool,
}

impl ServerInfo {
    pub fn new() -> Self {
        ServerInfo {
            occupancy: Occupancy { white: false, black: false },
            in_progress: false,
        }
    }

    pub fn update(&mut self, session: &GameSession) {
        self.occupancy = session.occupancy();
        self.in_progress = session.in_progress();
    }
}

pub struct HttpServerStateImpl {
    pub clients: Arc<Clients>,
    pub server_info: Arc<Mutex<ServerInfo>>,
    pub page_title: String,
}

pub type HttpServerState = Arc<HttpServerStateImpl>;

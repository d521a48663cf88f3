// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::Arc;

use chess_relay::event::{ChessClientEvent, ChessServerEvent};
use chess_relay::rules::{MoveRequest, RulesEngine};
use chess_relay::server::{Clients, ClientId, GameSession, IncomingEvent};
use chess_relay::standard_chess::StandardChess;


pub struct Server {
    pub clients: Arc<Clients>,
    pub session: GameSession,
}

impl Server {
    #[allow(dead_code)]
    pub fn new() -> Self { Self::with_engine(Box::new(StandardChess::new())) }

    pub fn with_engine(engine: Box<dyn RulesEngine + Send>) -> Self {
        let clients = Arc::new(Clients::new());
        let session = GameSession::new(Arc::clone(&clients), engine);
        Server { clients, session }
    }

    pub fn apply(&mut self, event: IncomingEvent) {
        println!(">>> {:?}", event);
        let _ = self.session.apply_event(event);
    }
}


pub struct Client {
    pub id: ClientId,
    incoming_rx: async_std::channel::Receiver<ChessServerEvent>,
}

impl Client {
    // Mirrors the network layer: the client becomes reachable first, then the session learns
    // about it.
    pub fn connect(server: &mut Server, name: &str) -> Self {
        let (incoming_tx, incoming_rx) = async_std::channel::unbounded();
        let id = server.clients.add_client(incoming_tx, name.to_owned());
        server.apply(IncomingEvent::Connect(id));
        Client { id, incoming_rx }
    }

    #[allow(dead_code)]
    pub fn disconnect(&self, server: &mut Server) {
        assert!(server.clients.remove_client(self.id).is_some());
        server.apply(IncomingEvent::Disconnect(self.id));
    }

    #[allow(dead_code)]
    pub fn make_move(&self, server: &mut Server, notation: &str) {
        let mv = MoveRequest::from_uci(notation).unwrap();
        server.apply(IncomingEvent::Network(self.id, ChessClientEvent::Move(mv)));
    }

    #[allow(dead_code)]
    pub fn reset_game(&self, server: &mut Server) {
        server.apply(IncomingEvent::Network(self.id, ChessClientEvent::ResetGame));
    }

    pub fn events(&self) -> Vec<ChessServerEvent> {
        let mut events = vec![];
        while let Ok(event) = self.incoming_rx.try_recv() {
            println!("{:?} <<< {:?}", self.id, event);
            events.push(event);
        }
        events
    }
}

#[allow(dead_code)]
pub fn drain_all(clients: &[&Client]) {
    for client in clients {
        client.events();
    }
}

#[allow(dead_code)]
pub fn mv(notation: &str) -> MoveRequest { MoveRequest::from_uci(notation).unwrap() }

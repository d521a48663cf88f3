// A single game shared by everybody connected to the process. All mutations go through
// `GameSession::apply_event`, which is expected to be called from one thread: events are
// processed strictly one at a time, each together with everything it emits.

use std::collections::{HashMap, hash_map};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::error::MoveRejection;
use crate::event::{ChessClientEvent, ChessServerEvent, Occupancy};
use crate::lifecycle;
use crate::move_coordinator::{self, SubmitOutcome};
use crate::registry::SessionRegistry;
use crate::role::Role;
use crate::rules::{MoveRequest, RulesEngine};
use crate::side::Side;


const MOVE_FAILED_MESSAGE: &str = "An error occurred while processing your move.";

#[derive(Debug)]
pub enum IncomingEvent {
    Connect(ClientId),
    Disconnect(ClientId),
    Network(ClientId, ChessClientEvent),
    Terminate,
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClientId(pub(crate) u64);

struct Client {
    events_tx: async_std::channel::Sender<ChessServerEvent>,
    // Only for logs.
    logging_id: String,
}

impl Client {
    // Fire-and-forget: if the channel is closed the connection is going away anyway and the
    // network layer will report a disconnect.
    fn send(&self, event: ChessServerEvent) {
        if let Err(err) = self.events_tx.try_send(event) {
            warn!("Dropped event for client {}: {}", self.logging_id, err);
        }
    }
}

// Outgoing side of all connections. Shared between the network layer, which adds and removes
// clients, and the game session, which sends events.
pub struct Clients {
    map: Mutex<HashMap<ClientId, Client>>,
}

impl Clients {
    pub fn new() -> Self { Clients { map: Mutex::new(HashMap::new()) } }

    pub fn add_client(
        &self, events_tx: async_std::channel::Sender<ChessServerEvent>, logging_id: String,
    ) -> ClientId {
        let client = Client { events_tx, logging_id };
        let mut map = self.map.lock().unwrap();
        loop {
            let id = ClientId(rand::random());
            match map.entry(id) {
                hash_map::Entry::Occupied(_) => {}
                hash_map::Entry::Vacant(e) => {
                    e.insert(client);
                    return id;
                }
            }
        }
    }

    // Returns the client logging id if the client existed. A client can be removed by
    // either the reading or the writing half of the connection; only the first call succeeds.
    pub fn remove_client(&self, id: ClientId) -> Option<String> {
        self.map.lock().unwrap().remove(&id).map(|client| client.logging_id)
    }

    pub fn len(&self) -> usize { self.map.lock().unwrap().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn logging_id(&self, id: ClientId) -> String {
        self.map
            .lock()
            .unwrap()
            .get(&id)
            .map_or_else(|| format!("{id:?}"), |client| client.logging_id.clone())
    }

    pub fn send(&self, id: ClientId, event: ChessServerEvent) {
        if let Some(client) = self.map.lock().unwrap().get(&id) {
            client.send(event);
        }
    }

    pub fn broadcast(&self, event: &ChessServerEvent) {
        for client in self.map.lock().unwrap().values() {
            client.send(event.clone());
        }
    }
}


pub struct GameSession {
    clients: Arc<Clients>,
    engine: Box<dyn RulesEngine + Send>,
    registry: SessionRegistry,
    in_progress: bool,
    // Mirrors `engine.turn_owner()`. Updated together with every position change.
    turn: Side,
}

impl GameSession {
    pub fn new(clients: Arc<Clients>, engine: Box<dyn RulesEngine + Send>) -> Self {
        let turn = engine.turn_owner();
        GameSession {
            clients,
            engine,
            registry: SessionRegistry::new(),
            in_progress: false,
            turn,
        }
    }

    pub fn in_progress(&self) -> bool { self.in_progress }
    pub fn turn(&self) -> Side { self.turn }
    pub fn position(&self) -> String { self.engine.current_state() }
    pub fn occupancy(&self) -> Occupancy { self.registry.snapshot() }
    pub fn role_of(&self, client_id: ClientId) -> Role { self.registry.role_of(client_id) }

    pub fn apply_event(&mut self, event: IncomingEvent) -> ControlFlow<()> {
        match event {
            IncomingEvent::Connect(client_id) => self.process_connect(client_id),
            IncomingEvent::Disconnect(client_id) => self.process_disconnect(client_id),
            IncomingEvent::Network(client_id, event) => match event {
                ChessClientEvent::Move(mv) => self.process_move(client_id, mv),
                ChessClientEvent::ResetGame => self.process_reset_request(client_id),
            },
            IncomingEvent::Terminate => {
                info!("Terminating game session with {} connected clients", self.clients.len());
                return ControlFlow::Break(());
            }
        }
        debug_assert_eq!(self.turn, self.engine.turn_owner());
        ControlFlow::Continue(())
    }

    fn process_connect(&mut self, client_id: ClientId) {
        let logging_id = self.clients.logging_id(client_id);
        match self.registry.assign_role(client_id) {
            Role::Player(side) => {
                info!("Client {} plays {}", logging_id, side);
                self.clients.send(client_id, ChessServerEvent::PlayerRole { side });
            }
            Role::Observer => {
                info!("Client {} observes", logging_id);
                self.clients.send(client_id, ChessServerEvent::SpectatorRole);
            }
        }
        self.clients.send(client_id, ChessServerEvent::GameState { position: self.position() });
        self.clients.broadcast(&ChessServerEvent::PlayersUpdate(self.registry.snapshot()));

        if lifecycle::should_start(&self.registry, self.in_progress) {
            info!("Both sides are occupied, game started");
            self.in_progress = true;
            self.clients.broadcast(&ChessServerEvent::Turn { side: self.turn });
        }
    }

    fn process_disconnect(&mut self, client_id: ClientId) {
        let was_in_progress = self.in_progress;
        let freed = lifecycle::on_disconnect(&mut self.registry, client_id);
        if !freed.any() {
            return;
        }
        for side in freed.sides() {
            info!("The {} player left", side);
        }
        self.clients.broadcast(&ChessServerEvent::PlayersUpdate(self.registry.snapshot()));
        if lifecycle::should_reset(freed, was_in_progress) {
            info!("Game abandoned, resetting");
            self.reset_game();
            self.in_progress = false;
        }
    }

    fn process_move(&mut self, client_id: ClientId, mv: MoveRequest) {
        match move_coordinator::submit(self.engine.as_mut(), &self.registry, client_id, &mv) {
            SubmitOutcome::Applied { position, turn, terminal } => {
                self.turn = turn;
                self.clients.broadcast(&ChessServerEvent::Move(mv));
                self.clients.broadcast(&ChessServerEvent::GameState { position });
                self.clients.broadcast(&ChessServerEvent::Turn { side: turn });
                if let Some(reason) = terminal {
                    info!("Game over: {:?}", reason);
                    self.in_progress = false;
                    self.clients.broadcast(&ChessServerEvent::GameOver(reason));
                }
            }
            SubmitOutcome::Rejected(rejection) => {
                let logging_id = self.clients.logging_id(client_id);
                match rejection {
                    MoveRejection::IllegalMove => {
                        info!("Illegal move {} by client {}", mv, logging_id)
                    }
                    MoveRejection::NotYourTurn | MoveRejection::GameOver => {
                        warn!("Move {} by client {} rejected: {:?}", mv, logging_id, rejection)
                    }
                }
                self.clients.send(client_id, ChessServerEvent::InvalidMove(mv));
            }
            SubmitOutcome::Failed(_) => {
                self.clients.send(client_id, ChessServerEvent::Error {
                    message: MOVE_FAILED_MESSAGE.to_owned(),
                });
            }
        }
    }

    fn process_reset_request(&mut self, client_id: ClientId) {
        if !self.registry.role_of(client_id).is_player() {
            info!("Ignoring reset request from observer {}", self.clients.logging_id(client_id));
            return;
        }
        info!("Game reset by {}", self.clients.logging_id(client_id));
        self.reset_game();
        self.in_progress = self.registry.snapshot().both();
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.turn = self.engine.turn_owner();
        self.clients.broadcast(&ChessServerEvent::GameReset);
        self.clients.broadcast(&ChessServerEvent::GameState { position: self.position() });
        self.clients.broadcast(&ChessServerEvent::Turn { side: self.turn });
    }
}

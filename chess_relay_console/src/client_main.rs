// Line-based client, mostly useful for poking a running server by hand. Reads moves in long
// algebraic notation ("e2e4", "e7e8q") or "reset" from stdin.

use std::io::{self, BufRead};
use std::net::TcpStream;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, anyhow};
use chess_relay::event::{ChessClientEvent, ChessServerEvent};
use chess_relay::rules::MoveRequest;
use chess_relay::side::Side;
use log::{info, warn};
use tungstenite::protocol;
use url::Url;

use crate::network::{self, CommunicationError};
use crate::tui;


pub struct ClientConfig {
    pub server_address: String,
}

fn parse_command(line: &str) -> Result<Option<ChessClientEvent>, String> {
    let line = line.trim();
    match line {
        "" => Ok(None),
        "reset" => Ok(Some(ChessClientEvent::ResetGame)),
        _ => MoveRequest::from_uci(line)
            .map(|mv| Some(ChessClientEvent::Move(mv)))
            .ok_or_else(|| format!("Cannot parse '{line}'. Expected a move like e2e4 or 'reset'")),
    }
}

pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let ws_request = Url::parse(&format!("ws://{}/ws", config.server_address))
        .with_context(|| format!("Invalid server address '{}'", config.server_address))?;
    let host = ws_request.host_str().ok_or_else(|| anyhow!("Server address has no host"))?;
    let port = ws_request.port().unwrap_or(network::DEFAULT_PORT);
    println!("Connecting to {}:{}...", host, port);
    let stream = TcpStream::connect((host, port))?;
    let (mut socket_in, _) = tungstenite::client(ws_request.as_str(), stream)
        .map_err(|err| anyhow!("Websocket handshake failed: {err}"))?;
    let mut socket_out = network::clone_websocket(&socket_in, protocol::Role::Client)?;

    // Board orientation follows the assigned side; observers see it from White.
    let perspective = Arc::new(Mutex::new(Side::White));
    let perspective_copy = Arc::clone(&perspective);
    thread::spawn(move || {
        loop {
            match network::read_obj::<ChessServerEvent, _>(&mut socket_in) {
                Ok(ev) => {
                    if let ChessServerEvent::PlayerRole { side } = ev {
                        *perspective_copy.lock().unwrap() = side;
                    }
                    println!("{}", tui::render_event(&ev, *perspective_copy.lock().unwrap()));
                }
                Err(CommunicationError::ConnectionClosed) => {
                    info!("Server closed the connection");
                    std::process::exit(0);
                }
                Err(CommunicationError::Serde(err)) => {
                    warn!("Cannot parse server event: {}", err);
                }
                Err(err) => {
                    warn!("Connection lost: {:?}", err);
                    std::process::exit(1);
                }
            }
        }
    });

    for line in io::stdin().lock().lines() {
        match parse_command(&line?) {
            Ok(Some(event)) => {
                network::write_obj(&mut socket_out, &event)
                    .map_err(|err| anyhow!("Cannot send to server: {err:?}"))?;
            }
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use chess_relay::piece::PieceKind;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn commands() {
        assert_eq!(parse_command("  \n"), Ok(None));
        assert_eq!(parse_command("reset"), Ok(Some(ChessClientEvent::ResetGame)));
        assert_eq!(
            parse_command("e7e8q\n"),
            Ok(Some(ChessClientEvent::Move(MoveRequest::new("e7", "e8", Some(PieceKind::Queen)))))
        );
        assert!(parse_command("castle").is_err());
    }
}

// Improvement potential: Switch from JSON to a binary format once the web client can decode it.

use std::io;
use std::net::TcpStream;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Serialize, de};
use tungstenite::{Message, WebSocket, protocol::Role};


pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
    ConnectionClosed,
}

fn parse_message<T: de::DeserializeOwned>(msg: Message) -> Option<Result<T, CommunicationError>> {
    match msg {
        Message::Text(text) => Some(serde_json::from_str(&text).map_err(CommunicationError::Serde)),
        Message::Close(_) => Some(Err(CommunicationError::ConnectionClosed)),
        // Pings are answered by tungstenite itself.
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
        Message::Binary(_) => {
            Some(Err(CommunicationError::Protocol("Expected text, got binary".to_owned())))
        }
    }
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::Text(serialized.into())).map_err(CommunicationError::Socket)
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    loop {
        let msg = socket.read().map_err(|err| match err {
            tungstenite::Error::ConnectionClosed => CommunicationError::ConnectionClosed,
            err => CommunicationError::Socket(err),
        })?;
        if let Some(result) = parse_message(msg) {
            return result;
        }
    }
}

pub async fn write_obj_async<T, S>(sink: &mut S, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    sink.send(Message::Text(serialized.into())).await.map_err(CommunicationError::Socket)
}

pub async fn read_obj_async<T, S>(stream: &mut S) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        let msg = stream
            .next()
            .await
            .ok_or(CommunicationError::ConnectionClosed)?
            .map_err(CommunicationError::Socket)?;
        if let Some(result) = parse_message(msg) {
            return result;
        }
    }
}

// Improvement potential: Instead of cloning the socket, consider calling
//   TcpStream.set_nonblocking on the underlying stream and doing read/writes in the same thread.
pub fn clone_websocket(socket: &WebSocket<TcpStream>, role: Role) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    Ok(WebSocket::from_raw_socket(stream, role, None))
}

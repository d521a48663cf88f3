// Threading model: one OS thread owns the `GameSession` and applies `IncomingEvent`s one by
// one. Every websocket gets two async tasks: the reader turns client messages into events,
// the writer drains the client's outgoing channel. Neither ever touches the session.

use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use anyhow::Context;
use async_tungstenite::WebSocketStream;
use chess_relay::event::ChessClientEvent;
use chess_relay::server::*;
use chess_relay::standard_chess::StandardChess;
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::StreamExt;
use log::{error, info, warn};
use tide::StatusCode;
use tide_jsx::html;
use tungstenite::protocol;

use crate::http_server_state::*;
use crate::network::{self, CommunicationError};
use crate::server_config::ServerConfig;


async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static>(
    peer_addr: String, stream: WebSocketStream<S>, tx: mpsc::SyncSender<IncomingEvent>,
    clients: Arc<Clients>,
) {
    let (mut stream_tx, mut stream_rx) = stream.split();
    info!("Client connected: {}", peer_addr);

    let (client_tx, client_rx) = async_std::channel::unbounded();
    let client_id = clients.add_client(client_tx, peer_addr);
    // Must be queued before anything the client sends, so that the session sees the client
    // before its first move.
    if tx.send(IncomingEvent::Connect(client_id)).is_err() {
        error!("Game session is gone, dropping client {:?}", client_id);
        clients.remove_client(client_id);
        return;
    }

    // Either half of the connection may notice the disconnect first. Only the one that
    // actually removes the client reports it to the session.
    let remove_client1 = {
        let clients = Arc::clone(&clients);
        let tx = tx.clone();
        move || {
            let logging_id = clients.remove_client(client_id)?;
            let _ = tx.send(IncomingEvent::Disconnect(client_id));
            Some(logging_id)
        }
    };
    let remove_client2 = remove_client1.clone();

    // Client -> Server
    async_std::task::spawn(async move {
        loop {
            match network::read_obj_async::<ChessClientEvent, _>(&mut stream_rx).await {
                Ok(ev) => {
                    if tx.send(IncomingEvent::Network(client_id, ev)).is_err() {
                        break;
                    }
                }
                Err(CommunicationError::Serde(err)) => {
                    warn!("Ignoring malformed message from client {:?}: {}", client_id, err);
                }
                Err(err) => {
                    if let Some(logging_id) = remove_client1() {
                        match err {
                            CommunicationError::ConnectionClosed => {
                                info!("Client {} disconnected", logging_id)
                            }
                            err => warn!(
                                "Client {} disconnected due to read error: {:?}",
                                logging_id, err
                            ),
                        }
                    }
                    break;
                }
            }
        }
    });

    // Server -> Client. Ends when the client is removed from `clients`, because that drops
    // the only sender.
    while let Ok(ev) = client_rx.recv().await {
        if let Err(err) = network::write_obj_async(&mut stream_tx, &ev).await {
            if let Some(logging_id) = remove_client2() {
                warn!("Client {} disconnected due to write error: {:?}", logging_id, err);
            }
            break;
        }
    }
}

async fn handle_landing_page(req: tide::Request<HttpServerState>) -> tide::Result {
    let state = req.state();
    let title = state.page_title.clone();
    let num_clients = state.clients.len();
    let info = *state.server_info.lock().unwrap();
    let seat = |occupied: bool| if occupied { "taken" } else { "free" };
    let white_seat = seat(info.occupancy.white);
    let black_seat = seat(info.occupancy.black);
    let status = if info.in_progress { "Game in progress." } else { "Waiting for players." };
    let h: String = html! {
        <html>
        <head>
            <title>{title.clone()}</title>
        </head>
        <body>
            <h1>{title}</h1>
            <p>{status}</p>
            <p>
                {"White: "}{white_seat}{". Black: "}{black_seat}{"."}
            </p>
            <p>
                {"Connected clients: "}{num_clients}
            </p>
            <p>
                <a href={"/static/index.html"}>{"Open the board"}</a>
            </p>
        </body>
        </html>
    };
    let mut resp = tide::Response::new(StatusCode::Ok);
    resp.set_content_type(http_types::Mime::from("text/html; charset=UTF-8"));
    resp.set_body(h);
    Ok(resp)
}

fn run_tide(
    config: ServerConfig, clients: Arc<Clients>, server_info: Arc<Mutex<ServerInfo>>,
    tx: mpsc::SyncSender<IncomingEvent>,
) -> anyhow::Result<()> {
    let mut app = tide::with_state(Arc::new(HttpServerStateImpl {
        clients,
        server_info,
        page_title: config.page_title.clone(),
    }));

    app.with(tide::utils::After(|mut res: tide::Response| async {
        if let Some(err) = res.error() {
            let msg = format!("Error: {:#?}", err);
            res.set_status(err.status());
            res.set_body(msg);
        }
        Ok(res)
    }));

    app.at("/").get(handle_landing_page);

    if Path::new(&config.static_content_dir).is_dir() {
        app.at("/static")
            .serve_dir(&config.static_content_dir)
            .with_context(|| format!("Serving {}", config.static_content_dir))?;
    } else {
        warn!(
            "Static content directory '{}' not found, only the landing page is served",
            config.static_content_dir
        );
    }

    app.at("/ws").get(move |req: tide::Request<HttpServerState>| {
        let mytx = tx.clone();
        async move {
            let peer_addr = req.peer_addr().map_or_else(
                || Err(tide::Error::from_str(StatusCode::Forbidden, "Peer address missing")),
                |x| Ok(x.to_owned()),
            )?;
            let key = req
                .header("Sec-WebSocket-Key")
                .map(|values| values.last().as_str().to_owned())
                .ok_or_else(|| {
                    tide::Error::from_str(StatusCode::BadRequest, "Expected a websocket request")
                })?;
            let myclients = Arc::clone(&req.state().clients);

            let mut http_types_resp = http_types::Response::new(StatusCode::SwitchingProtocols);
            http_types_resp.insert_header("Upgrade", "websocket");
            http_types_resp.insert_header("Connection", "Upgrade");
            http_types_resp.insert_header(
                "Sec-WebSocket-Accept",
                tungstenite::handshake::derive_accept_key(key.as_bytes()),
            );

            // http_types::Response is a magic thing that can give us the stream back
            // once it's upgraded.
            let upgrade_receiver = http_types_resp.recv_upgrade().await;

            async_std::task::spawn(async move {
                if let Some(stream) = upgrade_receiver.await {
                    let stream =
                        WebSocketStream::from_raw_socket(stream, protocol::Role::Server, None)
                            .await;
                    handle_connection(peer_addr, stream, mytx, myclients).await;
                } else {
                    error!("Never received an upgrade for client {}", peer_addr);
                }
            });
            Ok(http_types_resp)
        }
    });

    let address = format!("0.0.0.0:{}", config.port);
    info!("Listening on {}", address);
    async_std::task::block_on(async { app.listen(address.clone()).await })
        .with_context(|| format!("Failed to start the tide server on {address}"))
}

pub fn run(config: ServerConfig) -> anyhow::Result<()> {
    // Limited buffer for data streaming from clients into the server.
    // When this is full because GameSession::apply_event isn't coping with
    // the load, we start putting back pressure on client websockets.
    let (tx, rx) = mpsc::sync_channel(100000);
    let tx_terminate = tx.clone();
    let clients = Arc::new(Clients::new());
    let clients_copy = Arc::clone(&clients);
    let server_info = Arc::new(Mutex::new(ServerInfo::new()));
    let server_info_copy = Arc::clone(&server_info);

    ctrlc::set_handler(move || {
        let _ = tx_terminate.send(IncomingEvent::Terminate);
    })
    .context("Error setting Ctrl-C handler")?;

    thread::spawn(move || {
        let mut session = GameSession::new(clients_copy, Box::new(StandardChess::new()));
        for event in rx {
            if session.apply_event(event).is_break() {
                info!("Server stopped");
                std::process::exit(0);
            }
            server_info_copy.lock().unwrap().update(&session);
        }
        panic!("Unexpected end of events stream");
    });

    run_tide(config, clients, server_info, tx)
}

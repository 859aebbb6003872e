//! Per-connection WebSocket plumbing. Each socket gets a fresh viewer id,
//! follows at most one table at a time, and re-renders its own snapshot on
//! every broadcast pulse.

use crate::game::error::GameError;
use crate::ws::messages::{ClientMessage, ServerMessage};
use crate::ws::server::GameServer;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(server): State<Arc<GameServer>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, server))
}

struct Connection {
    viewer_id: String,
    table_id: Option<String>,
    pulses: Option<broadcast::Receiver<()>>,
}

async fn handle_socket(socket: WebSocket, server: Arc<GameServer>) {
    let (mut sender, mut receiver) = socket.split();
    let mut conn = Connection {
        viewer_id: Uuid::new_v4().to_string(),
        table_id: None,
        pulses: None,
    };
    tracing::info!("viewer {} connected", conn.viewer_id);

    let hello = ServerMessage::Connected {
        viewer_id: conn.viewer_id.clone(),
    };
    if send(&mut sender, &hello).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        tracing::debug!("viewer {}: socket error: {}", conn.viewer_id, err);
                        break;
                    }
                };
                let msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => msg,
                    Err(err) => {
                        tracing::debug!("viewer {}: bad message: {}", conn.viewer_id, err);
                        continue;
                    }
                };
                if let Some(reply) = route(&server, &mut conn, msg).await {
                    if send(&mut sender, &reply).await.is_err() {
                        break;
                    }
                }
            }
            pulse = next_pulse(&mut conn.pulses) => {
                if !pulse {
                    // table torn down under us
                    conn.pulses = None;
                    continue;
                }
                let Some(table_id) = conn.table_id.as_deref() else { continue };
                if let Some(snapshot) = server.snapshot(table_id, &conn.viewer_id).await {
                    if send(&mut sender, &ServerMessage::GameUpdate(snapshot)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("viewer {} disconnected", conn.viewer_id);
    leave_table(&server, &mut conn).await;
}

async fn next_pulse(pulses: &mut Option<broadcast::Receiver<()>>) -> bool {
    match pulses {
        Some(rx) => match rx.recv().await {
            Ok(()) => true,
            // lagging just means we dropped intermediate snapshots
            Err(broadcast::error::RecvError::Lagged(_)) => true,
            Err(broadcast::error::RecvError::Closed) => false,
        },
        None => std::future::pending().await,
    }
}

async fn leave_table(server: &GameServer, conn: &mut Connection) {
    if let Some(table_id) = conn.table_id.take() {
        server.disconnect(&table_id, &conn.viewer_id).await;
        server.detach_viewer(&table_id).await;
    }
    conn.pulses = None;
}

/// Points the connection at `table_id`, detaching from any previous table.
async fn follow_table(server: &GameServer, conn: &mut Connection, table_id: &str) {
    if conn.table_id.as_deref() == Some(table_id) {
        return;
    }
    leave_table(server, conn).await;
    conn.pulses = Some(server.attach_viewer(table_id).await);
    conn.table_id = Some(table_id.to_string());
}

/// Dispatches one client message. A `Some` return is a direct reply to this
/// viewer only; table-wide effects travel via the broadcast channel. Join
/// rejections are the one rule error the client gets told about, everything
/// else is dropped after logging.
async fn route(
    server: &GameServer,
    conn: &mut Connection,
    msg: ClientMessage,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::RequestState { table_id } => {
            follow_table(server, conn, &table_id).await;
            server
                .snapshot(&table_id, &conn.viewer_id)
                .await
                .map(ServerMessage::GameUpdate)
        }
        ClientMessage::JoinTable {
            table_id,
            player_name,
            chips,
            position,
            debug_role,
        } => {
            follow_table(server, conn, &table_id).await;
            match server
                .join_table(
                    &table_id,
                    &conn.viewer_id,
                    player_name,
                    chips,
                    position,
                    debug_role,
                )
                .await
            {
                Ok(()) => None,
                Err(err) => Some(ServerMessage::Error {
                    message: err.to_string(),
                }),
            }
        }
        ClientMessage::PlayerAction { action } => {
            let table_id = conn.table_id.clone()?;
            log_rejection(
                &conn.viewer_id,
                server
                    .player_action(&table_id, &conn.viewer_id, action)
                    .await,
            );
            None
        }
        ClientMessage::StartGame => {
            let table_id = conn.table_id.clone()?;
            log_rejection(&conn.viewer_id, server.start_game(&table_id).await);
            None
        }
        ClientMessage::ShowCards => {
            let table_id = conn.table_id.clone()?;
            log_rejection(
                &conn.viewer_id,
                server.show_cards(&table_id, &conn.viewer_id).await,
            );
            None
        }
        ClientMessage::RequestRunItTwice => {
            let table_id = conn.table_id.clone()?;
            log_rejection(
                &conn.viewer_id,
                server.request_run_it_twice(&table_id, &conn.viewer_id).await,
            );
            None
        }
        ClientMessage::ToggleSlyReveal => {
            let table_id = conn.table_id.clone()?;
            log_rejection(
                &conn.viewer_id,
                server.toggle_sly_reveal(&table_id, &conn.viewer_id).await,
            );
            None
        }
        ClientMessage::RigNextHand => {
            let table_id = conn.table_id.clone()?;
            log_rejection(
                &conn.viewer_id,
                server.rig_next_hand(&table_id, &conn.viewer_id).await,
            );
            None
        }
    }
}

fn log_rejection(viewer_id: &str, result: Result<(), GameError>) {
    if let Err(err) = result {
        tracing::debug!("viewer {}: rejected: {}", viewer_id, err);
    }
}

async fn send(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(msg) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!("snapshot serialization failed: {}", err);
            return Ok(());
        }
    };
    sender.send(Message::Text(text)).await
}

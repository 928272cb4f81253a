//! Per-connection handler: register, pump frames both ways, clean up.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::hub::Hub;

/// Handle a single WebSocket connection until it closes.
pub async fn handle_connection(ws: WebSocketStream<TcpStream>, addr: SocketAddr, hub: Hub) {
    let (mut sink, mut stream) = ws.split();

    // 1. Register and receive our connection ID.
    let (id, mut rx) = hub.connect().await;
    tracing::info!(peer = %addr, connection = %id, "Client connected");

    // 2. Forwarding loop.
    loop {
        tokio::select! {
            // Events queued for this client → its WebSocket
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client → dispatch
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        hub.handle_text(&id, text.as_str()).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 3. Cleanup.
    tracing::info!(peer = %addr, connection = %id, "Client disconnected");
    hub.disconnect(&id).await;
}

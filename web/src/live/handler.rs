use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use domain::identity::Identity;
use futures::{SinkExt, StreamExt};
use log::*;
use realtime::message::{Event, InboundMessage};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Upgrades to a live session. One session per user: opening a second one
/// replaces the first.
pub(crate) async fn live_handler(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    debug!("Establishing live session for {}", identity.user_id);

    ws.on_upgrade(move |socket| run_session(socket, identity, app_state))
}

async fn run_session(socket: WebSocket, identity: Identity, app_state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let session_id = app_state
        .live_manager
        .open_session(identity.user_id.clone(), tx.clone());

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let replaced = matches!(event, Event::SessionReplaced { .. });

            match serde_json::to_string(&event) {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!("Failed to serialize live event: {err}"),
            }

            if replaced {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    });

    let recv_state = app_state.clone();
    let user_id = identity.user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = stream.next().await {
            match frame {
                Message::Text(text) => submit_inbound(&recv_state, &user_id, &tx, text.as_str()),
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    app_state
        .live_manager
        .close_session(&identity.user_id, &session_id);
}

/// Submits an inbound chat frame in its own task, so a submission already
/// under way completes even if the session closes.
fn submit_inbound(
    app_state: &AppState,
    user_id: &str,
    reply: &UnboundedSender<Event>,
    text: &str,
) {
    let inbound = match parse_inbound(text) {
        Ok(inbound) => inbound,
        Err(event) => {
            let _ = reply.send(event);
            return;
        }
    };

    let app_state = app_state.clone();
    let user_id = user_id.to_owned();
    let reply = reply.clone();

    tokio::spawn(async move {
        let result = domain::chat::submit(
            app_state.db_conn_ref(),
            app_state.event_publisher.as_ref(),
            app_state.config.messaging_policy,
            &user_id,
            inbound.connection_id,
            &inbound.body,
        )
        .await;

        if let Err(err) = result {
            debug!("Live message from {user_id} rejected: {err}");
            let _ = reply.send(Event::Error {
                message: err.to_string(),
            });
        }
    });
}

fn parse_inbound(text: &str) -> Result<InboundMessage, Event> {
    serde_json::from_str(text).map_err(|err| Event::Error {
        message: format!("malformed message frame: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_frame_parses() {
        let inbound = parse_inbound(
            r#"{"connection_id":"0192a4a0-0000-7000-8000-000000000001","body":"hello"}"#,
        )
        .unwrap();
        assert_eq!(inbound.body, "hello");
    }

    #[test]
    fn malformed_frame_becomes_error_event() {
        let event = parse_inbound(r#"{"body":"no connection"}"#).unwrap_err();
        assert!(matches!(event, Event::Error { .. }));
    }
}

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{error::Result, notification::Notification, state::AppState, user::User};

/// WebSocket upgrade handler for the push channel of `user_id`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

/// Drives one push connection: Connecting -> Active -> Closed.
///
/// Registration happens only after the upgrade and the user check both
/// succeed, and every exit path converges on the single unregister below.
async fn handle_socket(mut socket: WebSocket, user_id: Uuid, state: AppState) {
    let lookup = state.user_repository.find_by_id(user_id).await;
    match &lookup {
        Ok(Some(_)) => {}
        Ok(None) => tracing::warn!("Rejecting push channel for unknown user {}", user_id),
        Err(e) => tracing::error!("User lookup failed during push handshake: {:?}", e),
    }
    if let Some(frame) = handshake_rejection(&lookup) {
        let _ = socket.send(Message::Close(Some(frame))).await;
        return;
    }

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();

    let handle = state.registry.register(user_id, tx);

    // Forward queued notifications onto the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            match serde_json::to_string(&notification) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!("Failed to serialize notification: {}", e),
            }
        }
    });

    // The receive loop exists only to detect disconnect; inbound payloads
    // carry no meaning on this channel.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(user_id, handle);
    tracing::info!("Push channel closed for user {}", user_id);
}

/// Close frame for a failed handshake: POLICY for an unknown user, ERROR
/// for a lookup failure. `None` means the connection may register.
fn handshake_rejection(lookup: &Result<Option<User>>) -> Option<CloseFrame<'static>> {
    match lookup {
        Ok(Some(_)) => None,
        Ok(None) => Some(CloseFrame {
            code: close_code::POLICY,
            reason: "unknown user".into(),
        }),
        Err(_) => Some(CloseFrame {
            code: close_code::ERROR,
            reason: "internal error".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::user::Role;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "x".to_string(),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_known_user_passes_handshake() {
        assert!(handshake_rejection(&Ok(Some(user()))).is_none());
    }

    #[test]
    fn test_unknown_user_gets_policy_close() {
        let frame = handshake_rejection(&Ok(None)).unwrap();
        assert_eq!(frame.code, close_code::POLICY);
    }

    #[test]
    fn test_lookup_failure_gets_error_close() {
        let frame = handshake_rejection(&Err(AppError::Database(sqlx::Error::PoolClosed))).unwrap();
        assert_eq!(frame.code, close_code::ERROR);
    }
}

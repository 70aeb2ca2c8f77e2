//! WebSocket upgrade handler for realtime pairing and chat connections.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Wait for `identify`, bind the connection to the user's channel
//! 3. Process `join_room`, typing and `post_message` events
//! 4. Forward channel and room broadcasts until disconnect
//! 5. Clean up channel and room memberships

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Extension,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::application::chat::PostMessageHandler;
use crate::domain::chat::ChatError;
use crate::domain::foundation::{AuthenticatedUser, PairingId, UserId};
use crate::ports::PairingStore;

use super::{
    channels::{ChannelRegistry, ConnectionId},
    messages::{ClientEvent, RoomEvent, ServerEvent},
    rooms::RoomRegistry,
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WsState {
    pub channels: Arc<ChannelRegistry>,
    pub rooms: Arc<RoomRegistry>,
    pub pairings: Arc<dyn PairingStore>,
    pub post_message: Arc<PostMessageHandler>,
}

impl WsState {
    pub fn new(
        channels: Arc<ChannelRegistry>,
        rooms: Arc<RoomRegistry>,
        pairings: Arc<dyn PairingStore>,
        post_message: Arc<PostMessageHandler>,
    ) -> Self {
        Self {
            channels,
            rooms,
            pairings,
            post_message,
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /api/matches/live`
///
/// When the upgrade request carried a valid Bearer token, the auth
/// middleware has placed the session identity in the extensions and the
/// `identify` event must claim that same user.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    session: Option<Extension<AuthenticatedUser>>,
    State(state): State<WsState>,
) -> Response {
    let session = session.map(|Extension(user)| user.id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, session))
}

/// Per-connection bookkeeping for the receive loop.
struct Connection {
    id: ConnectionId,
    user: Option<UserId>,
    /// Authenticated identity from the upgrade request, if any.
    session: Option<UserId>,
    joined: HashSet<PairingId>,
    forwarders: Vec<JoinHandle<()>>,
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. A single writer task owns the
/// sink; channel and room forwarders feed it through an mpsc queue so
/// events from different broadcast receivers interleave without tearing
/// frames. Per-source FIFO order is preserved because each forwarder
/// drains its own receiver in order.
async fn handle_socket(socket: WebSocket, state: WsState, session: Option<UserId>) {
    let (mut sink, mut stream) = socket.split();

    let (out_tx, mut out_rx) = mpsc::channel::<ServerEvent>(64);

    let writer = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("failed to serialize server event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut conn = Connection {
        id: ConnectionId::new(),
        user: None,
        session,
        joined: HashSet::new(),
        forwarders: Vec::new(),
    };

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let event = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(connection_id = %conn.id, "unparseable client event: {}", e);
                        let _ = out_tx
                            .send(error_event("bad_event", "could not parse event"))
                            .await;
                        continue;
                    }
                };
                if handle_client_event(event, &mut conn, &state, &out_tx).await.is_err() {
                    break; // writer gone, client disconnected
                }
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %conn.id, "client sent close frame");
                break;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!(connection_id = %conn.id, "received unsupported binary message");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Protocol frames, handled by axum.
            }
            Err(e) => {
                tracing::debug!(connection_id = %conn.id, "receive error: {}", e);
                break;
            }
        }
    }

    teardown(conn, &state).await;
    drop(out_tx);
    writer.abort();
}

/// Release everything this connection holds in the registries.
///
/// The forwarders own the broadcast receivers, so they must be fully
/// stopped before the leave calls run; otherwise the registries still see
/// a live receiver and keep the channel/room entry forever. Awaiting the
/// aborted handle guarantees the task, and with it the receiver, is gone.
async fn teardown(conn: Connection, state: &WsState) {
    for task in conn.forwarders {
        task.abort();
        let _ = task.await;
    }

    state.channels.leave(&conn.id).await;
    state.rooms.leave_all(&conn.id).await;
}

/// Drain a user channel into the connection's outbound queue.
///
/// A lagged receiver means this client fell behind the channel buffer;
/// the skipped events are lost per the best-effort contract, but the
/// connection keeps receiving everything after the gap.
async fn forward_channel_events(
    mut rx: broadcast::Receiver<ServerEvent>,
    tx: mpsc::Sender<ServerEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "channel receiver lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Drain a room into the connection's outbound queue, dropping echoes of
/// this connection's own typing events. Lag handling as for channels.
async fn forward_room_events(
    mut rx: broadcast::Receiver<RoomEvent>,
    own_id: ConnectionId,
    tx: mpsc::Sender<ServerEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(room_event) => {
                if room_event.origin == Some(own_id) {
                    continue;
                }
                if tx.send(room_event.event).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "room receiver lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Dispatch one parsed client event.
///
/// Returns `Err` only when the outbound queue is closed, which means the
/// writer task has stopped and the connection is dead.
async fn handle_client_event(
    event: ClientEvent,
    conn: &mut Connection,
    state: &WsState,
    out_tx: &mpsc::Sender<ServerEvent>,
) -> Result<(), ()> {
    if let ClientEvent::Identify { user_id } = event {
        if conn.user.is_some() {
            out_tx
                .send(error_event("already_identified", "connection already bound"))
                .await
                .map_err(drop)?;
            return Ok(());
        }

        // An authenticated upgrade pins the identity; the claim must match.
        if let Some(session) = conn.session {
            if session != user_id {
                tracing::warn!(connection_id = %conn.id, claimed = %user_id, %session, "identify claim does not match session identity");
                out_tx
                    .send(error_event(
                        "identity_mismatch",
                        "identify must use the authenticated identity",
                    ))
                    .await
                    .map_err(drop)?;
                return Ok(());
            }
        }

        let channel_rx = state.channels.identify(user_id, conn.id).await;
        conn.user = Some(user_id);

        let tx = out_tx.clone();
        conn.forwarders
            .push(tokio::spawn(forward_channel_events(channel_rx, tx)));

        tracing::debug!(connection_id = %conn.id, %user_id, "connection identified");
        return out_tx.send(ServerEvent::Ready).await.map_err(drop);
    }

    // Everything else requires an identified connection.
    let Some(user) = conn.user else {
        out_tx
            .send(error_event("not_identified", "identify first"))
            .await
            .map_err(drop)?;
        return Ok(());
    };

    match event {
        ClientEvent::Identify { .. } => {} // handled above

        ClientEvent::JoinRoom { pairing_id } => {
            let authorized = match state.pairings.find(&pairing_id).await {
                Ok(Some(pairing)) => pairing.has_member(&user),
                Ok(None) => false,
                Err(e) => {
                    tracing::error!(%pairing_id, "pairing lookup failed: {}", e);
                    out_tx
                        .send(error_event("join_failed", "could not verify membership"))
                        .await
                        .map_err(drop)?;
                    return Ok(());
                }
            };

            if !authorized {
                tracing::warn!(%pairing_id, %user, "denied join for non-member");
                out_tx
                    .send(error_event("join_denied", "not a member of this pairing"))
                    .await
                    .map_err(drop)?;
                return Ok(());
            }

            if !conn.joined.insert(pairing_id) {
                return Ok(()); // already joined, nothing to do
            }

            let room_rx = state.rooms.join(pairing_id, conn.id).await;
            conn.forwarders.push(tokio::spawn(forward_room_events(
                room_rx,
                conn.id,
                out_tx.clone(),
            )));
        }

        ClientEvent::TypingStart { pairing_id } => {
            relay_typing(conn, state, pairing_id, ServerEvent::TypingStart { pairing_id }).await;
        }

        ClientEvent::TypingStop { pairing_id } => {
            relay_typing(conn, state, pairing_id, ServerEvent::TypingStop { pairing_id }).await;
        }

        ClientEvent::PostMessage {
            pairing_id,
            content,
        } => {
            // The handler broadcasts to the room on success, so nothing
            // to send here; the author's forwarder picks the event up.
            if let Err(e) = state.post_message.handle(pairing_id, user, content).await {
                out_tx
                    .send(error_event(chat_error_code(&e), &e.to_string()))
                    .await
                    .map_err(drop)?;
            }
        }
    }

    Ok(())
}

/// Relay a typing indicator into a room this connection has joined.
///
/// Indicators from rooms the connection never joined are dropped
/// silently; typing is best-effort and not worth an error frame.
async fn relay_typing(conn: &Connection, state: &WsState, pairing_id: PairingId, event: ServerEvent) {
    if !conn.joined.contains(&pairing_id) {
        tracing::debug!(connection_id = %conn.id, %pairing_id, "typing event for unjoined room dropped");
        return;
    }
    state
        .rooms
        .broadcast(&pairing_id, RoomEvent::from_connection(conn.id, event))
        .await;
}

fn error_event(code: &str, message: &str) -> ServerEvent {
    ServerEvent::Error {
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn chat_error_code(err: &ChatError) -> &'static str {
    match err {
        ChatError::PairingNotFound(_) => "pairing_not_found",
        ChatError::NotAMember => "not_a_member",
        ChatError::EmptyContent => "empty_content",
        ChatError::Store(_) => "store_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryMessageStore, InMemoryPairingStore};
    use crate::adapters::websocket::WsNotifier;
    use crate::domain::foundation::Timestamp;
    use crate::domain::matching::{PairKey, Pairing};

    fn test_state() -> WsState {
        let channels = Arc::new(ChannelRegistry::with_default_capacity());
        let rooms = Arc::new(RoomRegistry::with_default_capacity());
        let pairings = Arc::new(InMemoryPairingStore::new());
        let notifier = Arc::new(WsNotifier::new(channels.clone(), rooms.clone()));
        let post_message = Arc::new(PostMessageHandler::new(
            pairings.clone(),
            Arc::new(InMemoryMessageStore::new()),
            notifier,
        ));
        WsState::new(channels, rooms, pairings, post_message)
    }

    fn connection() -> Connection {
        Connection {
            id: ConnectionId::new(),
            user: None,
            session: None,
            joined: HashSet::new(),
            forwarders: Vec::new(),
        }
    }

    async fn seeded_pairing(state: &WsState, member: UserId) -> Pairing {
        let key = PairKey::new(member, UserId::new()).unwrap();
        let pairing = Pairing::new(PairingId::new(), key, Timestamp::now());
        state
            .pairings
            .insert_if_absent(pairing.clone())
            .await
            .unwrap();
        pairing
    }

    #[tokio::test]
    async fn events_before_identify_are_rejected() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut conn = connection();

        let pairing_id = PairingId::new();
        handle_client_event(
            ClientEvent::TypingStart { pairing_id },
            &mut conn,
            &state,
            &tx,
        )
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, "not_identified"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn identify_binds_and_acks_ready() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut conn = connection();

        let user = UserId::new();
        handle_client_event(ClientEvent::Identify { user_id: user }, &mut conn, &state, &tx)
            .await
            .unwrap();

        assert!(matches!(rx.recv().await.unwrap(), ServerEvent::Ready));
        assert_eq!(conn.user, Some(user));
        assert_eq!(state.channels.connection_count(&user).await, 1);

        teardown(conn, &state).await;
    }

    #[tokio::test]
    async fn identify_must_match_the_session_identity() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut conn = connection();
        conn.session = Some(UserId::new());

        handle_client_event(
            ClientEvent::Identify {
                user_id: UserId::new(),
            },
            &mut conn,
            &state,
            &tx,
        )
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, "identity_mismatch"),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(conn.user, None);
        assert_eq!(state.channels.total_connections().await, 0);
    }

    #[tokio::test]
    async fn identify_accepts_the_session_identity() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut conn = connection();
        let user = UserId::new();
        conn.session = Some(user);

        handle_client_event(ClientEvent::Identify { user_id: user }, &mut conn, &state, &tx)
            .await
            .unwrap();

        assert!(matches!(rx.recv().await.unwrap(), ServerEvent::Ready));
        assert_eq!(conn.user, Some(user));

        teardown(conn, &state).await;
    }

    #[tokio::test]
    async fn join_room_denied_for_non_member() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);
        let mut conn = connection();
        conn.user = Some(UserId::new());

        let pairing_id = PairingId::new();
        handle_client_event(
            ClientEvent::JoinRoom { pairing_id },
            &mut conn,
            &state,
            &tx,
        )
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, "join_denied"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(conn.joined.is_empty());
    }

    #[tokio::test]
    async fn join_room_admits_a_member() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(8);

        let a = UserId::new();
        let pairing = seeded_pairing(&state, a).await;

        let mut conn = connection();
        conn.user = Some(a);

        handle_client_event(
            ClientEvent::JoinRoom {
                pairing_id: pairing.id,
            },
            &mut conn,
            &state,
            &tx,
        )
        .await
        .unwrap();

        assert!(conn.joined.contains(&pairing.id));
        assert_eq!(state.rooms.member_count(&pairing.id).await, 1);

        // Typing from another connection reaches this one.
        state
            .rooms
            .broadcast(
                &pairing.id,
                RoomEvent::from_connection(
                    ConnectionId::new(),
                    ServerEvent::TypingStart {
                        pairing_id: pairing.id,
                    },
                ),
            )
            .await;
        assert!(matches!(
            rx.recv().await.unwrap(),
            ServerEvent::TypingStart { .. }
        ));

        teardown(conn, &state).await;
    }

    #[tokio::test]
    async fn teardown_reclaims_channel_and_room_entries() {
        let state = test_state();
        let (tx, mut _rx) = mpsc::channel(32);
        let mut conn = connection();

        let user = UserId::new();
        let pairing = seeded_pairing(&state, user).await;

        handle_client_event(ClientEvent::Identify { user_id: user }, &mut conn, &state, &tx)
            .await
            .unwrap();
        handle_client_event(
            ClientEvent::JoinRoom {
                pairing_id: pairing.id,
            },
            &mut conn,
            &state,
            &tx,
        )
        .await
        .unwrap();

        assert_eq!(state.channels.channel_count().await, 1);
        assert_eq!(state.rooms.room_count().await, 1);

        // Disconnect must leave nothing behind, even though the
        // forwarders hold the broadcast receivers.
        teardown(conn, &state).await;

        assert_eq!(state.channels.channel_count().await, 0);
        assert_eq!(state.channels.total_connections().await, 0);
        assert_eq!(state.rooms.room_count().await, 0);
    }

    #[tokio::test]
    async fn lagged_channel_forwarder_keeps_forwarding() {
        let (event_tx, event_rx) = broadcast::channel::<ServerEvent>(2);
        let (out_tx, mut out_rx) = mpsc::channel(16);

        // Overflow the buffer before the forwarder gets to run, so its
        // first recv observes the lag.
        for _ in 0..5 {
            event_tx.send(ServerEvent::Ready).unwrap();
        }

        let forwarder = tokio::spawn(forward_channel_events(event_rx, out_tx));

        event_tx
            .send(ServerEvent::Interest {
                from_name: "Alice".to_string(),
            })
            .unwrap();
        drop(event_tx); // closes the channel so the forwarder ends

        forwarder.await.unwrap();

        let mut received = Vec::new();
        while let Some(event) = out_rx.recv().await {
            received.push(event);
        }
        assert!(
            received
                .iter()
                .any(|e| matches!(e, ServerEvent::Interest { .. })),
            "forwarder stopped at the lag instead of continuing"
        );
    }

    #[tokio::test]
    async fn lagged_room_forwarder_keeps_forwarding() {
        let (event_tx, event_rx) = broadcast::channel::<RoomEvent>(2);
        let (out_tx, mut out_rx) = mpsc::channel(16);
        let pairing_id = PairingId::new();

        for _ in 0..5 {
            event_tx
                .send(RoomEvent::to_everyone(ServerEvent::TypingStart { pairing_id }))
                .unwrap();
        }

        let forwarder = tokio::spawn(forward_room_events(
            event_rx,
            ConnectionId::new(),
            out_tx,
        ));

        event_tx
            .send(RoomEvent::to_everyone(ServerEvent::TypingStop { pairing_id }))
            .unwrap();
        drop(event_tx);

        forwarder.await.unwrap();

        let mut received = Vec::new();
        while let Some(event) = out_rx.recv().await {
            received.push(event);
        }
        assert!(
            received
                .iter()
                .any(|e| matches!(e, ServerEvent::TypingStop { .. })),
            "forwarder stopped at the lag instead of continuing"
        );
    }
}

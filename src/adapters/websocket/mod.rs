//! Realtime fan-out over WebSocket.
//!
//! Two independent membership relations, both process-local and ephemeral:
//!
//! - **Channel**: `UserId` → live connections, bound by the `identify`
//!   handshake. Pairing and interest notifications address channels, so a
//!   user with three devices gets three copies.
//! - **Room**: `PairingId` → live connections currently viewing that
//!   pairing's chat, joined explicitly and guarded by a membership check.
//!
//! Delivery is best-effort at-most-once; a disconnected client resyncs
//! through the HTTP snapshot endpoints on reconnect.

mod channels;
mod handler;
mod messages;
mod notifier;
mod rooms;

pub use channels::{ChannelRegistry, ConnectionId};
pub use handler::{ws_handler, WsState};
pub use messages::{ClientEvent, MessagePayload, RoomEvent, ServerEvent};
pub use notifier::WsNotifier;
pub use rooms::RoomRegistry;

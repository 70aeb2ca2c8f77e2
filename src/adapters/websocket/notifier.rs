//! Notifier port implementation over the channel and room registries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{PairingId, UserId};
use crate::ports::{CounterpartInfo, Notifier};

use super::channels::ChannelRegistry;
use super::messages::{MessagePayload, RoomEvent, ServerEvent};
use super::rooms::RoomRegistry;

/// Routes engine notifications onto live WebSocket connections.
///
/// Pairing and interest events address channels; posted messages address
/// rooms. All sends are fire-and-forget per the port contract.
#[derive(Clone)]
pub struct WsNotifier {
    channels: Arc<ChannelRegistry>,
    rooms: Arc<RoomRegistry>,
}

impl WsNotifier {
    pub fn new(channels: Arc<ChannelRegistry>, rooms: Arc<RoomRegistry>) -> Self {
        Self { channels, rooms }
    }
}

#[async_trait]
impl Notifier for WsNotifier {
    async fn paired(&self, pairing_id: PairingId, member: UserId, counterpart: CounterpartInfo) {
        self.channels
            .send(
                &member,
                ServerEvent::Paired {
                    pairing_id,
                    counterpart,
                },
            )
            .await;
    }

    async fn interest(&self, target: UserId, from_name: String) {
        self.channels
            .send(&target, ServerEvent::Interest { from_name })
            .await;
    }

    async fn message_posted(&self, pairing_id: PairingId, message: &ChatMessage) {
        self.rooms
            .broadcast(
                &pairing_id,
                RoomEvent::to_everyone(ServerEvent::MessagePosted {
                    pairing_id,
                    message: MessagePayload::from(message),
                }),
            )
            .await;
    }
}

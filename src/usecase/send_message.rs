//! UseCase: direct message routing.
//!
//! One inbound message becomes exactly one persisted record and one or two
//! group deliveries: always the sender's routing group, plus the receiver's
//! when the receiver is a different party. Nothing is delivered if the
//! receiver does not resolve or persistence fails.

use std::sync::Arc;

use crate::{
    domain::{
        ChannelLayer, Message, MessageBody, MessageRepository, RoutingKey, UserId, UserRepository,
    },
    infrastructure::dto::websocket::{EventType, IncomingMessage, MessageDto, MessageEvent},
};

use super::error::SendMessageError;

/// Message routing use case.
pub struct SendMessageUseCase {
    /// Identity collaborator (receiver resolution)
    users: Arc<dyn UserRepository>,
    /// Storage collaborator (message persistence)
    messages: Arc<dyn MessageRepository>,
    /// Transport collaborator (group broadcast)
    channel: Arc<dyn ChannelLayer>,
}

impl SendMessageUseCase {
    /// Create a new SendMessageUseCase.
    pub fn new(
        users: Arc<dyn UserRepository>,
        messages: Arc<dyn MessageRepository>,
        channel: Arc<dyn ChannelLayer>,
    ) -> Self {
        Self {
            users,
            messages,
            channel,
        }
    }

    /// Route one inbound message.
    ///
    /// # Arguments
    ///
    /// * `sender_id` - The authenticated sender, attached by the session
    /// * `payload` - The raw inbound message payload
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - The persisted message, already fanned out
    /// * `Err(SendMessageError)` - Routing failed; nothing was delivered
    pub async fn execute(
        &self,
        sender_id: UserId,
        payload: IncomingMessage,
    ) -> Result<Message, SendMessageError> {
        // 1. Resolve the receiver before any persistence or fanout.
        let receiver_id = UserId::new(payload.receiver_id)
            .map_err(|_| SendMessageError::ReceiverNotFound(payload.receiver_id))?;
        let receiver = self.users.resolve_user(receiver_id).await?;

        // 2. Validate the body.
        let body = MessageBody::new(payload.text)?;

        // 3. Persist exactly once.
        let message = self
            .messages
            .create_message(sender_id, receiver.id, body)
            .await
            .map_err(|e| SendMessageError::Storage(e.to_string()))?;

        // 4. Fan the persisted representation out to the sender's group and,
        //    for a distinct receiver, the receiver's group.
        let event = MessageEvent {
            r#type: EventType::Message,
            message: MessageDto::from(&message),
        };
        let frame = serde_json::to_string(&event).unwrap();

        self.channel
            .group_send(&RoutingKey::for_user(sender_id), frame.clone())
            .await;
        if receiver.id != sender_id {
            self.channel
                .group_send(&RoutingKey::for_user(receiver.id), frame)
                .await;
        }

        Ok(message)
    }
}

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::embeds::{MessageEdit, MessageTemplate};
use crate::events::InteractionRef;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("gateway request failed: {0}")]
    Request(String),
    #[error("gateway rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Outbound calls against the chat platform.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn respond(
        &self,
        interaction: &InteractionRef,
        message: &MessageTemplate,
    ) -> Result<(), ClientError>;

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        edit: &MessageEdit,
    ) -> Result<(), ClientError>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), ClientError>;
}

#[derive(Default)]
pub struct NoopGatewayClient;

#[async_trait]
impl GatewayClient for NoopGatewayClient {
    async fn respond(
        &self,
        _interaction: &InteractionRef,
        _message: &MessageTemplate,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    async fn edit_message(
        &self,
        _channel_id: &str,
        _message_id: &str,
        _edit: &MessageEdit,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    async fn delete_message(&self, _channel_id: &str, _message_id: &str) -> Result<(), ClientError> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundAction {
    Respond { interaction_id: String, message: MessageTemplate },
    Edit { channel_id: String, message_id: String, edit: MessageEdit },
    Delete { channel_id: String, message_id: String },
}

/// Keeps every outbound call in order instead of sending it.
#[derive(Default)]
pub struct RecordingGatewayClient {
    actions: Mutex<Vec<OutboundAction>>,
    fail_edits: bool,
}

impl RecordingGatewayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records edits but reports them as rejected.
    pub fn rejecting_edits() -> Self {
        Self { fail_edits: true, ..Self::default() }
    }

    pub async fn actions(&self) -> Vec<OutboundAction> {
        self.actions.lock().await.clone()
    }

    pub async fn edits(&self) -> Vec<MessageEdit> {
        self.actions
            .lock()
            .await
            .iter()
            .filter_map(|action| match action {
                OutboundAction::Edit { edit, .. } => Some(edit.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn responses(&self) -> Vec<MessageTemplate> {
        self.actions
            .lock()
            .await
            .iter()
            .filter_map(|action| match action {
                OutboundAction::Respond { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GatewayClient for RecordingGatewayClient {
    async fn respond(
        &self,
        interaction: &InteractionRef,
        message: &MessageTemplate,
    ) -> Result<(), ClientError> {
        self.actions.lock().await.push(OutboundAction::Respond {
            interaction_id: interaction.id.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        edit: &MessageEdit,
    ) -> Result<(), ClientError> {
        self.actions.lock().await.push(OutboundAction::Edit {
            channel_id: channel_id.to_owned(),
            message_id: message_id.to_owned(),
            edit: edit.clone(),
        });
        if self.fail_edits {
            return Err(ClientError::Rejected { status: 403, message: "missing access".to_owned() });
        }
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), ClientError> {
        self.actions.lock().await.push(OutboundAction::Delete {
            channel_id: channel_id.to_owned(),
            message_id: message_id.to_owned(),
        });
        Ok(())
    }
}

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::client::{GatewayClient, NoopGatewayClient};
use crate::events::{
    default_dispatcher, EventContext, EventDispatcher, GatewayEnvelope, GatewayEvent,
    HandlerResult,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport ack failed: {0}")]
    Acknowledge(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 1_u64 << attempt.min(16);
        Duration::from_millis(self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms))
    }
}

/// Inbound side of the gateway connection.
///
/// `acknowledge` is the deferred-update ack; the platform expects it before any
/// work on the interaction starts.
#[async_trait]
pub trait SocketTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_envelope(&self) -> Result<Option<GatewayEnvelope>, TransportError>;
    async fn acknowledge(&self, envelope_id: &str) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

#[derive(Default)]
pub struct NoopSocketTransport;

#[async_trait]
impl SocketTransport for NoopSocketTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_envelope(&self) -> Result<Option<GatewayEnvelope>, TransportError> {
        Ok(None)
    }

    async fn acknowledge(&self, _envelope_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Pumps envelopes from the transport, one task per envelope.
pub struct GatewayRunner {
    transport: Arc<dyn SocketTransport>,
    dispatcher: Arc<EventDispatcher>,
    client: Arc<dyn GatewayClient>,
    reconnect_policy: ReconnectPolicy,
}

impl Default for GatewayRunner {
    fn default() -> Self {
        Self {
            transport: Arc::new(NoopSocketTransport),
            dispatcher: Arc::new(default_dispatcher()),
            client: Arc::new(NoopGatewayClient),
            reconnect_policy: ReconnectPolicy::default(),
        }
    }
}

impl GatewayRunner {
    pub fn new(
        transport: Arc<dyn SocketTransport>,
        dispatcher: EventDispatcher,
        client: Arc<dyn GatewayClient>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, dispatcher: Arc::new(dispatcher), client, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "gateway transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "gateway retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening gateway transport connection");
        self.transport.connect().await?;
        info!(attempt, "gateway transport connected");

        let mut in_flight = JoinSet::new();
        let pumped = self.pump(attempt, &mut in_flight).await;

        let pending = in_flight.len();
        if pending > 0 {
            info!(attempt, pending, "draining in-flight interactions");
        }
        while let Some(joined) = in_flight.join_next().await {
            log_join_result(joined);
        }

        pumped?;
        self.transport.disconnect().await
    }

    async fn pump(&self, attempt: u32, in_flight: &mut JoinSet<()>) -> Result<(), TransportError> {
        loop {
            while let Some(joined) = in_flight.try_join_next() {
                log_join_result(joined);
            }

            let Some(envelope) = self.transport.next_envelope().await? else {
                info!(attempt, "gateway transport stream closed");
                return Ok(());
            };
            let (event_id, user) = correlation_fields(&envelope);

            info!(
                event_name = "ingress.gateway.envelope_received",
                envelope_id = %envelope.envelope_id,
                event_type = ?envelope.event.event_type(),
                correlation_id = %envelope.envelope_id,
                event_id = event_id.unwrap_or("unknown"),
                user = user.unwrap_or("unknown"),
                "received gateway envelope"
            );

            if let Err(error) = self.transport.acknowledge(&envelope.envelope_id).await {
                warn!(
                    event_name = "ingress.gateway.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    error = %error,
                    "failed to acknowledge gateway envelope"
                );
            } else {
                debug!(
                    event_name = "ingress.gateway.ack_sent",
                    envelope_id = %envelope.envelope_id,
                    correlation_id = %envelope.envelope_id,
                    "acknowledged gateway envelope"
                );
            }

            in_flight.spawn(handle_envelope(
                Arc::clone(&self.dispatcher),
                Arc::clone(&self.client),
                envelope,
            ));
        }
    }
}

async fn handle_envelope(
    dispatcher: Arc<EventDispatcher>,
    client: Arc<dyn GatewayClient>,
    envelope: GatewayEnvelope,
) {
    let context = EventContext { correlation_id: envelope.envelope_id.clone() };

    match dispatcher.dispatch(&envelope, &context).await {
        Ok(HandlerResult::Responded(message)) => {
            let Some(interaction) = envelope.event.interaction() else {
                return;
            };
            if let Err(error) = client.respond(interaction, &message).await {
                warn!(
                    event_name = "egress.gateway.respond_failed",
                    correlation_id = %context.correlation_id,
                    error = %error,
                    "failed to send interaction response"
                );
            }
        }
        Ok(result) => {
            debug!(
                correlation_id = %context.correlation_id,
                processed = matches!(result, HandlerResult::Processed),
                "gateway envelope handled"
            );
        }
        Err(error) => {
            debug!(
                correlation_id = %context.correlation_id,
                error = %error,
                "event dispatch aborted; continuing gateway loop"
            );
        }
    }
}

fn log_join_result(joined: Result<(), JoinError>) {
    if let Err(error) = joined {
        warn!(error = %error, "interaction task did not complete");
    }
}

fn correlation_fields(envelope: &GatewayEnvelope) -> (Option<&str>, Option<&str>) {
    match &envelope.event {
        GatewayEvent::ComponentPress(press) => {
            (Some(press.message.id.as_str()), Some(press.user.username.as_str()))
        }
        GatewayEvent::SlashCommand(payload) => (None, Some(payload.user.username.as_str())),
        GatewayEvent::Unsupported { .. } => (None, None),
    }
}

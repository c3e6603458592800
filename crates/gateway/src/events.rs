use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    commands::{
        parse_slash_command, CommandParseError, CommandRouteError, CommandRouter,
        EventCommandService, NoopEventCommandService, SlashCommand, SlashCommandPayload,
    },
    components::{ComponentAction, ComponentError, ComponentRouter, ComponentService, NoopComponentService},
    embeds::{Embed, MessageTemplate},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayEnvelope {
    pub envelope_id: String,
    pub event: GatewayEvent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayEvent {
    SlashCommand(SlashCommandPayload),
    ComponentPress(ComponentPressEvent),
    Unsupported { event_type: String },
}

impl GatewayEvent {
    pub fn event_type(&self) -> GatewayEventType {
        match self {
            Self::SlashCommand(_) => GatewayEventType::SlashCommand,
            Self::ComponentPress(_) => GatewayEventType::ComponentPress,
            Self::Unsupported { .. } => GatewayEventType::Unsupported,
        }
    }

    /// The interaction a reply would be sent against, if this event has one.
    pub fn interaction(&self) -> Option<&InteractionRef> {
        match self {
            Self::SlashCommand(payload) => Some(&payload.interaction),
            Self::ComponentPress(press) => Some(&press.interaction),
            Self::Unsupported { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    SlashCommand,
    ComponentPress,
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

/// The message a component was attached to, as the gateway delivered it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageSnapshot {
    pub id: String,
    pub channel_id: String,
    pub embeds: Vec<Embed>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentPressEvent {
    pub interaction: InteractionRef,
    pub custom_id: String,
    pub user: UserRef,
    pub message: MessageSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(MessageTemplate),
    Processed,
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventHandlerError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error(transparent)]
    Route(#[from] CommandRouteError),
    #[error(transparent)]
    Component(#[from] ComponentError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventHandlerError),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> GatewayEventType;
    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<GatewayEventType, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(handler.event_type(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, DispatchError> {
        let Some(handler) = self.handlers.get(&envelope.event.event_type()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(envelope, ctx).await.map_err(DispatchError::from)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

pub fn default_dispatcher() -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(SlashCommandHandler::new(NoopEventCommandService));
    dispatcher.register(ComponentHandler::new(NoopComponentService));
    dispatcher
}

pub struct SlashCommandHandler<S> {
    router: CommandRouter<S>,
}

impl<S> SlashCommandHandler<S>
where
    S: EventCommandService,
{
    pub fn new(service: S) -> Self {
        Self { router: CommandRouter::new(service) }
    }
}

#[async_trait]
impl<S> EventHandler for SlashCommandHandler<S>
where
    S: EventCommandService + 'static,
{
    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::SlashCommand
    }

    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let GatewayEvent::SlashCommand(payload) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };

        let command = parse_slash_command(payload)?;
        if let SlashCommand::Unknown { .. } = command {
            return Ok(HandlerResult::Ignored);
        }

        Ok(match self.router.route(command, payload, ctx).await? {
            Some(message) => HandlerResult::Responded(message),
            None => HandlerResult::Processed,
        })
    }
}

pub struct ComponentHandler<S> {
    router: ComponentRouter<S>,
}

impl<S> ComponentHandler<S>
where
    S: ComponentService,
{
    pub fn new(service: S) -> Self {
        Self { router: ComponentRouter::new(service) }
    }
}

#[async_trait]
impl<S> EventHandler for ComponentHandler<S>
where
    S: ComponentService + 'static,
{
    fn event_type(&self) -> GatewayEventType {
        GatewayEventType::ComponentPress
    }

    async fn handle(
        &self,
        envelope: &GatewayEnvelope,
        ctx: &EventContext,
    ) -> Result<HandlerResult, EventHandlerError> {
        let GatewayEvent::ComponentPress(press) = &envelope.event else {
            return Ok(HandlerResult::Ignored);
        };
        let Some(action) = ComponentAction::from_custom_id(&press.custom_id) else {
            return Ok(HandlerResult::Ignored);
        };

        self.router.route(action, press, ctx).await?;
        Ok(HandlerResult::Processed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use jimbo_core::attendance::RsvpChoice;
    use tokio::sync::Mutex;

    use super::{
        default_dispatcher, ComponentHandler, ComponentPressEvent, EventContext, EventDispatcher,
        GatewayEnvelope, GatewayEvent, HandlerResult, InteractionRef, MessageSnapshot, UserRef,
    };
    use crate::commands::{CommandOption, OptionValue, SlashCommandPayload};
    use crate::components::{ComponentError, ComponentService};

    fn user() -> UserRef {
        UserRef { id: "U1".to_owned(), username: "alice".to_owned() }
    }

    fn interaction(id: &str) -> InteractionRef {
        InteractionRef { id: id.to_owned(), token: format!("token-{id}") }
    }

    fn slash(command: &str, options: Vec<CommandOption>) -> GatewayEnvelope {
        GatewayEnvelope {
            envelope_id: "env-1".to_owned(),
            event: GatewayEvent::SlashCommand(SlashCommandPayload {
                interaction: interaction("i-1"),
                command: command.to_owned(),
                options,
                channel_id: "C1".to_owned(),
                user: user(),
            }),
        }
    }

    fn press(custom_id: &str) -> GatewayEnvelope {
        GatewayEnvelope {
            envelope_id: "env-2".to_owned(),
            event: GatewayEvent::ComponentPress(ComponentPressEvent {
                interaction: interaction("i-2"),
                custom_id: custom_id.to_owned(),
                user: user(),
                message: MessageSnapshot {
                    id: "M1".to_owned(),
                    channel_id: "C1".to_owned(),
                    embeds: Vec::new(),
                },
            }),
        }
    }

    #[derive(Default)]
    struct RecordingComponents {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ComponentService for Arc<RecordingComponents> {
        async fn confirm(
            &self,
            press: &ComponentPressEvent,
            _ctx: &EventContext,
        ) -> Result<(), ComponentError> {
            self.calls.lock().await.push(format!("confirm:{}", press.message.id));
            Ok(())
        }

        async fn unconfirm(
            &self,
            press: &ComponentPressEvent,
            _ctx: &EventContext,
        ) -> Result<(), ComponentError> {
            self.calls.lock().await.push(format!("unconfirm:{}", press.message.id));
            Ok(())
        }

        async fn rsvp(
            &self,
            press: &ComponentPressEvent,
            choice: RsvpChoice,
            _ctx: &EventContext,
        ) -> Result<(), ComponentError> {
            self.calls.lock().await.push(format!("{}:{}", choice.label(), press.user.username));
            Ok(())
        }
    }

    #[test]
    fn default_dispatcher_registers_handlers() {
        assert_eq!(default_dispatcher().handler_count(), 2);
    }

    #[tokio::test]
    async fn dispatcher_routes_slash_commands() {
        let envelope = slash("vibecheck", Vec::new());

        let result =
            default_dispatcher().dispatch(&envelope, &EventContext::default()).await.expect("dispatch");

        assert!(matches!(result, HandlerResult::Responded(ref message) if message.ephemeral));
    }

    #[tokio::test]
    async fn unknown_commands_and_subcommands_are_ignored() {
        let dispatcher = default_dispatcher();

        let unknown = slash("karaoke", Vec::new());
        let result = dispatcher.dispatch(&unknown, &EventContext::default()).await.expect("dispatch");
        assert_eq!(result, HandlerResult::Ignored);

        let unknown_sub = slash(
            "event",
            vec![CommandOption {
                name: "cancel".to_owned(),
                value: OptionValue::SubCommand(Vec::new()),
            }],
        );
        let result =
            dispatcher.dispatch(&unknown_sub, &EventContext::default()).await.expect("dispatch");
        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn dispatcher_returns_ignored_when_no_handler_registered() {
        let result = EventDispatcher::new()
            .dispatch(&press("going"), &EventContext::default())
            .await
            .expect("dispatch");

        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn unsupported_events_are_ignored() {
        let envelope = GatewayEnvelope {
            envelope_id: "env-3".to_owned(),
            event: GatewayEvent::Unsupported { event_type: "TYPING_START".to_owned() },
        };

        let result =
            default_dispatcher().dispatch(&envelope, &EventContext::default()).await.expect("dispatch");
        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn component_presses_route_by_custom_id() {
        let service = Arc::new(RecordingComponents::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(ComponentHandler::new(service.clone()));
        let ctx = EventContext::default();

        for custom_id in ["confirm", "unconfirm", "going", "flaking"] {
            let result = dispatcher.dispatch(&press(custom_id), &ctx).await.expect("dispatch");
            assert_eq!(result, HandlerResult::Processed);
        }

        assert_eq!(
            *service.calls.lock().await,
            vec!["confirm:M1", "unconfirm:M1", "going:alice", "flaking:alice"]
        );
    }

    #[tokio::test]
    async fn unknown_custom_ids_never_reach_the_service() {
        let service = Arc::new(RecordingComponents::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(ComponentHandler::new(service.clone()));

        let result =
            dispatcher.dispatch(&press("maybe"), &EventContext::default()).await.expect("dispatch");

        assert_eq!(result, HandlerResult::Ignored);
        assert!(service.calls.lock().await.is_empty());
    }

    #[test]
    fn interaction_is_exposed_for_replyable_events() {
        assert_eq!(slash("event", Vec::new()).event.interaction(), Some(&interaction("i-1")));
        assert_eq!(press("going").event.interaction(), Some(&interaction("i-2")));
        assert_eq!(GatewayEvent::Unsupported { event_type: "x".to_owned() }.interaction(), None);
    }
}

use async_trait::async_trait;
use thiserror::Error;

use crate::embeds::{self, MessageTemplate};
use crate::events::{EventContext, InteractionRef, UserRef};

pub const EVENT_COMMAND: &str = "event";
pub const EVENT_CREATE_SUBCOMMAND: &str = "create";
pub const VIBE_CHECK_COMMAND: &str = "vibecheck";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommandPayload {
    pub interaction: InteractionRef,
    pub command: String,
    pub options: Vec<CommandOption>,
    pub channel_id: String,
    pub user: UserRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    User(UserRef),
    SubCommand(Vec<CommandOption>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlashCommand {
    EventCreate { title: String, description: String, date: String },
    VibeCheck { target: Option<UserRef> },
    Unknown { name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("`/{command}` is missing required option `{option}`")]
    MissingOption { command: String, option: String },
    #[error("`/{command}` option `{option}` has the wrong type")]
    InvalidOption { command: String, option: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandRouteError {
    #[error("command service failed: {0}")]
    Service(String),
}

/// Reads the command tree delivered by the gateway. Anything this bot does not
/// register, including unknown `/event` subcommands, becomes `Unknown`.
pub fn parse_slash_command(
    payload: &SlashCommandPayload,
) -> Result<SlashCommand, CommandParseError> {
    match payload.command.as_str() {
        EVENT_COMMAND => parse_event_command(&payload.options),
        VIBE_CHECK_COMMAND => {
            let target = match payload.options.first() {
                None => None,
                Some(CommandOption { value: OptionValue::User(user), .. }) => Some(user.clone()),
                Some(option) => {
                    return Err(CommandParseError::InvalidOption {
                        command: VIBE_CHECK_COMMAND.to_owned(),
                        option: option.name.clone(),
                    })
                }
            };
            Ok(SlashCommand::VibeCheck { target })
        }
        other => Ok(SlashCommand::Unknown { name: other.to_owned() }),
    }
}

fn parse_event_command(options: &[CommandOption]) -> Result<SlashCommand, CommandParseError> {
    let Some(CommandOption { name, value: OptionValue::SubCommand(sub_options) }) = options.first()
    else {
        return Ok(SlashCommand::Unknown { name: EVENT_COMMAND.to_owned() });
    };
    if name != EVENT_CREATE_SUBCOMMAND {
        return Ok(SlashCommand::Unknown { name: format!("{EVENT_COMMAND} {name}") });
    }

    let command = format!("{EVENT_COMMAND} {EVENT_CREATE_SUBCOMMAND}");
    Ok(SlashCommand::EventCreate {
        title: string_option(&command, sub_options, "title")?,
        description: string_option(&command, sub_options, "description")?,
        date: string_option(&command, sub_options, "date")?,
    })
}

fn string_option(
    command: &str,
    options: &[CommandOption],
    name: &str,
) -> Result<String, CommandParseError> {
    match options.iter().find(|option| option.name == name).map(|option| &option.value) {
        Some(OptionValue::String(value)) => Ok(value.clone()),
        Some(_) => Err(CommandParseError::InvalidOption {
            command: command.to_owned(),
            option: name.to_owned(),
        }),
        None => Err(CommandParseError::MissingOption {
            command: command.to_owned(),
            option: name.to_owned(),
        }),
    }
}

pub struct CommandRouter<S> {
    service: S,
}

impl<S> CommandRouter<S>
where
    S: EventCommandService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// `None` means the command is not one this bot answers.
    pub async fn route(
        &self,
        command: SlashCommand,
        payload: &SlashCommandPayload,
        ctx: &EventContext,
    ) -> Result<Option<MessageTemplate>, CommandRouteError> {
        match command {
            SlashCommand::EventCreate { title, description, date } => {
                self.service.create_event(title, description, date, payload, ctx).await.map(Some)
            }
            SlashCommand::VibeCheck { target } => {
                self.service.vibe_check(target, payload, ctx).await.map(Some)
            }
            SlashCommand::Unknown { .. } => Ok(None),
        }
    }
}

#[async_trait]
pub trait EventCommandService: Send + Sync {
    async fn create_event(
        &self,
        title: String,
        description: String,
        date: String,
        payload: &SlashCommandPayload,
        ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError>;

    async fn vibe_check(
        &self,
        target: Option<UserRef>,
        payload: &SlashCommandPayload,
        ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError>;
}

pub struct NoopEventCommandService;

#[async_trait]
impl EventCommandService for NoopEventCommandService {
    async fn create_event(
        &self,
        title: String,
        _description: String,
        _date: String,
        _payload: &SlashCommandPayload,
        _ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::ephemeral_notice(format!(
            "Event `{title}` was received, but no event store is connected."
        )))
    }

    async fn vibe_check(
        &self,
        _target: Option<UserRef>,
        _payload: &SlashCommandPayload,
        _ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError> {
        Ok(embeds::ephemeral_notice("The vibe die is not connected."))
    }
}

use async_trait::async_trait;
use jimbo_core::attendance::RsvpChoice;
use jimbo_core::errors::{ApplicationError, DomainError};
use thiserror::Error;

use crate::events::{ComponentPressEvent, EventContext};

/// Buttons this bot renders, keyed by their custom id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentAction {
    Confirm,
    Unconfirm,
    Going,
    Flaking,
}

impl ComponentAction {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            "confirm" => Some(Self::Confirm),
            "unconfirm" => Some(Self::Unconfirm),
            "going" => Some(Self::Going),
            "flaking" => Some(Self::Flaking),
            _ => None,
        }
    }

    pub fn custom_id(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Unconfirm => "unconfirm",
            Self::Going => "going",
            Self::Flaking => "flaking",
        }
    }

    pub fn rsvp_choice(self) -> Option<RsvpChoice> {
        match self {
            Self::Going => Some(RsvpChoice::Going),
            Self::Flaking => Some(RsvpChoice::Flaking),
            Self::Confirm | Self::Unconfirm => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("pressed message is unusable: {0}")]
    Details(#[from] DomainError),
    #[error("event `{0}` is not stored")]
    UnknownEvent(String),
    #[error("event store failed: {0}")]
    Store(String),
    #[error("gateway call failed: {0}")]
    Gateway(String),
}

impl From<ApplicationError> for ComponentError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::Details(error),
            ApplicationError::NotFound(id) => Self::UnknownEvent(id.0),
            ApplicationError::DuplicateEvent(id) => {
                Self::Store(format!("event `{id}` already exists"))
            }
            ApplicationError::Persistence(message) => Self::Store(message),
            ApplicationError::Integration(message) => Self::Gateway(message),
        }
    }
}

#[async_trait]
pub trait ComponentService: Send + Sync {
    async fn confirm(
        &self,
        press: &ComponentPressEvent,
        ctx: &EventContext,
    ) -> Result<(), ComponentError>;

    async fn unconfirm(
        &self,
        press: &ComponentPressEvent,
        ctx: &EventContext,
    ) -> Result<(), ComponentError>;

    async fn rsvp(
        &self,
        press: &ComponentPressEvent,
        choice: RsvpChoice,
        ctx: &EventContext,
    ) -> Result<(), ComponentError>;
}

pub struct ComponentRouter<S> {
    service: S,
}

impl<S> ComponentRouter<S>
where
    S: ComponentService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn route(
        &self,
        action: ComponentAction,
        press: &ComponentPressEvent,
        ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        match action {
            ComponentAction::Confirm => self.service.confirm(press, ctx).await,
            ComponentAction::Unconfirm => self.service.unconfirm(press, ctx).await,
            ComponentAction::Going => self.service.rsvp(press, RsvpChoice::Going, ctx).await,
            ComponentAction::Flaking => self.service.rsvp(press, RsvpChoice::Flaking, ctx).await,
        }
    }
}

pub struct NoopComponentService;

#[async_trait]
impl ComponentService for NoopComponentService {
    async fn confirm(
        &self,
        _press: &ComponentPressEvent,
        _ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        Ok(())
    }

    async fn unconfirm(
        &self,
        _press: &ComponentPressEvent,
        _ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        Ok(())
    }

    async fn rsvp(
        &self,
        _press: &ComponentPressEvent,
        _choice: RsvpChoice,
        _ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        Ok(())
    }
}

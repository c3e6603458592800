use jimbo_core::domain::event::EventDetails;
use jimbo_core::errors::DomainError;
use jimbo_core::schedule::{format_display, parse_display};
use serde::Serialize;

use crate::components::ComponentAction;
use crate::events::MessageSnapshot;

pub const EVENT_HEADER: &str = ":star: **NEW EVENT** :star:";
pub const TIME_FIELD: &str = "Time";
pub const ATTENDEES_TITLE: &str = "Attendees";
pub const GOING_FIELD: &str = "Going";
pub const FLAKING_FIELD: &str = "Flaking";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Success,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
}

impl ButtonElement {
    pub fn new(action: ComponentAction, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self { custom_id: action.custom_id().to_owned(), label: label.into(), style }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    pub components: Vec<ButtonElement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|field| field.name == name).map(|field| field.value.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
    pub ephemeral: bool,
}

/// In-place update of a displayed message. `None` leaves that part untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MessageEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
}

#[derive(Default)]
pub struct MessageBuilder {
    content: Option<String>,
    embeds: Vec<Embed>,
    components: Vec<ActionRow>,
    ephemeral: bool,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed<F>(mut self, title: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut EmbedBuilder),
    {
        let mut builder = EmbedBuilder { embed: Embed { title: title.into(), ..Embed::default() } };
        build(&mut builder);
        self.embeds.push(builder.embed);
        self
    }

    pub fn actions<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut ActionsBuilder),
    {
        let mut builder = ActionsBuilder::default();
        build(&mut builder);
        self.components.push(ActionRow { components: builder.elements });
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate {
            content: self.content,
            embeds: self.embeds,
            components: self.components,
            ephemeral: self.ephemeral,
        }
    }
}

pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.embed.description = description.into();
        self
    }

    pub fn field(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.embed.fields.push(EmbedField { name: name.into(), value: value.into() });
        self
    }
}

#[derive(Default)]
pub struct ActionsBuilder {
    elements: Vec<ButtonElement>,
}

impl ActionsBuilder {
    pub fn button(&mut self, button: ButtonElement) -> &mut Self {
        self.elements.push(button);
        self
    }
}

pub fn event_embed(details: &EventDetails) -> Embed {
    Embed {
        title: details.title.clone(),
        description: details.description.clone(),
        fields: vec![EmbedField {
            name: TIME_FIELD.to_owned(),
            value: format_display(details.scheduled_at),
        }],
    }
}

/// `None` when nobody has answered; otherwise only the non-empty lists appear.
pub fn attendees_embed(going: &[String], flaking: &[String]) -> Option<Embed> {
    if going.is_empty() && flaking.is_empty() {
        return None;
    }

    let mut fields = Vec::with_capacity(2);
    if !going.is_empty() {
        fields.push(EmbedField { name: GOING_FIELD.to_owned(), value: going.join(", ") });
    }
    if !flaking.is_empty() {
        fields.push(EmbedField { name: FLAKING_FIELD.to_owned(), value: flaking.join(", ") });
    }

    Some(Embed { title: ATTENDEES_TITLE.to_owned(), description: String::new(), fields })
}

pub fn event_draft_message(details: &EventDetails) -> MessageTemplate {
    let mut message = MessageBuilder::new()
        .content(EVENT_HEADER)
        .actions(|actions| {
            actions
                .button(ButtonElement::new(
                    ComponentAction::Confirm,
                    "Confirm Event",
                    ButtonStyle::Success,
                ))
                .button(ButtonElement::new(
                    ComponentAction::Unconfirm,
                    "Delete",
                    ButtonStyle::Danger,
                ));
        })
        .build();
    message.embeds.push(event_embed(details));
    message
}

pub fn rsvp_controls() -> Vec<ActionRow> {
    vec![ActionRow {
        components: vec![
            ButtonElement::new(ComponentAction::Going, "I'm going", ButtonStyle::Success),
            ButtonElement::new(ComponentAction::Flaking, "I'm FLAKING", ButtonStyle::Danger),
        ],
    }]
}

pub fn confirmed_edit() -> MessageEdit {
    MessageEdit { components: Some(rsvp_controls()), ..MessageEdit::default() }
}

pub fn attendance_edit(details: &EventDetails, going: &[String], flaking: &[String]) -> MessageEdit {
    let mut embeds = vec![event_embed(details)];
    embeds.extend(attendees_embed(going, flaking));
    MessageEdit { embeds: Some(embeds), ..MessageEdit::default() }
}

pub fn ephemeral_notice(text: impl Into<String>) -> MessageTemplate {
    MessageBuilder::new().content(text).ephemeral().build()
}

/// Reads the event back out of the embed it was rendered into.
pub fn event_details_from_message(message: &MessageSnapshot) -> Result<EventDetails, DomainError> {
    event_details_from_embeds(&message.embeds)
}

pub fn event_details_from_embeds(embeds: &[Embed]) -> Result<EventDetails, DomainError> {
    let embed = embeds
        .first()
        .ok_or_else(|| DomainError::MissingEventDetails("message has no embeds".to_owned()))?;
    let time = embed.field(TIME_FIELD).ok_or_else(|| {
        DomainError::MissingEventDetails(format!("embed has no `{TIME_FIELD}` field"))
    })?;
    let scheduled_at = parse_display(time)?;

    EventDetails::new(embed.title.clone(), embed.description.clone(), scheduled_at)
}

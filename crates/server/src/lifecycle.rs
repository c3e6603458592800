//! Event lifecycle: draft, confirm, delete and RSVP.
//!
//! Store writes always land before the message is re-rendered, and RSVPs for the
//! same event run one at a time under [`EventLocks`].

use std::sync::Arc;

use async_trait::async_trait;
use jimbo_core::{
    attendance::{reconcile, RsvpChoice},
    domain::event::{Event, EventDetails, EventId},
    errors::{ApplicationError, DomainError, DATE_FORMAT_HINT},
    schedule::parse_event_input,
    vibe::{vibe_check_message, VibeSubject, VibeVerdict},
};
use jimbo_db::EventRepository;
use jimbo_gateway::{
    client::GatewayClient,
    commands::{CommandRouteError, EventCommandService, SlashCommandPayload},
    components::{ComponentError, ComponentService},
    embeds::{
        attendance_edit, confirmed_edit, ephemeral_notice, event_details_from_message,
        event_draft_message, MessageTemplate,
    },
    events::{ComponentPressEvent, EventContext, UserRef},
};
use rand::rngs::OsRng;
use tracing::{debug, error, info, warn};

use crate::locks::EventLocks;

#[derive(Clone)]
pub struct EventLifecycleService {
    repository: Arc<dyn EventRepository>,
    client: Arc<dyn GatewayClient>,
    locks: EventLocks,
}

impl EventLifecycleService {
    pub fn new(
        repository: Arc<dyn EventRepository>,
        client: Arc<dyn GatewayClient>,
        locks: EventLocks,
    ) -> Self {
        Self { repository, client, locks }
    }

    async fn confirm_event(
        &self,
        id: &EventId,
        press: &ComponentPressEvent,
    ) -> Result<(), ApplicationError> {
        let details = event_details_from_message(&press.message)?;
        let _guard = self.locks.acquire(id).await;

        self.repository.insert(Event::confirmed(id.clone(), details)).await?;
        self.client
            .edit_message(&press.message.channel_id, &press.message.id, &confirmed_edit())
            .await
            .map_err(|error| ApplicationError::Integration(error.to_string()))
    }

    async fn apply_rsvp(
        &self,
        id: &EventId,
        press: &ComponentPressEvent,
        choice: RsvpChoice,
    ) -> Result<bool, ApplicationError> {
        let details = event_details_from_message(&press.message)?;
        let _guard = self.locks.acquire(id).await;

        let going = self.repository.get_going(id).await?;
        let flaking = self.repository.get_flaking(id).await?;
        let outcome = reconcile(going, flaking, &press.user.username, choice);
        if !outcome.changed {
            return Ok(false);
        }

        // A move touches both lists and must land as one write.
        match outcome.removed_from {
            Some(_) => {
                self.repository.set_attendance(id, &outcome.going, &outcome.flaking).await?;
            }
            None => self.write_list(id, choice, outcome.list(choice)).await?,
        }

        let edit = attendance_edit(&details, &outcome.going, &outcome.flaking);
        self.client
            .edit_message(&press.message.channel_id, &press.message.id, &edit)
            .await
            .map_err(|error| ApplicationError::Integration(error.to_string()))?;
        Ok(true)
    }

    async fn write_list(
        &self,
        id: &EventId,
        choice: RsvpChoice,
        names: &[String],
    ) -> Result<(), ApplicationError> {
        match choice {
            RsvpChoice::Going => self.repository.set_going(id, names).await?,
            RsvpChoice::Flaking => self.repository.set_flaking(id, names).await?,
        }
        Ok(())
    }
}

fn draft_details(title: &str, description: &str, date: &str) -> Result<EventDetails, DomainError> {
    let scheduled_at = parse_event_input(date)?;
    EventDetails::new(title, description, scheduled_at)
}

/// Logs an aborted button press at the level its cause deserves.
fn report_abort(
    action: &'static str,
    id: &EventId,
    press: &ComponentPressEvent,
    ctx: &EventContext,
    failure: ApplicationError,
) -> ComponentError {
    match &failure {
        ApplicationError::NotFound(_) => warn!(
            event_name = "lifecycle.event.not_found",
            correlation_id = %ctx.correlation_id,
            event_id = %id,
            user = %press.user.username,
            action,
            "button pressed on an event that is not stored"
        ),
        ApplicationError::Domain(_) => warn!(
            event_name = "lifecycle.event.unreadable",
            correlation_id = %ctx.correlation_id,
            event_id = %id,
            action,
            error = %failure,
            "pressed message does not carry event details"
        ),
        _ => error!(
            event_name = "lifecycle.event.aborted",
            correlation_id = %ctx.correlation_id,
            event_id = %id,
            user = %press.user.username,
            action,
            error = %failure,
            "event update aborted"
        ),
    }

    ComponentError::from(failure)
}

#[async_trait]
impl EventCommandService for EventLifecycleService {
    async fn create_event(
        &self,
        title: String,
        description: String,
        date: String,
        payload: &SlashCommandPayload,
        ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError> {
        match draft_details(&title, &description, &date) {
            Ok(details) => {
                info!(
                    event_name = "lifecycle.event.drafted",
                    correlation_id = %ctx.correlation_id,
                    user = %payload.user.username,
                    title = %details.title,
                    "event draft rendered"
                );
                Ok(event_draft_message(&details))
            }
            Err(rejected) => {
                let rejected = ApplicationError::from(rejected);
                debug!(
                    correlation_id = %ctx.correlation_id,
                    user = %payload.user.username,
                    error = %rejected,
                    "event create rejected"
                );
                Ok(ephemeral_notice(rejected.user_message().unwrap_or(DATE_FORMAT_HINT)))
            }
        }
    }

    async fn vibe_check(
        &self,
        target: Option<UserRef>,
        payload: &SlashCommandPayload,
        _ctx: &EventContext,
    ) -> Result<MessageTemplate, CommandRouteError> {
        let verdict = VibeVerdict::roll(&mut OsRng);
        let subject = match &target {
            Some(user) => VibeSubject::Named(&user.username),
            None => VibeSubject::Mention(&payload.user.id),
        };

        Ok(ephemeral_notice(vibe_check_message(subject, verdict)))
    }
}

#[async_trait]
impl ComponentService for EventLifecycleService {
    async fn confirm(
        &self,
        press: &ComponentPressEvent,
        ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        let id = EventId(press.message.id.clone());
        self.confirm_event(&id, press)
            .await
            .map_err(|failure| report_abort("confirm", &id, press, ctx, failure))?;

        info!(
            event_name = "lifecycle.event.confirmed",
            correlation_id = %ctx.correlation_id,
            event_id = %id,
            user = %press.user.username,
            "event confirmed"
        );
        Ok(())
    }

    async fn unconfirm(
        &self,
        press: &ComponentPressEvent,
        ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        self.client
            .delete_message(&press.message.channel_id, &press.message.id)
            .await
            .map_err(|failure| {
                let id = EventId(press.message.id.clone());
                report_abort(
                    "unconfirm",
                    &id,
                    press,
                    ctx,
                    ApplicationError::Integration(failure.to_string()),
                )
            })?;

        info!(
            event_name = "lifecycle.event.discarded",
            correlation_id = %ctx.correlation_id,
            event_id = %press.message.id,
            user = %press.user.username,
            "event draft deleted"
        );
        Ok(())
    }

    async fn rsvp(
        &self,
        press: &ComponentPressEvent,
        choice: RsvpChoice,
        ctx: &EventContext,
    ) -> Result<(), ComponentError> {
        let id = EventId(press.message.id.clone());
        let changed = self
            .apply_rsvp(&id, press, choice)
            .await
            .map_err(|failure| report_abort(choice.label(), &id, press, ctx, failure))?;

        info!(
            event_name = "lifecycle.event.rsvp",
            correlation_id = %ctx.correlation_id,
            event_id = %id,
            user = %press.user.username,
            choice = choice.label(),
            changed,
            "rsvp recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jimbo_core::attendance::RsvpChoice;
    use jimbo_core::domain::event::{Event, EventDetails, EventId};
    use jimbo_core::errors::{DATE_FORMAT_HINT, EMPTY_TITLE_HINT};
    use jimbo_core::schedule::parse_event_input;
    use async_trait::async_trait;
    use jimbo_db::{
        connect_with_settings, migrations, EventRepository, InMemoryEventRepository,
        RepositoryError, SqlEventRepository,
    };
    use jimbo_gateway::client::{OutboundAction, RecordingGatewayClient};
    use jimbo_gateway::commands::{EventCommandService, SlashCommandPayload};
    use jimbo_gateway::components::{ComponentError, ComponentService};
    use jimbo_gateway::embeds::{event_draft_message, rsvp_controls, EVENT_HEADER};
    use jimbo_gateway::events::{
        ComponentPressEvent, EventContext, InteractionRef, MessageSnapshot, UserRef,
    };

    use super::EventLifecycleService;
    use crate::locks::EventLocks;

    struct Harness {
        repository: Arc<InMemoryEventRepository>,
        client: Arc<RecordingGatewayClient>,
        service: EventLifecycleService,
    }

    fn harness_with(client: RecordingGatewayClient) -> Harness {
        let repository = Arc::new(InMemoryEventRepository::default());
        let client = Arc::new(client);
        let service =
            EventLifecycleService::new(repository.clone(), client.clone(), EventLocks::new());
        Harness { repository, client, service }
    }

    fn harness() -> Harness {
        harness_with(RecordingGatewayClient::new())
    }

    fn user(username: &str) -> UserRef {
        UserRef { id: format!("id-{username}"), username: username.to_owned() }
    }

    fn details() -> EventDetails {
        let at = parse_event_input("07/04/26 19:30").expect("valid date");
        EventDetails::new("Fireworks", "roof deck", at).expect("valid details")
    }

    fn press(username: &str, custom_id: &str) -> ComponentPressEvent {
        ComponentPressEvent {
            interaction: InteractionRef { id: format!("i-{username}"), token: "t".to_owned() },
            custom_id: custom_id.to_owned(),
            user: user(username),
            message: MessageSnapshot {
                id: "M1".to_owned(),
                channel_id: "C1".to_owned(),
                embeds: event_draft_message(&details()).embeds,
            },
        }
    }

    fn invocation(username: &str) -> SlashCommandPayload {
        SlashCommandPayload {
            interaction: InteractionRef { id: "i-1".to_owned(), token: "t".to_owned() },
            command: "event".to_owned(),
            options: Vec::new(),
            channel_id: "C1".to_owned(),
            user: user(username),
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    async fn confirmed(harness: &Harness) {
        harness
            .service
            .confirm(&press("alice", "confirm"), &EventContext::default())
            .await
            .expect("confirm");
    }

    #[tokio::test]
    async fn create_renders_a_draft_without_persisting() {
        let h = harness();

        let message = h
            .service
            .create_event(
                "Fireworks".to_owned(),
                "roof deck".to_owned(),
                "07/04/26 19:30".to_owned(),
                &invocation("alice"),
                &EventContext::default(),
            )
            .await
            .expect("create");

        assert_eq!(message.content.as_deref(), Some(EVENT_HEADER));
        assert!(!message.ephemeral);
        assert_eq!(message.embeds[0].field("Time"), Some("Sat 07/04/26 7:30 PM"));
        assert!(h.repository.is_empty().await);
    }

    #[tokio::test]
    async fn create_with_bad_date_or_title_replies_ephemerally() {
        let h = harness();
        let ctx = EventContext::default();

        for date in ["13/40/99 99:99", "7/4/26 19:30", ""] {
            let message = h
                .service
                .create_event(
                    "Fireworks".to_owned(),
                    String::new(),
                    date.to_owned(),
                    &invocation("alice"),
                    &ctx,
                )
                .await
                .expect("create");
            assert!(message.ephemeral);
            assert_eq!(message.content.as_deref(), Some(DATE_FORMAT_HINT));
        }

        let untitled = h
            .service
            .create_event(
                "   ".to_owned(),
                String::new(),
                "07/04/26 19:30".to_owned(),
                &invocation("alice"),
                &ctx,
            )
            .await
            .expect("create");
        assert!(untitled.ephemeral);
        assert_eq!(untitled.content.as_deref(), Some(EMPTY_TITLE_HINT));
        assert!(h.repository.is_empty().await);
    }

    #[tokio::test]
    async fn confirm_persists_then_swaps_buttons() {
        let h = harness();

        confirmed(&h).await;

        let stored = h.repository.find_by_id(&EventId::from("M1")).await.expect("stored");
        assert_eq!(stored.details(), details());
        assert!(stored.going.is_empty());
        assert!(stored.flaking.is_empty());

        let actions = h.client.actions().await;
        assert_eq!(
            actions,
            vec![OutboundAction::Edit {
                channel_id: "C1".to_owned(),
                message_id: "M1".to_owned(),
                edit: jimbo_gateway::embeds::MessageEdit {
                    components: Some(rsvp_controls()),
                    ..Default::default()
                },
            }]
        );
    }

    #[tokio::test]
    async fn second_confirm_fails_before_rendering() {
        let h = harness();
        confirmed(&h).await;

        let second =
            h.service.confirm(&press("bob", "confirm"), &EventContext::default()).await;

        assert!(matches!(second, Err(ComponentError::Store(_))));
        assert_eq!(h.client.edits().await.len(), 1);
        assert_eq!(h.repository.len().await, 1);
    }

    #[tokio::test]
    async fn confirm_needs_event_details_on_the_message() {
        let h = harness();
        let mut bare = press("alice", "confirm");
        bare.message.embeds.clear();

        let result = h.service.confirm(&bare, &EventContext::default()).await;

        assert!(matches!(result, Err(ComponentError::Details(_))));
        assert!(h.repository.is_empty().await);
        assert!(h.client.actions().await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_draft_without_touching_the_store() {
        let h = harness();

        h.service
            .unconfirm(&press("alice", "unconfirm"), &EventContext::default())
            .await
            .expect("unconfirm");

        assert_eq!(
            h.client.actions().await,
            vec![OutboundAction::Delete { channel_id: "C1".to_owned(), message_id: "M1".to_owned() }]
        );
        assert!(h.repository.is_empty().await);
    }

    #[tokio::test]
    async fn rsvp_moves_members_between_lists_and_rerenders() {
        let h = harness();
        let ctx = EventContext::default();
        let id = EventId::from("M1");
        confirmed(&h).await;

        h.service.rsvp(&press("alice", "going"), RsvpChoice::Going, &ctx).await.expect("going");
        h.service.rsvp(&press("bob", "going"), RsvpChoice::Going, &ctx).await.expect("going");
        assert_eq!(h.repository.get_going(&id).await.expect("going"), names(&["alice", "bob"]));

        h.service
            .rsvp(&press("alice", "flaking"), RsvpChoice::Flaking, &ctx)
            .await
            .expect("flaking");
        assert_eq!(h.repository.get_going(&id).await.expect("going"), names(&["bob"]));
        assert_eq!(h.repository.get_flaking(&id).await.expect("flaking"), names(&["alice"]));

        let edits = h.client.edits().await;
        assert_eq!(edits.len(), 4);
        let embeds = edits[3].embeds.clone().expect("embeds replaced");
        assert_eq!(embeds[0].title, "Fireworks");
        assert_eq!(embeds[1].field("Going"), Some("bob"));
        assert_eq!(embeds[1].field("Flaking"), Some("alice"));
    }

    #[tokio::test]
    async fn repeated_press_skips_write_and_render() {
        let h = harness();
        let ctx = EventContext::default();
        confirmed(&h).await;

        h.service.rsvp(&press("alice", "going"), RsvpChoice::Going, &ctx).await.expect("first");
        h.service.rsvp(&press("alice", "going"), RsvpChoice::Going, &ctx).await.expect("repeat");

        assert_eq!(h.client.edits().await.len(), 2);
        assert_eq!(
            h.repository.get_going(&EventId::from("M1")).await.expect("going"),
            names(&["alice"])
        );
    }

    #[tokio::test]
    async fn rsvp_on_unknown_event_is_aborted() {
        let h = harness();

        let result = h
            .service
            .rsvp(&press("alice", "going"), RsvpChoice::Going, &EventContext::default())
            .await;

        assert_eq!(result, Err(ComponentError::UnknownEvent("M1".to_owned())));
        assert!(h.client.actions().await.is_empty());
    }

    #[tokio::test]
    async fn store_is_updated_even_when_render_fails() {
        let h = harness_with(RecordingGatewayClient::rejecting_edits());
        h.repository
            .insert(Event::confirmed(EventId::from("M1"), details()))
            .await
            .expect("seed event");

        let result = h
            .service
            .rsvp(&press("alice", "going"), RsvpChoice::Going, &EventContext::default())
            .await;

        assert!(matches!(result, Err(ComponentError::Gateway(_))));
        assert_eq!(
            h.repository.get_going(&EventId::from("M1")).await.expect("going"),
            names(&["alice"])
        );
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum StoreFault {
        Insert,
        Read,
        ListWrite,
        Attendance,
    }

    /// In-memory store where one kind of call always fails.
    struct FaultyRepository {
        inner: InMemoryEventRepository,
        fault: StoreFault,
    }

    impl FaultyRepository {
        fn check(&self, call: StoreFault) -> Result<(), RepositoryError> {
            if self.fault == call {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EventRepository for FaultyRepository {
        async fn insert(&self, event: Event) -> Result<(), RepositoryError> {
            self.check(StoreFault::Insert)?;
            self.inner.insert(event).await
        }

        async fn get_going(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
            self.check(StoreFault::Read)?;
            self.inner.get_going(id).await
        }

        async fn get_flaking(&self, id: &EventId) -> Result<Vec<String>, RepositoryError> {
            self.check(StoreFault::Read)?;
            self.inner.get_flaking(id).await
        }

        async fn set_going(&self, id: &EventId, going: &[String]) -> Result<(), RepositoryError> {
            self.check(StoreFault::ListWrite)?;
            self.inner.set_going(id, going).await
        }

        async fn set_flaking(
            &self,
            id: &EventId,
            flaking: &[String],
        ) -> Result<(), RepositoryError> {
            self.check(StoreFault::ListWrite)?;
            self.inner.set_flaking(id, flaking).await
        }

        async fn set_attendance(
            &self,
            id: &EventId,
            going: &[String],
            flaking: &[String],
        ) -> Result<(), RepositoryError> {
            self.check(StoreFault::Attendance)?;
            self.inner.set_attendance(id, going, flaking).await
        }
    }

    struct FaultyHarness {
        repository: Arc<FaultyRepository>,
        client: Arc<RecordingGatewayClient>,
        service: EventLifecycleService,
    }

    /// Seeds a confirmed `M1` with `flaking` already recorded.
    async fn faulty_harness(fault: StoreFault, flaking: &[&str]) -> FaultyHarness {
        let inner = InMemoryEventRepository::default();
        let id = EventId::from("M1");
        inner.insert(Event::confirmed(id.clone(), details())).await.expect("seed event");
        inner.set_flaking(&id, &names(flaking)).await.expect("seed flaking");

        let repository = Arc::new(FaultyRepository { inner, fault });
        let client = Arc::new(RecordingGatewayClient::new());
        let service =
            EventLifecycleService::new(repository.clone(), client.clone(), EventLocks::new());
        FaultyHarness { repository, client, service }
    }

    #[tokio::test]
    async fn failed_read_aborts_before_rendering() {
        let h = faulty_harness(StoreFault::Read, &[]).await;

        let result = h
            .service
            .rsvp(&press("alice", "going"), RsvpChoice::Going, &EventContext::default())
            .await;

        assert!(matches!(result, Err(ComponentError::Store(_))));
        assert!(h.client.actions().await.is_empty());
    }

    #[tokio::test]
    async fn failed_list_write_leaves_the_event_unchanged() {
        let h = faulty_harness(StoreFault::ListWrite, &[]).await;
        let id = EventId::from("M1");

        let result = h
            .service
            .rsvp(&press("bob", "going"), RsvpChoice::Going, &EventContext::default())
            .await;

        assert!(matches!(result, Err(ComponentError::Store(_))));
        assert!(h.client.actions().await.is_empty());
        assert!(h.repository.inner.get_going(&id).await.expect("going").is_empty());
        assert!(h.repository.inner.get_flaking(&id).await.expect("flaking").is_empty());
    }

    #[tokio::test]
    async fn switching_lists_is_a_single_write() {
        let h = faulty_harness(StoreFault::ListWrite, &["alice"]).await;
        let id = EventId::from("M1");

        h.service
            .rsvp(&press("alice", "going"), RsvpChoice::Going, &EventContext::default())
            .await
            .expect("switch to going");

        assert_eq!(h.repository.inner.get_going(&id).await.expect("going"), names(&["alice"]));
        assert!(h.repository.inner.get_flaking(&id).await.expect("flaking").is_empty());
        assert_eq!(h.client.edits().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_switch_keeps_member_in_one_list() {
        let h = faulty_harness(StoreFault::Attendance, &["alice"]).await;
        let id = EventId::from("M1");

        let result = h
            .service
            .rsvp(&press("alice", "going"), RsvpChoice::Going, &EventContext::default())
            .await;

        assert!(matches!(result, Err(ComponentError::Store(_))));
        assert!(h.repository.inner.get_going(&id).await.expect("going").is_empty());
        assert_eq!(h.repository.inner.get_flaking(&id).await.expect("flaking"), names(&["alice"]));
        assert!(h.client.actions().await.is_empty());
    }

    #[tokio::test]
    async fn confirm_aborts_when_the_insert_fails() {
        let inner = InMemoryEventRepository::default();
        let repository = Arc::new(FaultyRepository { inner, fault: StoreFault::Insert });
        let client = Arc::new(RecordingGatewayClient::new());
        let service =
            EventLifecycleService::new(repository.clone(), client.clone(), EventLocks::new());

        let result = service.confirm(&press("alice", "confirm"), &EventContext::default()).await;

        assert!(matches!(result, Err(ComponentError::Store(_))));
        assert!(client.actions().await.is_empty());
        assert!(repository.inner.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_rsvps_lose_no_updates() {
        let h = harness();
        confirmed(&h).await;

        let mut tasks = tokio::task::JoinSet::new();
        for index in 0..24 {
            let service = h.service.clone();
            let choice = if index % 3 == 0 { RsvpChoice::Flaking } else { RsvpChoice::Going };
            tasks.spawn(async move {
                let press = press(&format!("member-{index}"), choice.label());
                let ctx = EventContext::default();
                service.rsvp(&press, choice, &ctx).await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.expect("task").expect("rsvp");
        }

        let id = EventId::from("M1");
        let going = h.repository.get_going(&id).await.expect("going");
        let flaking = h.repository.get_flaking(&id).await.expect("flaking");
        assert_eq!(going.len(), 16);
        assert_eq!(flaking.len(), 8);
        assert!(going.iter().all(|member| !flaking.contains(member)));
    }

    #[tokio::test]
    async fn lifecycle_runs_against_sqlite() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repository = Arc::new(SqlEventRepository::new(pool));
        let client = Arc::new(RecordingGatewayClient::new());
        let service =
            EventLifecycleService::new(repository.clone(), client.clone(), EventLocks::new());
        let ctx = EventContext::default();

        service.confirm(&press("alice", "confirm"), &ctx).await.expect("confirm");
        service.rsvp(&press("alice", "going"), RsvpChoice::Going, &ctx).await.expect("going");
        service.rsvp(&press("alice", "flaking"), RsvpChoice::Flaking, &ctx).await.expect("flaking");

        let id = EventId::from("M1");
        assert!(repository.get_going(&id).await.expect("going").is_empty());
        assert_eq!(repository.get_flaking(&id).await.expect("flaking"), names(&["alice"]));

        let last = client.edits().await.pop().expect("rendered");
        let embeds = last.embeds.expect("embeds replaced");
        assert_eq!(embeds[1].field("Going"), None);
        assert_eq!(embeds[1].field("Flaking"), Some("alice"));
    }

    #[tokio::test]
    async fn vibe_check_is_ephemeral_and_names_the_subject() {
        let h = harness();
        let ctx = EventContext::default();

        let own = h.service.vibe_check(None, &invocation("alice"), &ctx).await.expect("vibe");
        assert!(own.ephemeral);
        let text = own.content.expect("text");
        assert!(text.starts_with("<@id-alice> has "));
        assert!(text.ends_with(":sunglasses:") || text.ends_with(":thumbsdown:"));

        let other =
            h.service.vibe_check(Some(user("bob")), &invocation("alice"), &ctx).await.expect("vibe");
        assert!(other.content.expect("text").starts_with("**bob** has "));
    }
}

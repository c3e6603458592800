pub mod attendance;
pub mod config;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod vibe;

pub use attendance::{reconcile, Reconciliation, RsvpChoice};
pub use domain::event::{Event, EventDetails, EventId};
pub use errors::{ApplicationError, DomainError};
pub use schedule::{format_display, parse_display, parse_event_input, ScheduleError};
pub use vibe::{vibe_check_message, VibeSubject, VibeVerdict};

use thiserror::Error;

use crate::{domain::event::EventId, schedule::ScheduleError};

pub const DATE_FORMAT_HINT: &str =
    "You formatted the date wrong. The format is \"MM/DD/YY HH:MM\" Try again.";
pub const EMPTY_TITLE_HINT: &str = "An event needs a title. Try again.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    InvalidSchedule(#[from] ScheduleError),
    #[error("event title must not be empty")]
    EmptyTitle,
    #[error("event message is missing details: {0}")]
    MissingEventDetails(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("event `{0}` was not found")]
    NotFound(EventId),
    #[error("event `{0}` already exists")]
    DuplicateEvent(EventId),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
}

impl ApplicationError {
    /// Text for the invoking member, for errors they caused and can fix.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Domain(DomainError::InvalidSchedule(_)) => Some(DATE_FORMAT_HINT),
            Self::Domain(DomainError::EmptyTitle) => Some(EMPTY_TITLE_HINT),
            _ => None,
        }
    }

    pub fn is_user_input(&self) -> bool {
        self.user_message().is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::event::EventId;
    use crate::errors::{ApplicationError, DomainError, DATE_FORMAT_HINT, EMPTY_TITLE_HINT};
    use crate::schedule::parse_event_input;

    #[test]
    fn bad_date_has_user_facing_hint() {
        let schedule_error = parse_event_input("13/40/99 99:99").expect_err("invalid date");
        let error = ApplicationError::from(DomainError::from(schedule_error));

        assert!(error.is_user_input());
        assert_eq!(error.user_message(), Some(DATE_FORMAT_HINT));
    }

    #[test]
    fn empty_title_has_user_facing_hint() {
        let error = ApplicationError::from(DomainError::EmptyTitle);
        assert_eq!(error.user_message(), Some(EMPTY_TITLE_HINT));
    }

    #[test]
    fn store_failures_stay_internal() {
        assert_eq!(ApplicationError::Persistence("disk full".to_owned()).user_message(), None);
        assert_eq!(ApplicationError::NotFound(EventId::from("m-1")).user_message(), None);
        assert!(!ApplicationError::Integration("edit failed".to_owned()).is_user_input());
    }

    #[test]
    fn missing_details_is_not_user_input() {
        let error =
            ApplicationError::from(DomainError::MissingEventDetails("no embed".to_owned()));
        assert!(!error.is_user_input());
        assert_eq!(error.to_string(), "event message is missing details: no embed");
    }
}

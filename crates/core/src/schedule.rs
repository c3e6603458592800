use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Every event time is entered and shown in this zone.
pub const EVENT_TIME_ZONE: Tz = chrono_tz::America::New_York;

/// `MM/DD/YY HH:MM`, as typed into `/event create`.
pub const INPUT_FORMAT: &str = "%m/%d/%y %H:%M";
pub const INPUT_LENGTH: usize = 14;

/// `Mon 01/02/06 3:04 PM`, as shown in the event embed.
pub const DISPLAY_FORMAT: &str = "%a %m/%d/%y %-I:%M %p";
const DISPLAY_PARSE_FORMAT: &str = "%a %m/%d/%y %I:%M %p";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("expected {expected} characters in `{input}`")]
    InvalidLength { input: String, expected: usize },
    #[error("could not parse `{input}`: {source}")]
    Unparseable { input: String, source: chrono::ParseError },
    #[error("`{input}` does not exist in {zone}")]
    NonexistentLocalTime { input: String, zone: Tz },
}

pub fn parse_event_input(input: &str) -> Result<DateTime<Utc>, ScheduleError> {
    if input.chars().count() != INPUT_LENGTH {
        return Err(ScheduleError::InvalidLength {
            input: input.to_owned(),
            expected: INPUT_LENGTH,
        });
    }

    parse_local(input, INPUT_FORMAT)
}

pub fn format_display(at: DateTime<Utc>) -> String {
    at.with_timezone(&EVENT_TIME_ZONE).format(DISPLAY_FORMAT).to_string()
}

pub fn parse_display(input: &str) -> Result<DateTime<Utc>, ScheduleError> {
    parse_local(input.trim(), DISPLAY_PARSE_FORMAT)
}

fn parse_local(input: &str, format: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let naive = NaiveDateTime::parse_from_str(input, format)
        .map_err(|source| ScheduleError::Unparseable { input: input.to_owned(), source })?;

    // During the autumn fall-back hour the wall clock repeats; take the first pass.
    match EVENT_TIME_ZONE.from_local_datetime(&naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
            Ok(local.with_timezone(&Utc))
        }
        LocalResult::None => Err(ScheduleError::NonexistentLocalTime {
            input: input.to_owned(),
            zone: EVENT_TIME_ZONE,
        }),
    }
}

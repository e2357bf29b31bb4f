//! Publish gate and status derivation.
//!
//! Publishing is only allowed once every required field is present. The
//! check is a pure function of the draft. Save never consults it, so
//! incomplete drafts can always be stored.

use crate::draft::{EventDraft, EventStatus, SessionPayload};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Derive the published status of an event from its date range.
///
/// A missing end date means a single-day event.
///
/// The dates carry no time zone and are compared against the UTC calendar
/// day of `now`. For an event far from UTC the status therefore changes up
/// to a day before or after the local midnight.
///
/// # Examples
///
/// ```
/// # use eventdesk_editor::publish::calculate_event_status;
/// # use eventdesk_editor::draft::EventStatus;
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let start = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap_or_default();
/// let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).single().unwrap_or_default();
/// assert_eq!(calculate_event_status(start, None, now), EventStatus::Upcoming);
/// ```
#[must_use]
pub fn calculate_event_status(
    start: NaiveDate,
    end: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> EventStatus {
    let today = now.date_naive();
    let end = end.unwrap_or(start);

    if today < start {
        EventStatus::Upcoming
    } else if today <= end {
        EventStatus::Active
    } else {
        EventStatus::Completed
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    /// Names of missing or invalid fields, in form order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Build a report from collected errors.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Publish-eligibility rules.
pub trait PublishValidator: Send + Sync {
    /// Check a draft against the rules.
    fn validate(&self, draft: &EventDraft) -> ValidationReport;
}

/// Default rules: every field the public registration page shows must be filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsValidator;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn time_range_ok(start: NaiveTime, end: NaiveTime) -> bool {
    end > start
}

impl RequiredFieldsValidator {
    fn check_session(session: &SessionPayload, errors: &mut Vec<String>) {
        let title = session.title.trim();
        if title.is_empty() {
            return;
        }
        let mut missing = |field: &str| errors.push(format!("Session \"{title}\": {field}"));

        if session.date.is_none() {
            missing("date");
        }
        match (session.start_time, session.end_time) {
            (Some(start), Some(end)) if !time_range_ok(start, end) => missing("time range"),
            (None, _) => missing("start time"),
            (_, None) => missing("end time"),
            _ => {},
        }
        if blank(&session.venue) {
            missing("venue");
        }
    }
}

impl PublishValidator for RequiredFieldsValidator {
    fn validate(&self, draft: &EventDraft) -> ValidationReport {
        let fields = &draft.fields;
        let mut errors = Vec::new();

        if blank(&fields.title) {
            errors.push("Title".to_string());
        }
        if blank(&fields.description) {
            errors.push("Description".to_string());
        }
        match (fields.start_date, fields.end_date) {
            (Some(start), Some(end)) if end < start => errors.push("Date range".to_string()),
            (Some(_), Some(_)) => {},
            _ => errors.push("Date range".to_string()),
        }
        match (fields.start_time, fields.end_time) {
            (Some(start), Some(end)) => {
                let single_day = fields.start_date.is_some() && fields.start_date == fields.end_date;
                if single_day && !time_range_ok(start, end) {
                    errors.push("Time range".to_string());
                }
            },
            _ => errors.push("Time range".to_string()),
        }
        if fields.registration_deadline.is_none() {
            errors.push("Registration deadline".to_string());
        }
        if blank(&fields.location) {
            errors.push("Location".to_string());
        }
        if fields.capacity.unwrap_or(0) == 0 {
            errors.push("Capacity".to_string());
        }
        if blank(&fields.organizer) {
            errors.push("Organizer".to_string());
        }
        if blank(&fields.contact_email) {
            errors.push("Contact email".to_string());
        }
        if blank(&fields.contact_phone) {
            errors.push("Contact phone".to_string());
        }
        if fields.price_cents.is_none() {
            errors.push("Price".to_string());
        }

        for session in &draft.sessions {
            Self::check_session(&session.payload, &mut errors);
        }

        ValidationReport::from_errors(errors)
    }
}

/// Verdict of the publish gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishDecision {
    /// The draft may be published.
    Ready,
    /// Publishing is refused until these fields are fixed.
    Blocked {
        /// Itemized missing fields for display
        missing_fields: Vec<String>,
    },
}

impl PublishDecision {
    /// Returns `true` for [`PublishDecision::Ready`].
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Checkpoint a draft must pass before a Publish reaches the backend.
#[derive(Debug, Clone, Default)]
pub struct PublishGate<V = RequiredFieldsValidator> {
    validator: V,
}

impl<V: PublishValidator> PublishGate<V> {
    /// Gate over the given rules.
    #[must_use]
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Decide whether `draft` may be published.
    #[must_use]
    pub fn can_publish(&self, draft: &EventDraft) -> PublishDecision {
        let report = self.validator.validate(draft);
        if report.is_valid {
            PublishDecision::Ready
        } else {
            PublishDecision::Blocked {
                missing_fields: report.errors,
            }
        }
    }
}

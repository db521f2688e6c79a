//! Normalized disclosure rows, one shape per category.
//!
//! All fields are origin-formatted strings; an empty string means the source
//! did not provide the value. Field declaration order is part of the contract
//! with downstream consumers and must not be reordered.

use serde::{Deserialize, Serialize};

/// A scheduled corporate event for a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCalendarRow {
    pub symbol: String,
    pub company: String,
    pub purpose: String,
    pub details: String,
    pub date: String,
}

/// A board meeting notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMeetingRow {
    pub symbol: String,
    pub company: String,
    pub purpose: String,
    pub details_link: String,
    pub meeting_date: String,
    pub attachment_link: String,
    pub broadcast_datetime: String,
}

/// A corporate action (dividend, split, bonus, book closure).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateActionRow {
    pub symbol: String,
    pub company: String,
    pub series: String,
    pub purpose: String,
    pub face_value: String,
    pub ex_date: String,
    pub record_date: String,
    pub book_closure_start: String,
    pub book_closure_end: String,
}

/// A corporate announcement filing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRow {
    pub symbol: String,
    pub company: String,
    pub subject: String,
    pub details: String,
    pub attachment_link: String,
    pub attachment_size: String,
    pub xbrl_link: String,
    pub broadcast_datetime: String,
}

/// Row list for any category, for callers that dispatch on
/// [`Category`](super::Category) at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Disclosures {
    EventCalendar(Vec<EventCalendarRow>),
    BoardMeetings(Vec<BoardMeetingRow>),
    CorporateActions(Vec<CorporateActionRow>),
    Announcements(Vec<AnnouncementRow>),
}

impl Disclosures {
    /// Number of rows regardless of category.
    pub fn len(&self) -> usize {
        match self {
            Disclosures::EventCalendar(rows) => rows.len(),
            Disclosures::BoardMeetings(rows) => rows.len(),
            Disclosures::CorporateActions(rows) => rows.len(),
            Disclosures::Announcements(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

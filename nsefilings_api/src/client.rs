//! JSON API fetchers for the four disclosure categories.

use serde_json::Value;

use crate::endpoints::{CORPORATE_ACTIONS_API_PATH, CORPORATE_FILING_API_PATH};
use crate::extract::pick;
use crate::keys;
use crate::types::{AnnouncementRow, BoardMeetingRow, CorporateActionRow, EventCalendarRow};
use crate::{Error, Session};

/// Client for the origin's corporate-filing JSON endpoints.
///
/// Construction primes a [`Session`] (browser headers, warm-up cookies); the
/// per-category methods then hit the JSON endpoints and map whatever record
/// shape the origin answers with into the canonical rows. An origin response
/// with no usable items is an empty `Ok`, not an error.
pub struct ApiClient {
    session: Session,
}

impl ApiClient {
    /// Connects to the production origin.
    pub async fn connect() -> Result<Self, Error> {
        Ok(Self {
            session: Session::prime().await?,
        })
    }

    /// Connects to a custom origin root. Used for testing with wiremock.
    pub async fn connect_to(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            session: Session::prime_with_base(base_url).await?,
        })
    }

    /// Wraps an already-primed session.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    /// The primed session, for callers that also need raw page fetches.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetches the event calendar for `symbol`.
    pub async fn event_calendar(&self, symbol: &str) -> Result<Vec<EventCalendarRow>, Error> {
        let items = self.filing_items(symbol, "Event Calendar").await?;
        Ok(items
            .iter()
            .map(|item| EventCalendarRow {
                symbol: pick(item, keys::SYMBOL, symbol),
                company: pick(item, keys::event_calendar::COMPANY, ""),
                purpose: pick(item, keys::event_calendar::PURPOSE, ""),
                details: pick(item, keys::event_calendar::DETAILS, ""),
                date: pick(item, keys::event_calendar::DATE, ""),
            })
            .collect())
    }

    /// Fetches board meetings for `symbol`.
    pub async fn board_meetings(&self, symbol: &str) -> Result<Vec<BoardMeetingRow>, Error> {
        let items = self.filing_items(symbol, "Board Meeting").await?;
        Ok(items
            .iter()
            .map(|item| BoardMeetingRow {
                symbol: pick(item, keys::SYMBOL, symbol),
                company: pick(item, keys::board_meeting::COMPANY, ""),
                purpose: pick(item, keys::board_meeting::PURPOSE, ""),
                details_link: pick(item, keys::board_meeting::DETAILS_LINK, ""),
                meeting_date: pick(item, keys::board_meeting::MEETING_DATE, ""),
                attachment_link: pick(item, keys::board_meeting::ATTACHMENT_LINK, ""),
                broadcast_datetime: pick(item, keys::board_meeting::BROADCAST_DATETIME, ""),
            })
            .collect())
    }

    /// Fetches corporate actions for `symbol`. This category has its own
    /// endpoint and takes no `type` parameter.
    pub async fn corporate_actions(&self, symbol: &str) -> Result<Vec<CorporateActionRow>, Error> {
        let payload = self
            .session
            .get_json(
                CORPORATE_ACTIONS_API_PATH,
                &[("index", "equities"), ("symbol", symbol)],
            )
            .await?;
        let items = item_collection(&payload);
        Ok(items
            .iter()
            .map(|item| CorporateActionRow {
                symbol: pick(item, keys::SYMBOL, symbol),
                company: pick(item, keys::corporate_action::COMPANY, ""),
                series: pick(item, keys::corporate_action::SERIES, ""),
                purpose: pick(item, keys::corporate_action::PURPOSE, ""),
                face_value: pick(item, keys::corporate_action::FACE_VALUE, ""),
                ex_date: pick(item, keys::corporate_action::EX_DATE, ""),
                record_date: pick(item, keys::corporate_action::RECORD_DATE, ""),
                book_closure_start: pick(item, keys::corporate_action::BOOK_CLOSURE_START, ""),
                book_closure_end: pick(item, keys::corporate_action::BOOK_CLOSURE_END, ""),
            })
            .collect())
    }

    /// Fetches announcements for `symbol`, probing the known `type` labels in
    /// order and returning the first that yields items. All labels coming up
    /// empty is a valid empty result, so the caller can move on to fallback.
    pub async fn announcements(&self, symbol: &str) -> Result<Vec<AnnouncementRow>, Error> {
        for label in keys::ANNOUNCEMENT_TYPE_LABELS {
            let items = self.filing_items(symbol, label).await?;
            if items.is_empty() {
                tracing::debug!("announcement type label {:?} yielded no items", label);
                continue;
            }
            return Ok(items
                .iter()
                .map(|item| AnnouncementRow {
                    symbol: pick(item, keys::SYMBOL, symbol),
                    company: pick(item, keys::announcement::COMPANY, ""),
                    subject: pick(item, keys::announcement::SUBJECT, ""),
                    details: pick(item, keys::announcement::DETAILS, ""),
                    attachment_link: pick(item, keys::announcement::ATTACHMENT_LINK, ""),
                    attachment_size: pick(item, keys::announcement::ATTACHMENT_SIZE, ""),
                    xbrl_link: pick(item, keys::announcement::XBRL_LINK, ""),
                    broadcast_datetime: pick(item, keys::announcement::BROADCAST_DATETIME, ""),
                })
                .collect());
        }
        Ok(Vec::new())
    }

    async fn filing_items(&self, symbol: &str, type_label: &str) -> Result<Vec<Value>, Error> {
        let payload = self
            .session
            .get_json(
                CORPORATE_FILING_API_PATH,
                &[("index", "equities"), ("symbol", symbol), ("type", type_label)],
            )
            .await?;
        Ok(item_collection(&payload))
    }
}

/// Selects the record collection out of a payload: the first non-null of a
/// `data` field, a `rows` field, or the payload itself. Anything that is not
/// an array at that point counts as "no items".
fn item_collection(payload: &Value) -> Vec<Value> {
    let chosen = if !payload["data"].is_null() {
        &payload["data"]
    } else if !payload["rows"].is_null() {
        &payload["rows"]
    } else {
        payload
    };
    chosen.as_array().cloned().unwrap_or_default()
}

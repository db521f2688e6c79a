//! Origin URLs for the NSE corporate-filings platform.
//!
//! Paths are kept separate from the base so tests can point a client at a
//! mock origin. The page paths serve the JS-rendered listing pages; the two
//! API paths serve JSON when the origin is willing.

/// Production origin root. Warm-up requests and the referer header use this.
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

/// Event calendar listing page.
pub const EVENT_CALENDAR_PATH: &str = "/companies-listing/corporate-filings-event-calendar";
/// Board meetings listing page.
pub const BOARD_MEETINGS_PATH: &str = "/companies-listing/corporate-filings-board-meetings";
/// Corporate actions listing page.
pub const CORP_ACTIONS_PATH: &str = "/companies-listing/corporate-filings-actions";
/// Announcements listing page.
pub const ANNOUNCEMENTS_PATH: &str = "/companies-listing/corporate-filings-announcements";

/// JSON endpoint for event calendar, board meetings and announcements,
/// selected by the `type` query parameter.
pub const CORPORATE_FILING_API_PATH: &str = "/api/corporate-filing";
/// JSON endpoint for corporate actions. Takes no `type` parameter.
pub const CORPORATE_ACTIONS_API_PATH: &str = "/api/corporate-actions";

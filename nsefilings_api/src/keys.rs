//! Candidate-key lists for API payload fields.
//!
//! Each list encodes the field names the origin has used historically for the
//! same semantic field, in trust order. These are compatibility data: keep
//! them intact and ordered, or previously-working payload shapes silently
//! stop mapping.

/// Symbol field, shared by all categories.
pub const SYMBOL: &[&str] = &["symbol", "SYMBOL"];

pub mod event_calendar {
    pub const COMPANY: &[&str] = &["company", "companyName", "sm_name"];
    pub const PURPOSE: &[&str] = &["purpose", "subject", "event"];
    pub const DETAILS: &[&str] = &["details", "description", "bmdesc", "eventDescription"];
    pub const DATE: &[&str] = &["date", "eventDate", "bm_date"];
}

pub mod board_meeting {
    pub const COMPANY: &[&str] = &["sm_name", "company", "companyName"];
    pub const PURPOSE: &[&str] = &["bm_purpose", "purpose", "subject"];
    pub const DETAILS_LINK: &[&str] = &["detailsUrl", "details_link", "bm_details"];
    pub const MEETING_DATE: &[&str] = &["bm_date", "meetingDate", "meeting_date"];
    pub const ATTACHMENT_LINK: &[&str] = &["attachment", "attachmentUrl", "pdfUrl", "xmlUrl"];
    pub const BROADCAST_DATETIME: &[&str] = &["bm_timestamp", "broadcastDateTime", "broadcast_time"];
}

pub mod corporate_action {
    pub const COMPANY: &[&str] = &["company", "comp", "companyName"];
    pub const SERIES: &[&str] = &["series"];
    pub const PURPOSE: &[&str] = &["subject", "purpose"];
    pub const FACE_VALUE: &[&str] = &["faceVal", "face_value"];
    pub const EX_DATE: &[&str] = &["exDate", "ex_date"];
    pub const RECORD_DATE: &[&str] = &["recDate", "recordDate", "rec_date"];
    pub const BOOK_CLOSURE_START: &[&str] = &["bcStartDate", "bc_start_date"];
    pub const BOOK_CLOSURE_END: &[&str] = &["bcEndDate", "bc_end_date"];
}

pub mod announcement {
    pub const COMPANY: &[&str] = &["sm_name", "company", "companyName"];
    pub const SUBJECT: &[&str] = &["desc", "subject", "purpose"];
    pub const DETAILS: &[&str] = &["details", "description", "attchmntText"];
    pub const ATTACHMENT_LINK: &[&str] = &["attachment", "attachmentUrl", "attchmntFile"];
    pub const ATTACHMENT_SIZE: &[&str] = &["fileSize", "attchmntFileSize", "attachmentSize"];
    pub const XBRL_LINK: &[&str] = &["xbrl", "xbrlUrl", "seq_id"];
    pub const BROADCAST_DATETIME: &[&str] = &["an_dt", "broadcastDateTime", "broadcast_datetime"];
}

/// `type` labels probed in order for announcements. The origin's announcement
/// taxonomy is undocumented and has answered to different labels over time;
/// the first label that yields any items wins.
pub const ANNOUNCEMENT_TYPE_LABELS: &[&str] =
    &["Announcement", "Corporate Announcement", "Announcements"];

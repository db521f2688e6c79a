mod category;
pub use self::category::{Category, RetrievalRequest};

mod rows;
pub use self::rows::{
    AnnouncementRow, BoardMeetingRow, CorporateActionRow, Disclosures, EventCalendarRow,
};

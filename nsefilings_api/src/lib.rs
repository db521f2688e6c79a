mod client;
mod endpoints;
mod errors;
pub mod extract;
pub mod keys;
mod session;
pub mod types;
pub mod user_agent;
pub use self::client::ApiClient;
pub use self::endpoints::{
    ANNOUNCEMENTS_PATH, BOARD_MEETINGS_PATH, CORPORATE_ACTIONS_API_PATH, CORPORATE_FILING_API_PATH,
    CORP_ACTIONS_PATH, EVENT_CALENDAR_PATH, NSE_BASE_URL,
};
pub use self::errors::Error;
pub use self::session::Session;

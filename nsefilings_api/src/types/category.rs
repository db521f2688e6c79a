use std::fmt;

use serde::{Deserialize, Serialize};

use crate::endpoints;

/// The four corporate-disclosure record categories served by the origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    EventCalendar,
    BoardMeeting,
    CorporateAction,
    Announcement,
}

impl Category {
    /// Short kebab-case name, for file names and command-line surfaces.
    pub fn slug(self) -> &'static str {
        match self {
            Category::EventCalendar => "event-calendar",
            Category::BoardMeeting => "board-meetings",
            Category::CorporateAction => "corporate-actions",
            Category::Announcement => "announcements",
        }
    }

    /// Path of the listing page for this category, relative to the origin
    /// root. The page takes the ticker as a `symbol` query parameter.
    pub fn page_path(self) -> &'static str {
        match self {
            Category::EventCalendar => endpoints::EVENT_CALENDAR_PATH,
            Category::BoardMeeting => endpoints::BOARD_MEETINGS_PATH,
            Category::CorporateAction => endpoints::CORP_ACTIONS_PATH,
            Category::Announcement => endpoints::ANNOUNCEMENTS_PATH,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::EventCalendar => "event calendar",
            Category::BoardMeeting => "board meetings",
            Category::CorporateAction => "corporate actions",
            Category::Announcement => "announcements",
        };
        f.write_str(name)
    }
}

/// One unit of retrieval work: a ticker and a category.
///
/// `headless` only controls whether browser automation, if it ends up being
/// used, runs without a visible window. It has no effect on the output.
#[derive(Clone, Debug)]
pub struct RetrievalRequest {
    pub symbol: String,
    pub category: Category,
    pub headless: bool,
}

impl RetrievalRequest {
    pub fn new(symbol: &str, category: Category) -> Self {
        Self {
            symbol: symbol.to_string(),
            category,
            headless: true,
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_paths_are_distinct() {
        let paths = [
            Category::EventCalendar.page_path(),
            Category::BoardMeeting.page_path(),
            Category::CorporateAction.page_path(),
            Category::Announcement.page_path(),
        ];
        for (i, a) in paths.iter().enumerate() {
            for b in paths.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn request_defaults_to_headless() {
        let req = RetrievalRequest::new("tcs", Category::Announcement);
        assert!(req.headless);
        assert!(!req.with_headless(false).headless);
    }
}

//! HTML table parsers for the four disclosure categories.
//!
//! The origin renders each category into a `<table>` with a known id, but the
//! markup drifts: ids get renamed, optional cells disappear, details text is
//! tucked into data attributes. Per-category differences live in a
//! [`TableSpec`] plus a small row builder; everything structural is shared.
//!
//! "No table" and "no tbody" are valid empty results (the symbol simply has
//! no disclosures), and a malformed row skips only itself.

use scraper::{ElementRef, Html, Selector};

use nsefilings_api::types::{
    AnnouncementRow, BoardMeetingRow, Category, CorporateActionRow, EventCalendarRow,
};

/// Structural anchor for one category's table: the ids the origin has used
/// for it, an optional class-substring heuristic, and the minimum number of
/// cells a row must have to be admitted.
#[derive(Debug)]
pub struct TableSpec {
    pub table_ids: &'static [&'static str],
    pub class_hint: Option<&'static str>,
    pub min_cells: usize,
}

pub const EVENT_CALENDAR_TABLE: TableSpec = TableSpec {
    table_ids: &["CFeventCalendarTable"],
    class_hint: None,
    min_cells: 4,
};

pub const BOARD_MEETINGS_TABLE: TableSpec = TableSpec {
    table_ids: &["CFboardmeetingEquityTable"],
    class_hint: None,
    min_cells: 7,
};

pub const CORP_ACTIONS_TABLE: TableSpec = TableSpec {
    table_ids: &["CFcorpactionsEquityTable"],
    class_hint: None,
    min_cells: 9,
};

pub const ANNOUNCEMENTS_TABLE: TableSpec = TableSpec {
    table_ids: &["CFanncEquityTable", "CFanncEquity"],
    class_hint: Some("annc"),
    min_cells: 7,
};

/// The spec for a category.
pub fn spec_for(category: Category) -> &'static TableSpec {
    match category {
        Category::EventCalendar => &EVENT_CALENDAR_TABLE,
        Category::BoardMeeting => &BOARD_MEETINGS_TABLE,
        Category::CorporateAction => &CORP_ACTIONS_TABLE,
        Category::Announcement => &ANNOUNCEMENTS_TABLE,
    }
}

/// Parses the event calendar table.
///
/// Columns: symbol, company, purpose, details, date (date cell optional).
pub fn event_calendar(html: &str, base_url: &str) -> Vec<EventCalendarRow> {
    parse_table(html, &EVENT_CALENDAR_TABLE, base_url, |c| {
        Some(EventCalendarRow {
            symbol: c.symbol(),
            company: c.text(1),
            purpose: c.text(2),
            details: c.details(3),
            date: c.text(4),
        })
    })
}

/// Parses the board meetings equity table.
pub fn board_meetings(html: &str, base_url: &str) -> Vec<BoardMeetingRow> {
    parse_table(html, &BOARD_MEETINGS_TABLE, base_url, |c| {
        Some(BoardMeetingRow {
            symbol: c.symbol(),
            company: c.text(1),
            purpose: c.text(2),
            details_link: c.href(3),
            meeting_date: c.text(4),
            attachment_link: c.href(5),
            broadcast_datetime: c.text(6),
        })
    })
}

/// Parses the corporate actions equity table. All nine columns are plain
/// text.
pub fn corporate_actions(html: &str, base_url: &str) -> Vec<CorporateActionRow> {
    parse_table(html, &CORP_ACTIONS_TABLE, base_url, |c| {
        Some(CorporateActionRow {
            symbol: c.symbol(),
            company: c.text(1),
            series: c.text(2),
            purpose: c.text(3),
            face_value: c.text(4),
            ex_date: c.text(5),
            record_date: c.text(6),
            book_closure_start: c.text(7),
            book_closure_end: c.text(8),
        })
    })
}

/// Parses the announcements equity table. The attachment cell carries both
/// the link and, as its visible text, the file size.
pub fn announcements(html: &str, base_url: &str) -> Vec<AnnouncementRow> {
    parse_table(html, &ANNOUNCEMENTS_TABLE, base_url, |c| {
        Some(AnnouncementRow {
            symbol: c.symbol(),
            company: c.text(1),
            subject: c.text(2),
            details: c.details(3),
            attachment_link: c.href(4),
            attachment_size: c.text(4),
            xbrl_link: c.href(5),
            broadcast_datetime: c.text(6),
        })
    })
}

/// Row count a category's parser would admit from `html`. Used for
/// last-chance checks without caring about the row shape.
pub fn row_count(html: &str, category: Category, base_url: &str) -> usize {
    match category {
        Category::EventCalendar => event_calendar(html, base_url).len(),
        Category::BoardMeeting => board_meetings(html, base_url).len(),
        Category::CorporateAction => corporate_actions(html, base_url).len(),
        Category::Announcement => announcements(html, base_url).len(),
    }
}

// -- Shared machinery --

/// The cells of one table row, with the extraction rules the origin's markup
/// calls for.
struct Cells<'a> {
    tds: Vec<ElementRef<'a>>,
    base: &'a str,
}

impl Cells<'_> {
    /// Whitespace-normalized text of cell `i`, empty if the cell is absent.
    fn text(&self, i: usize) -> String {
        self.tds.get(i).map(|td| cell_text(*td)).unwrap_or_default()
    }

    /// The symbol cell: anchor text when the symbol is wrapped in a link,
    /// the cell text otherwise.
    fn symbol(&self) -> String {
        let Some(td) = self.tds.first() else {
            return String::new();
        };
        let anchor_sel = anchor_selector();
        match td.select(&anchor_sel).next() {
            Some(a) => cell_text(a),
            None => cell_text(*td),
        }
    }

    /// Anchor href of cell `i`, absolutized against the origin base; empty
    /// when the cell has no link.
    fn href(&self, i: usize) -> String {
        let Some(td) = self.tds.get(i) else {
            return String::new();
        };
        let anchor_sel = anchor_selector();
        td.select(&anchor_sel)
            .find_map(|a| a.value().attr("href"))
            .map(|href| absolutize(href, self.base))
            .unwrap_or_default()
    }

    /// Details-style cell `i`. The rendered text is usually truncated, so a
    /// full-text data attribute wins over a nested content span over the raw
    /// cell text.
    fn details(&self, i: usize) -> String {
        let Some(td) = self.tds.get(i) else {
            return String::new();
        };
        if let Some(full) = td
            .value()
            .attr("data-ws-symbol-col-prev")
            .or_else(|| td.value().attr("data-ws-symbol-col"))
        {
            return full.trim().to_string();
        }
        let content_sel = Selector::parse("span.content").unwrap();
        if let Some(span) = td.select(&content_sel).next() {
            return cell_text(span);
        }
        cell_text(*td)
    }
}

fn parse_table<R>(
    html: &str,
    spec: &TableSpec,
    base_url: &str,
    build: impl Fn(&Cells<'_>) -> Option<R>,
) -> Vec<R> {
    let doc = Html::parse_document(html);
    let Some(table) = find_table(&doc, spec) else {
        return Vec::new();
    };

    let tbody_sel = Selector::parse("tbody").unwrap();
    let Some(tbody) = table.select(&tbody_sel).next() else {
        return Vec::new();
    };

    let tr_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    let mut rows = Vec::new();
    for tr in tbody.select(&tr_sel) {
        let tds: Vec<ElementRef<'_>> = tr.select(&td_sel).collect();
        if tds.len() < spec.min_cells {
            continue;
        }
        let cells = Cells { tds, base: base_url };
        if let Some(row) = build(&cells) {
            rows.push(row);
        }
    }
    rows
}

fn find_table<'a>(doc: &'a Html, spec: &TableSpec) -> Option<ElementRef<'a>> {
    for id in spec.table_ids {
        let sel = Selector::parse(&format!("table#{}", id)).unwrap();
        if let Some(table) = doc.select(&sel).next() {
            return Some(table);
        }
    }
    let hint = spec.class_hint?;
    let table_sel = Selector::parse("table").unwrap();
    doc.select(&table_sel).find(|t| {
        t.value()
            .attr("class")
            .is_some_and(|c| c.to_ascii_lowercase().contains(hint))
    })
}

fn anchor_selector() -> Selector {
    Selector::parse("a").unwrap()
}

fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn absolutize(href: &str, base: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}

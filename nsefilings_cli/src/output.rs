use anyhow::Result;
use serde::Serialize;
use nsefilings_lib::{AnnouncementRow, BoardMeetingRow, CorporateActionRow, EventCalendarRow};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct EventDisplay {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "Date")]
    date: String,
}

#[derive(Tabled)]
struct BoardMeetingDisplay {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Meeting Date")]
    meeting_date: String,
    #[tabled(rename = "Attachment")]
    attachment: String,
    #[tabled(rename = "Broadcast")]
    broadcast: String,
}

#[derive(Tabled)]
struct ActionDisplay {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Series")]
    series: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Ex-Date")]
    ex_date: String,
    #[tabled(rename = "Record Date")]
    record_date: String,
    #[tabled(rename = "Book Closure")]
    book_closure: String,
}

#[derive(Tabled)]
struct AnnouncementDisplay {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Broadcast")]
    broadcast: String,
}

// -- Row builders --

fn build_event_rows(rows: &[EventCalendarRow]) -> Vec<EventDisplay> {
    rows.iter()
        .map(|r| EventDisplay {
            symbol: r.symbol.clone(),
            company: truncate(&r.company, 32),
            purpose: truncate(&r.purpose, 32),
            details: truncate(&r.details, 60),
            date: r.date.clone(),
        })
        .collect()
}

fn build_board_meeting_rows(rows: &[BoardMeetingRow]) -> Vec<BoardMeetingDisplay> {
    rows.iter()
        .map(|r| BoardMeetingDisplay {
            symbol: r.symbol.clone(),
            company: truncate(&r.company, 32),
            purpose: truncate(&r.purpose, 40),
            meeting_date: r.meeting_date.clone(),
            attachment: truncate(&r.attachment_link, 48),
            broadcast: r.broadcast_datetime.clone(),
        })
        .collect()
}

fn build_action_rows(rows: &[CorporateActionRow]) -> Vec<ActionDisplay> {
    rows.iter()
        .map(|r| ActionDisplay {
            symbol: r.symbol.clone(),
            series: r.series.clone(),
            purpose: truncate(&r.purpose, 48),
            ex_date: r.ex_date.clone(),
            record_date: r.record_date.clone(),
            book_closure: format_book_closure(&r.book_closure_start, &r.book_closure_end),
        })
        .collect()
}

fn build_announcement_rows(rows: &[AnnouncementRow]) -> Vec<AnnouncementDisplay> {
    rows.iter()
        .map(|r| AnnouncementDisplay {
            symbol: r.symbol.clone(),
            subject: truncate(&r.subject, 32),
            details: truncate(&r.details, 60),
            size: r.attachment_size.clone(),
            broadcast: r.broadcast_datetime.clone(),
        })
        .collect()
}

// -- Printers --

pub fn print_events_table(rows: &[EventCalendarRow]) {
    print_table(build_event_rows(rows));
}

pub fn print_board_meetings_table(rows: &[BoardMeetingRow]) {
    print_table(build_board_meeting_rows(rows));
}

pub fn print_actions_table(rows: &[CorporateActionRow]) {
    print_table(build_action_rows(rows));
}

pub fn print_announcements_table(rows: &[AnnouncementRow]) {
    print_table(build_announcement_rows(rows));
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("No records.");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

fn format_book_closure(start: &str, end: &str) -> String {
    match (start.is_empty() || start == "-", end.is_empty() || end == "-") {
        (true, true) => "-".to_string(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{} to {}", start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate("a very long purpose string", 10);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 10);
    }

    #[test]
    fn book_closure_formats_ranges_and_dashes() {
        assert_eq!(format_book_closure("-", "-"), "-");
        assert_eq!(format_book_closure("01-Jan", "-"), "01-Jan");
        assert_eq!(format_book_closure("01-Jan", "05-Jan"), "01-Jan to 05-Jan");
    }

    #[test]
    fn event_rows_map_fields() {
        let rows = vec![EventCalendarRow {
            symbol: "TCS".into(),
            company: "Tata Consultancy Services".into(),
            purpose: "Results".into(),
            details: "d".into(),
            date: "10-Jul-2025".into(),
        }];
        let display = build_event_rows(&rows);
        assert_eq!(display.len(), 1);
        assert_eq!(display[0].symbol, "TCS");
        assert_eq!(display[0].date, "10-Jul-2025");
    }
}

//! Fallback-pipeline tests against a mock origin, with browser fallback
//! disabled so the static-HTML strategy is exercised.

use std::sync::Arc;

use nsefilings_lib::{Category, NullArtifactSink, RetrievalRequest, Retriever, Settings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_only_settings() -> Settings {
    Settings {
        browser_fallback: false,
        ..Settings::default()
    }
}

fn retriever(server: &MockServer) -> Retriever {
    Retriever::new(http_only_settings())
        .with_base_url(&server.uri())
        .with_artifacts(Arc::new(NullArtifactSink))
}

async fn mock_origin() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    server
}

fn event_table(rows: &str) -> String {
    format!(
        "<html><body><table id=\"CFeventCalendarTable\"><tbody>{}</tbody></table></body></html>",
        rows
    )
}

fn event_row(symbol: &str, purpose: &str) -> String {
    format!(
        "<tr><td>{}</td><td>Some Co</td><td>{}</td><td>details</td><td>10-Jul-2025</td></tr>",
        symbol, purpose
    )
}

#[tokio::test]
async fn api_empty_falls_back_to_exactly_the_html_rows() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;
    let body = format!("{}{}", event_row("TCS", "Results"), event_row("TCS", "AGM"));
    Mock::given(method("GET"))
        .and(path("/companies-listing/corporate-filings-event-calendar"))
        .and(query_param("symbol", "TCS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(event_table(&body)))
        .mount(&server)
        .await;

    let rows = retriever(&server).event_calendar("TCS", true).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].purpose, "Results");
    assert_eq!(rows[1].purpose, "AGM");
}

#[tokio::test]
async fn api_rows_win_and_html_is_never_mixed_in() {
    let server = mock_origin().await;
    let api_body = r#"{"data": [
        {"symbol": "TCS", "sm_name": "Tata Consultancy", "bm_purpose": "Results",
         "bm_date": "10-Jul-2025", "bm_timestamp": "02-Jul-2025 18:42:11"},
        {"symbol": "TCS", "sm_name": "Tata Consultancy", "bm_purpose": "Dividend",
         "bm_date": "11-Oct-2024", "bm_timestamp": "04-Oct-2024 09:15:00"}
    ]}"#;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .and(query_param("type", "Board Meeting"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_body))
        .mount(&server)
        .await;
    // A decoy page: if the orchestrator wrongly fell through (or combined
    // strategies) it would pick up this extra row.
    let decoy = "<html><table id=\"CFboardmeetingEquityTable\"><tbody>\
        <tr><td>TCS</td><td>Co</td><td>Decoy</td><td></td><td>d</td><td></td><td>ts</td></tr>\
        </tbody></table></html>";
    Mock::given(method("GET"))
        .and(path("/companies-listing/corporate-filings-board-meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_string(decoy))
        .mount(&server)
        .await;

    let rows = retriever(&server).board_meetings("TCS", true).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.symbol == "TCS"));
    assert!(rows.iter().all(|r| r.purpose != "Decoy"));
}

#[tokio::test]
async fn unknown_symbol_yields_empty_without_error() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies-listing/corporate-filings-event-calendar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><p>nothing here</p></html>"),
        )
        .mount(&server)
        .await;

    let rows = retriever(&server).event_calendar("XXXX", true).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn announcements_probe_succeeds_without_touching_the_page() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .and(query_param("type", "Announcement"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .and(query_param("type", "Corporate Announcement"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;
    let api_body = r#"{"data": [
        {"symbol": "TCS", "sm_name": "Tata Consultancy", "desc": "Updates",
         "attchmntText": "details", "attchmntFile": "/corporate/a.pdf",
         "fileSize": "10 KB", "an_dt": "02-Jul-2025 14:05:33"}
    ]}"#;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .and(query_param("type", "Announcements"))
        .respond_with(ResponseTemplate::new(200).set_body_string(api_body))
        .mount(&server)
        .await;
    // The page mock stays unmounted on purpose: reaching for it would fail
    // the test with a retrieval error.

    let rows = retriever(&server).announcements("TCS", true).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "Updates");
}

#[tokio::test]
async fn api_failure_then_page_failure_is_an_attributed_error() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-actions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies-listing/corporate-filings-actions"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let err = retriever(&server)
        .corporate_actions("TCS", true)
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("corporate actions"), "message was: {}", msg);
    assert!(msg.contains("TCS"), "message was: {}", msg);
}

#[tokio::test]
async fn retrieve_dispatches_on_request_category() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-actions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": [{"symbol": "TCS", "series": "EQ", "subject": "Dividend",
                 "faceVal": 1, "exDate": "16-Jan-2025"}]}"#,
        ))
        .mount(&server)
        .await;

    let req = RetrievalRequest::new("TCS", Category::CorporateAction);
    let disclosures = retriever(&server).retrieve(&req).await.unwrap();
    assert_eq!(disclosures.len(), 1);
}

#[tokio::test]
async fn input_symbol_is_normalized_before_use() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .and(query_param("symbol", "TCS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": [{"company": "Tata Consultancy", "purpose": "Results",
                 "date": "10-Jul-2025"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let rows = retriever(&server)
        .event_calendar("  tcs ", true)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    // The payload item had no symbol field, so the normalized input ticker
    // is used.
    assert_eq!(rows[0].symbol, "TCS");
}

#[tokio::test]
async fn html_rows_with_empty_symbol_cell_get_the_input_ticker() {
    let server = mock_origin().await;
    Mock::given(method("GET"))
        .and(path("/api/corporate-filing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;
    let body = "<tr><td></td><td>Some Co</td><td>AGM</td><td>details</td><td>d</td></tr>";
    Mock::given(method("GET"))
        .and(path("/companies-listing/corporate-filings-event-calendar"))
        .respond_with(ResponseTemplate::new(200).set_body_string(event_table(body)))
        .mount(&server)
        .await;

    let rows = retriever(&server).event_calendar("wipro", true).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "WIPRO");
}

//! Per-category retrieval orchestrators.
//!
//! Every request runs the same two-tier pipeline: try the JSON API, and if
//! it yields nothing (or fails in any way), fall back to the category page:
//! a plain primed GET when browser fallback is disabled, a full browser
//! session with render waiting otherwise. API-side problems are never
//! surfaced directly; they only mean "try the next strategy". Exhausting the
//! fallback is the only way a request fails.

use std::sync::Arc;

use url::Url;

use nsefilings_api::types::{
    AnnouncementRow, BoardMeetingRow, Category, CorporateActionRow, Disclosures, EventCalendarRow,
    RetrievalRequest,
};
use nsefilings_api::{ApiClient, Session, NSE_BASE_URL};

use crate::artifacts::{ArtifactSink, FsArtifactSink};
use crate::browser::BrowserSession;
use crate::config::Settings;
use crate::parse::{self, TableSpec};
use crate::wait::{wait_for_rows, PageProbe, WaitOptions, WaitOutcome};
use crate::FetchError;

/// Entry point for disclosure retrieval.
///
/// Holds only process-wide configuration; each retrieval builds its own
/// session (and browser instance when needed), so one `Retriever` is safe to
/// share across concurrent requests.
pub struct Retriever {
    settings: Settings,
    base_url: String,
    artifacts: Arc<dyn ArtifactSink>,
}

/// What the fallback transport produced: the page HTML, and whether it is
/// the final state of a render wait that ran out of budget.
struct FallbackHtml {
    html: String,
    timed_out: bool,
}

impl Retriever {
    pub fn new(settings: Settings) -> Self {
        let artifacts = Arc::new(FsArtifactSink::new(settings.debug_dir.clone()));
        Self {
            settings,
            base_url: NSE_BASE_URL.to_string(),
            artifacts,
        }
    }

    /// Points the retriever at a custom origin root. Used for testing with
    /// wiremock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replaces the diagnostic-artifact sink.
    pub fn with_artifacts(mut self, artifacts: Arc<dyn ArtifactSink>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Runs one request, dispatching on its category.
    pub async fn retrieve(&self, req: &RetrievalRequest) -> Result<Disclosures, FetchError> {
        match req.category {
            Category::EventCalendar => self
                .event_calendar(&req.symbol, req.headless)
                .await
                .map(Disclosures::EventCalendar),
            Category::BoardMeeting => self
                .board_meetings(&req.symbol, req.headless)
                .await
                .map(Disclosures::BoardMeetings),
            Category::CorporateAction => self
                .corporate_actions(&req.symbol, req.headless)
                .await
                .map(Disclosures::CorporateActions),
            Category::Announcement => self
                .announcements(&req.symbol, req.headless)
                .await
                .map(Disclosures::Announcements),
        }
    }

    /// Retrieves the event calendar for `symbol`.
    pub async fn event_calendar(
        &self,
        symbol: &str,
        headless: bool,
    ) -> Result<Vec<EventCalendarRow>, FetchError> {
        let category = Category::EventCalendar;
        let symbol = normalize_symbol(symbol);
        let api = match self.primed_client(category, &symbol).await {
            Some(client) => swallow(client.event_calendar(&symbol).await, category, &symbol),
            None => None,
        };
        self.finish(category, &symbol, headless, api, parse::event_calendar, |r| {
            &mut r.symbol
        })
        .await
    }

    /// Retrieves board meetings for `symbol`.
    pub async fn board_meetings(
        &self,
        symbol: &str,
        headless: bool,
    ) -> Result<Vec<BoardMeetingRow>, FetchError> {
        let category = Category::BoardMeeting;
        let symbol = normalize_symbol(symbol);
        let api = match self.primed_client(category, &symbol).await {
            Some(client) => swallow(client.board_meetings(&symbol).await, category, &symbol),
            None => None,
        };
        self.finish(category, &symbol, headless, api, parse::board_meetings, |r| {
            &mut r.symbol
        })
        .await
    }

    /// Retrieves corporate actions for `symbol`.
    pub async fn corporate_actions(
        &self,
        symbol: &str,
        headless: bool,
    ) -> Result<Vec<CorporateActionRow>, FetchError> {
        let category = Category::CorporateAction;
        let symbol = normalize_symbol(symbol);
        let api = match self.primed_client(category, &symbol).await {
            Some(client) => swallow(client.corporate_actions(&symbol).await, category, &symbol),
            None => None,
        };
        self.finish(category, &symbol, headless, api, parse::corporate_actions, |r| {
            &mut r.symbol
        })
        .await
    }

    /// Retrieves announcements for `symbol`. The API side probes the known
    /// `type` labels before this method falls back to the page.
    pub async fn announcements(
        &self,
        symbol: &str,
        headless: bool,
    ) -> Result<Vec<AnnouncementRow>, FetchError> {
        let category = Category::Announcement;
        let symbol = normalize_symbol(symbol);
        let api = match self.primed_client(category, &symbol).await {
            Some(client) => swallow(client.announcements(&symbol).await, category, &symbol),
            None => None,
        };
        self.finish(category, &symbol, headless, api, parse::announcements, |r| {
            &mut r.symbol
        })
        .await
    }

    /// Shared tail of every pipeline: take the API rows if there are any,
    /// otherwise fetch the fallback HTML, parse it, and back-fill empty
    /// symbol cells with the request ticker.
    async fn finish<R>(
        &self,
        category: Category,
        symbol: &str,
        headless: bool,
        api_rows: Option<Vec<R>>,
        parse_fn: fn(&str, &str) -> Vec<R>,
        symbol_field: fn(&mut R) -> &mut String,
    ) -> Result<Vec<R>, FetchError> {
        if let Some(rows) = api_rows {
            if !rows.is_empty() {
                tracing::info!("{} {} rows for {} via API", rows.len(), category, symbol);
                return Ok(rows);
            }
            tracing::debug!("API has no {} for {}, falling back", category, symbol);
        }

        let fallback = self
            .fallback_html(category, symbol, headless)
            .await
            .map_err(|e| e.into_retrieval(category, symbol))?;
        let mut rows = parse_fn(&fallback.html, &self.base_url);
        if rows.is_empty() && fallback.timed_out {
            return Err(FetchError::Timeout.into_retrieval(category, symbol));
        }
        for row in &mut rows {
            let slot = symbol_field(row);
            if slot.is_empty() {
                *slot = symbol.to_string();
            }
        }
        tracing::info!("{} {} rows for {} via fallback", rows.len(), category, symbol);
        Ok(rows)
    }

    async fn primed_client(&self, category: Category, symbol: &str) -> Option<ApiClient> {
        match ApiClient::connect_to(&self.base_url).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::debug!(
                    "session priming for {} {} failed: {}, falling back",
                    category,
                    symbol,
                    e
                );
                None
            }
        }
    }

    async fn fallback_html(
        &self,
        category: Category,
        symbol: &str,
        headless: bool,
    ) -> Result<FallbackHtml, FetchError> {
        if self.settings.browser_enabled(category) {
            self.browser_html(category, symbol, headless).await
        } else {
            let session = Session::prime_with_base(&self.base_url).await?;
            let html = session
                .get_html(category.page_path(), &[("symbol", symbol)])
                .await?;
            Ok(FallbackHtml {
                html,
                timed_out: false,
            })
        }
    }

    /// The browser-transport fallback. The session is closed on every exit
    /// path; a browser failure here is terminal for the request, no second
    /// browser attempt is made.
    async fn browser_html(
        &self,
        category: Category,
        symbol: &str,
        headless: bool,
    ) -> Result<FallbackHtml, FetchError> {
        let session = BrowserSession::launch(headless).await?;
        let result = self.drive_browser(&session, category, symbol).await;
        session.close().await;
        result
    }

    async fn drive_browser(
        &self,
        session: &BrowserSession,
        category: Category,
        symbol: &str,
    ) -> Result<FallbackHtml, FetchError> {
        // Land on the origin root first so the anti-bot cookies exist before
        // the category page starts firing its data requests.
        session.goto(&self.base_url).await?;
        session
            .goto(&category_url(&self.base_url, category, symbol))
            .await?;

        let spec = parse::spec_for(category);
        let opts = WaitOptions::new(
            self.settings.wait_timeout(category),
            self.settings.poll_interval(),
        );
        let label = format!("{}-{}", category.slug(), symbol);
        match wait_for_rows(session, spec, &opts, self.artifacts.as_ref(), &label).await? {
            WaitOutcome::Ready(html) => {
                let html = self.scroll_recheck(session, spec, html).await;
                Ok(FallbackHtml {
                    html,
                    timed_out: false,
                })
            }
            WaitOutcome::TimedOut { last_html } => Ok(FallbackHtml {
                html: last_html,
                timed_out: true,
            }),
        }
    }

    /// One scroll-triggered re-check for lazy-loaded rows. The fresh page
    /// state is taken only when the live row count strictly increased;
    /// otherwise the rows already in hand are kept.
    async fn scroll_recheck(
        &self,
        session: &BrowserSession,
        spec: &TableSpec,
        html: String,
    ) -> String {
        let before = match session.row_count(spec).await {
            Ok(n) => n,
            Err(_) => return html,
        };
        if session.scroll_to_bottom().await.is_err() {
            return html;
        }
        tokio::time::sleep(self.settings.poll_interval()).await;
        match session.row_count(spec).await {
            Ok(after) if after > before => {
                tracing::debug!("lazy load grew the table from {} to {} rows", before, after);
                session.html().await.unwrap_or(html)
            }
            _ => html,
        }
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Logs and absorbs an API-attempt failure; the pipeline treats it as "no
/// API rows" and moves on.
fn swallow<R>(
    outcome: Result<Vec<R>, nsefilings_api::Error>,
    category: Category,
    symbol: &str,
) -> Option<Vec<R>> {
    match outcome {
        Ok(rows) => Some(rows),
        Err(e) => {
            tracing::debug!(
                "API attempt for {} {} failed: {}, falling back",
                category,
                symbol,
                e
            );
            None
        }
    }
}

fn category_url(base: &str, category: Category, symbol: &str) -> String {
    match Url::parse(&format!("{}{}", base, category.page_path())) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("symbol", symbol);
            url.to_string()
        }
        Err(_) => format!("{}{}?symbol={}", base, category.page_path(), symbol),
    }
}

//! Render-readiness detection for JS-populated tables.
//!
//! The category pages fetch their table data asynchronously after load, so
//! "navigation finished" means nothing. The waiter polls the live DOM for the
//! target table's row count and, as a secondary signal, watches the page's
//! in-flight network request count: a network that has gone quiet while the
//! table is still empty earns one extra re-check and a longer grace sleep
//! before polling resumes, since quiet-but-empty usually (not always) means
//! no more data is coming.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::artifacts::ArtifactSink;
use crate::parse::TableSpec;
use crate::FetchError;

/// In-page network instrumentation, injected once per page. Wraps `fetch`
/// and `XMLHttpRequest.send` around a pending-request counter; the window
/// flag makes re-injection a no-op. Bump the `v1` marker when changing the
/// script so stale pages are distinguishable in diagnostics.
pub const NET_INSTRUMENTATION_V1: &str = r#"(() => {
  if (window.__nsefilingsNetHooked) return;
  window.__nsefilingsNetHooked = 'v1';
  window.__nsefilingsPending = 0;
  const origFetch = window.fetch;
  window.fetch = function (...args) {
    window.__nsefilingsPending += 1;
    return origFetch.apply(this, args).finally(() => {
      window.__nsefilingsPending -= 1;
    });
  };
  const origSend = XMLHttpRequest.prototype.send;
  XMLHttpRequest.prototype.send = function (...args) {
    window.__nsefilingsPending += 1;
    this.addEventListener('loadend', () => {
      window.__nsefilingsPending -= 1;
    }, { once: true });
    return origSend.apply(this, args);
  };
})()"#;

/// Expression reading the pending-request counter; `null` when the
/// instrumentation was never installed.
pub const PENDING_REQUESTS_JS: &str =
    "window.__nsefilingsNetHooked ? window.__nsefilingsPending : null";

/// Builds the expression counting data rows of the category table,
/// honoring the spec's id fallbacks and class heuristic.
pub fn row_count_script(spec: &TableSpec) -> String {
    let mut lookups: Vec<String> = spec
        .table_ids
        .iter()
        .map(|id| format!("document.getElementById('{}')", id))
        .collect();
    if let Some(hint) = spec.class_hint {
        lookups.push(format!(
            "Array.from(document.querySelectorAll('table')).find(t => (t.className || '').toLowerCase().includes('{}'))",
            hint
        ));
    }
    format!(
        "(() => {{ const t = {}; if (!t) return 0; const b = t.tBodies && t.tBodies[0]; return b ? b.rows.length : 0; }})()",
        lookups.join(" || ")
    )
}

/// The narrow view of a live page the waiter needs. Implemented by
/// [`BrowserSession`](crate::browser::BrowserSession) and by test fakes.
#[async_trait]
pub trait PageProbe {
    /// Installs [`NET_INSTRUMENTATION_V1`]. Must be a no-op when already
    /// installed.
    async fn install_instrumentation(&self) -> Result<(), FetchError>;
    /// Current data-row count of the category table in the live DOM.
    async fn row_count(&self, spec: &TableSpec) -> Result<u64, FetchError>;
    /// In-flight request count, `None` when instrumentation is unavailable.
    async fn pending_requests(&self) -> Result<Option<i64>, FetchError>;
    /// Full current page HTML.
    async fn html(&self) -> Result<String, FetchError>;
    /// Visual snapshot of the current page.
    async fn screenshot(&self) -> Result<Vec<u8>, FetchError>;
}

/// Budgets for one wait.
#[derive(Clone, Debug)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// How long the network must hold at zero in-flight requests to count
    /// as quiescent.
    pub settle_window: Duration,
    /// Final grace sleep granted once after quiescence without rows.
    pub grace: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            settle_window: Duration::from_secs(2),
            grace: Duration::from_secs(5),
        }
    }
}

/// How a wait ended: either the table has rows, or the budget ran out and
/// the caller gets the final page state for a last-chance parse.
#[derive(Debug)]
pub enum WaitOutcome {
    Ready(String),
    TimedOut { last_html: String },
}

/// Polls `page` until the table described by `spec` has at least one data
/// row, or `opts.timeout` elapses.
///
/// On timeout the final HTML and a screenshot are stored with `artifacts`
/// (exactly once, named after `label`) and the final HTML is returned in
/// [`WaitOutcome::TimedOut`]; deciding whether that still parses into rows
/// is the caller's job.
pub async fn wait_for_rows<P>(
    page: &P,
    spec: &TableSpec,
    opts: &WaitOptions,
    artifacts: &dyn ArtifactSink,
    label: &str,
) -> Result<WaitOutcome, FetchError>
where
    P: PageProbe + Sync + ?Sized,
{
    if let Err(e) = page.install_instrumentation().await {
        tracing::debug!("network instrumentation unavailable: {}", e);
    }

    let started = Instant::now();
    let mut quiet_since: Option<Instant> = None;
    let mut grace_used = false;

    loop {
        let count = page.row_count(spec).await?;
        if count > 0 {
            tracing::debug!("table ready with {} rows after {:?}", count, started.elapsed());
            return Ok(WaitOutcome::Ready(page.html().await?));
        }
        if started.elapsed() >= opts.timeout {
            break;
        }

        match page.pending_requests().await {
            Ok(Some(0)) => {
                let now = Instant::now();
                let since = *quiet_since.get_or_insert(now);
                if !grace_used && now.duration_since(since) >= opts.settle_window {
                    grace_used = true;
                    tokio::time::sleep(opts.poll_interval).await;
                    if page.row_count(spec).await? > 0 {
                        return Ok(WaitOutcome::Ready(page.html().await?));
                    }
                    tracing::debug!(
                        "network quiet for {:?} with an empty table, granting {:?} grace",
                        opts.settle_window,
                        opts.grace
                    );
                    tokio::time::sleep(opts.grace).await;
                    continue;
                }
            }
            Ok(Some(_)) => quiet_since = None,
            Ok(None) => {}
            Err(e) => tracing::debug!("pending-request probe failed: {}", e),
        }

        tokio::time::sleep(opts.poll_interval).await;
    }

    tracing::warn!("no table rows within {:?}, capturing diagnostics", opts.timeout);
    let last_html = page.html().await.unwrap_or_default();
    artifacts.store(&format!("{}.html", label), last_html.as_bytes());
    match page.screenshot().await {
        Ok(png) => artifacts.store(&format!("{}.png", label), &png),
        Err(e) => tracing::debug!("screenshot capture failed: {}", e),
    }
    Ok(WaitOutcome::TimedOut { last_html })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::parse::ANNOUNCEMENTS_TABLE;

    struct FakePage {
        counts: Mutex<VecDeque<u64>>,
        pending: Option<i64>,
        html: &'static str,
        installs: Mutex<u32>,
    }

    impl FakePage {
        fn with_counts(counts: &[u64], pending: Option<i64>) -> Self {
            Self {
                counts: Mutex::new(counts.iter().copied().collect()),
                pending,
                html: "<html>final</html>",
                installs: Mutex::new(0),
            }
        }

        fn next_count(&self) -> u64 {
            let mut counts = self.counts.lock().unwrap();
            if counts.len() > 1 {
                counts.pop_front().unwrap()
            } else {
                counts.front().copied().unwrap_or(0)
            }
        }
    }

    #[async_trait]
    impl PageProbe for FakePage {
        async fn install_instrumentation(&self) -> Result<(), FetchError> {
            *self.installs.lock().unwrap() += 1;
            Ok(())
        }

        async fn row_count(&self, _spec: &TableSpec) -> Result<u64, FetchError> {
            Ok(self.next_count())
        }

        async fn pending_requests(&self) -> Result<Option<i64>, FetchError> {
            Ok(self.pending)
        }

        async fn html(&self) -> Result<String, FetchError> {
            Ok(self.html.to_string())
        }

        async fn screenshot(&self) -> Result<Vec<u8>, FetchError> {
            Ok(vec![0x89, 0x50])
        }
    }

    struct CountingSink {
        names: Mutex<Vec<String>>,
    }

    impl CountingSink {
        fn new() -> Self {
            Self {
                names: Mutex::new(Vec::new()),
            }
        }
    }

    impl ArtifactSink for CountingSink {
        fn store(&self, name: &str, _bytes: &[u8]) {
            self.names.lock().unwrap().push(name.to_string());
        }
    }

    fn fast_opts() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(10),
            settle_window: Duration::from_millis(10),
            grace: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn rows_appearing_within_budget_return_ready() {
        // Zero rows for four polls, then three rows; budget is ten polls.
        let page = FakePage::with_counts(&[0, 0, 0, 0, 3], None);
        let sink = CountingSink::new();
        let outcome = wait_for_rows(&page, &ANNOUNCEMENTS_TABLE, &fast_opts(), &sink, "annc")
            .await
            .unwrap();
        match outcome {
            WaitOutcome::Ready(html) => assert_eq!(html, "<html>final</html>"),
            other => panic!("expected Ready, got {:?}", other),
        }
        assert!(sink.names.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn timeout_without_rows_captures_artifacts_once() {
        let page = FakePage::with_counts(&[0], Some(2));
        let sink = CountingSink::new();
        let outcome = wait_for_rows(&page, &ANNOUNCEMENTS_TABLE, &fast_opts(), &sink, "annc")
            .await
            .unwrap();
        assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));
        let names = sink.names.lock().unwrap();
        assert_eq!(*names, vec!["annc.html".to_string(), "annc.png".to_string()]);
        assert_eq!(*page.installs.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn quiescent_network_grants_grace_recheck() {
        // Network is already quiet; rows only show up on the grace re-check.
        let page = FakePage::with_counts(&[0, 0, 3], Some(0));
        let sink = CountingSink::new();
        let outcome = wait_for_rows(&page, &ANNOUNCEMENTS_TABLE, &fast_opts(), &sink, "annc")
            .await
            .unwrap();
        assert!(matches!(outcome, WaitOutcome::Ready(_)));
    }

    #[tokio::test]
    async fn quiescence_does_not_end_the_wait_early() {
        // Quiet network, rows arrive only after the grace window has been
        // spent: normal polling must continue until they do.
        let page = FakePage::with_counts(&[0, 0, 0, 0, 0, 0, 2], Some(0));
        let sink = CountingSink::new();
        let outcome = wait_for_rows(&page, &ANNOUNCEMENTS_TABLE, &fast_opts(), &sink, "annc")
            .await
            .unwrap();
        assert!(matches!(outcome, WaitOutcome::Ready(_)));
    }

    #[test]
    fn row_count_script_lists_all_identifiers() {
        let js = row_count_script(&ANNOUNCEMENTS_TABLE);
        assert!(js.contains("CFanncEquityTable"));
        assert!(js.contains("CFanncEquity"));
        assert!(js.contains("annc"));
        assert!(js.contains("rows.length"));
    }

    #[test]
    fn instrumentation_script_is_guarded() {
        assert!(NET_INSTRUMENTATION_V1.contains("__nsefilingsNetHooked"));
        assert!(NET_INSTRUMENTATION_V1.starts_with("(() => {"));
    }
}

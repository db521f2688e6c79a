//! Browser automation for pages the origin only renders client-side.
//!
//! One [`BrowserSession`] is launched per retrieval request and torn down
//! before the request returns, whatever the outcome. The instance is
//! configured for unattended operation on constrained hosts and to avoid
//! the origin's automation detection.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::task::JoinHandle;

use nsefilings_api::user_agent::get_user_agent;

use crate::parse::TableSpec;
use crate::wait::{row_count_script, PageProbe, NET_INSTRUMENTATION_V1, PENDING_REQUESTS_JS};
use crate::FetchError;

/// Page-load budget applied to every navigation.
const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// An isolated automated-browser instance with a single page.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches a browser. `headless` only controls window visibility.
    ///
    /// Fails with [`FetchError::Launch`] when no compatible browser binary
    /// can be started.
    pub async fn launch(headless: bool) -> Result<Self, FetchError> {
        let ua_arg = format!("--user-agent={}", get_user_agent());
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .request_timeout(NAV_TIMEOUT)
            .args(vec![
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--disable-blink-features=AutomationControlled",
                "--disable-web-security",
                ua_arg.as_str(),
            ]);
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(FetchError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Launch(e.to_string()))?;

        // The CDP event loop must keep running for the browser to respond.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("cdp event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::debug!("browser close after failed page open: {}", close_err);
                }
                handler_task.abort();
                return Err(FetchError::Cdp(e));
            }
        };

        tracing::debug!("browser session launched (headless: {})", headless);
        Ok(Self {
            browser,
            page,
            handler: handler_task,
        })
    }

    /// Navigates the page and waits for the load event, bounded by
    /// [`NAV_TIMEOUT`].
    pub async fn goto(&self, url: &str) -> Result<(), FetchError> {
        tracing::debug!("navigating to {}", url);
        tokio::time::timeout(NAV_TIMEOUT, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await
        .map_err(|_| FetchError::Navigation {
            url: url.to_string(),
        })??;
        Ok(())
    }

    /// Scrolls to the bottom of the page, nudging lazy-loaded rows.
    pub async fn scroll_to_bottom(&self) -> Result<(), FetchError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await?;
        Ok(())
    }

    /// Tears the instance down. Never fails: shutdown errors are logged and
    /// dropped, and a session that is gone already is not an error.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close reported: {}", e);
        }
        self.handler.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Backstop for paths that never reach close().
        self.handler.abort();
    }
}

#[async_trait]
impl PageProbe for BrowserSession {
    async fn install_instrumentation(&self) -> Result<(), FetchError> {
        self.page.evaluate(NET_INSTRUMENTATION_V1).await?;
        Ok(())
    }

    async fn row_count(&self, spec: &TableSpec) -> Result<u64, FetchError> {
        let result = self.page.evaluate(row_count_script(spec)).await?;
        Ok(result.value().and_then(|v| v.as_u64()).unwrap_or(0))
    }

    async fn pending_requests(&self) -> Result<Option<i64>, FetchError> {
        let result = self.page.evaluate(PENDING_REQUESTS_JS).await?;
        Ok(result.value().and_then(|v| v.as_i64()))
    }

    async fn html(&self) -> Result<String, FetchError> {
        Ok(self.page.content().await?)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, FetchError> {
        Ok(self
            .page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await?)
    }
}

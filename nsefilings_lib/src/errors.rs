//! Error types for the retrieval engine.

use nsefilings_api::types::Category;

/// Errors produced by the fallback pipeline.
///
/// Row-level and single-strategy failures never reach callers directly: the
/// orchestrator absorbs them into "try the next strategy" and only surfaces
/// [`FetchError::Retrieval`] once every strategy is exhausted.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// An error from the underlying API client or primed session.
    #[error("api error: {0}")]
    Api(#[from] nsefilings_api::Error),
    /// No compatible browser could be located or started. Terminal for the
    /// request: there is no strategy beyond the browser.
    #[error("failed to launch browser: {0}")]
    Launch(String),
    /// The browser started but a protocol operation failed.
    #[error("browser error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
    /// A navigation did not reach the load event within its budget.
    #[error("navigation to {url} did not complete in time")]
    Navigation { url: String },
    /// The rendered table never produced rows within the wait budget, and
    /// the last-chance parse of the final page state found nothing either.
    #[error("timed out waiting for table rows")]
    Timeout,
    /// Top-level failure, always attributed to a category and symbol.
    #[error("failed to retrieve {category} for {symbol}")]
    Retrieval {
        category: Category,
        symbol: String,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Wraps `self` into the top-level attributed failure, unless it already
    /// is one.
    pub fn into_retrieval(self, category: Category, symbol: &str) -> FetchError {
        match self {
            FetchError::Retrieval { .. } => self,
            other => FetchError::Retrieval {
                category,
                symbol: symbol.to_string(),
                source: Box::new(other),
            },
        }
    }
}

//! Environment-level settings, read once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use nsefilings_api::types::Category;

/// Process-wide toggles and budgets for the retrieval engine.
///
/// Loaded from the environment once and passed into [`Retriever`]
/// construction; individual requests never consult the environment.
///
/// [`Retriever`]: crate::Retriever
#[derive(Clone, Debug)]
pub struct Settings {
    /// Browser-automation fallback enabled at all. When false, every
    /// category falls back to a static HTML fetch instead.
    pub browser_fallback: bool,
    /// Browser fallback specifically for the announcements category.
    pub announcements_browser: bool,
    /// Render wait budget for categories other than announcements.
    pub wait_secs: u64,
    /// Render wait budget for announcements, which the origin populates
    /// noticeably slower than the rest.
    pub announcements_wait_secs: u64,
    /// Poll cadence of the render-readiness waiter.
    pub poll_millis: u64,
    /// Directory for diagnostic artifacts captured on waiter timeouts.
    pub debug_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            browser_fallback: true,
            announcements_browser: true,
            wait_secs: 60,
            announcements_wait_secs: 150,
            poll_millis: 500,
            debug_dir: PathBuf::from("nsefilings-debug"),
        }
    }
}

impl Settings {
    /// Reads settings from `NSEFILINGS_*` environment variables, using the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            browser_fallback: env_flag("NSEFILINGS_BROWSER_FALLBACK", defaults.browser_fallback),
            announcements_browser: env_flag("NSEFILINGS_ANNC_BROWSER", defaults.announcements_browser),
            wait_secs: env_u64("NSEFILINGS_WAIT_SECS", defaults.wait_secs),
            announcements_wait_secs: env_u64("NSEFILINGS_ANNC_WAIT_SECS", defaults.announcements_wait_secs),
            poll_millis: env_u64("NSEFILINGS_POLL_MILLIS", defaults.poll_millis),
            debug_dir: env::var("NSEFILINGS_DEBUG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.debug_dir),
        }
    }

    /// Whether the browser (rather than a static HTML fetch) is the fallback
    /// transport for `category`.
    pub fn browser_enabled(&self, category: Category) -> bool {
        match category {
            Category::Announcement => self.browser_fallback && self.announcements_browser,
            _ => self.browser_fallback,
        }
    }

    /// Render wait budget for `category`.
    pub fn wait_timeout(&self, category: Category) -> Duration {
        let secs = match category {
            Category::Announcement => self.announcements_wait_secs,
            _ => self.wait_secs,
        };
        Duration::from_secs(secs)
    }

    /// Waiter poll cadence.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_millis)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                tracing::warn!("ignoring unparseable {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparseable {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

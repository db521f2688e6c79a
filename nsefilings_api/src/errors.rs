//! Error types for the API client.

/// Errors that can occur when priming a session or making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The warm-up request to the origin root could not complete. The origin
    /// refuses unprimed sessions, so nothing else is worth attempting.
    #[error("failed to reach {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The origin returned a non-success status with a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// An HTTP request failed after the session was primed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The response body was not the JSON we expected.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("invalid store endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("don't know how to handle store reply {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid store response: {0}")]
    InvalidResponse(String),

    #[error("invalid redirect from store: {0}")]
    InvalidRedirect(String),

    #[error("too many redirects ({max}) from store while writing key {key}")]
    TooManyRedirects { max: u32, key: String },
}

impl StoreError {
    /// Returns `true` when the store could not be reached at all.
    pub fn is_transport(&self) -> bool {
        match self {
            StoreError::HttpRequest(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors that can happen while talking to the REST backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The base url is not usable as a base for endpoint paths.
    #[error("backend url `{0}` cannot be a base url")]
    BaseUrl(String),
    /// The base url could not be parsed.
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    /// The request never produced a response, or its body could not be read.
    #[error("request to `{url}` failed: {source}")]
    Request {
        /// Requested url.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("{method} `{url}` returned {status}")]
    Status {
        /// Request method.
        method: Method,
        /// Requested url.
        url: String,
        /// Response status.
        status: StatusCode,
    },
    /// The response body was not the expected JSON shape.
    #[error("invalid response body from `{url}`: {source}")]
    Decode {
        /// Requested url.
        url: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
}

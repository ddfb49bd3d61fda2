//! Error types for building, sending and reading HTTP requests.
//!
//! Every failure is returned to the immediate caller. The only error that is
//! not surfaced where it happens is a JSON encoding failure inside
//! [`Request::json`](crate::Request::json): it is held by the builder and
//! returned from [`Request::execute`](crate::Request::execute).

use http::StatusCode;

/// The main error type for fetchy.
///
/// # Examples
///
/// ```no_run
/// use fetchy::Error;
///
/// # fn example() -> Result<(), Error> {
/// let mut response = fetchy::fetch("https://api.example.com/users/1").execute()?;
///
/// match response.read_json::<serde_json::Value>() {
///     Ok(user) => println!("User: {}", user),
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Failed to decode. Raw response: {}", raw_response);
///         eprintln!("Serde error: {}", serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request body could not be serialized to JSON.
    ///
    /// Raised by [`Request::json`](crate::Request::json) but only reported
    /// once the request is built or executed.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// The request could not be turned into a transport request: an invalid
    /// method token, header name or header value.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The transport gave up waiting for the server.
    #[error("Request timed out")]
    Timeout,

    /// A custom [`Transport`](crate::Transport) failed to dispatch the request.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was already consumed by an earlier read.
    #[error("Cannot read response body multiple times")]
    BodyAlreadyRead,

    /// Draining the response body stream failed.
    #[error("Failed to read response body: {0}")]
    Read(#[from] std::io::Error),

    /// The response body could not be decoded into the requested type.
    ///
    /// The raw body is kept so decode problems can be debugged after the
    /// stream is gone.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },
}

impl Error {
    /// Returns `true` if the error happened while constructing or dispatching
    /// the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use fetchy::Error;
    ///
    /// assert!(Error::Timeout.is_transport());
    /// assert!(!Error::BodyAlreadyRead.is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::InvalidRequest(_)
                | Error::InvalidUrl(_)
                | Error::Network(_)
                | Error::Timeout
                | Error::Transport(_)
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Wraps an arbitrary error raised by a custom transport.
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(error.into())
    }
}

/// A specialized `Result` type for fetchy.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

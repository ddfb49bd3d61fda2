//! The transport seam between the request builder and the network.
//!
//! A [`Transport`] takes a fully built `http::Request` and returns the
//! matching `http::Response` with an unread body stream. [`ReqwestTransport`]
//! is the default implementation, built on `reqwest`'s blocking client.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::io::Read;
use std::time::Duration;
use url::Url;

/// A readable response body stream.
///
/// Dropping the stream closes it.
pub type Body = Box<dyn Read + Send>;

/// Dispatches HTTP requests.
///
/// Implement this to plug a different HTTP client (or a test double) into
/// [`Request::execute_with`](crate::Request::execute_with).
///
/// # Examples
///
/// ```
/// use fetchy::{Body, Transport};
///
/// struct Canned;
///
/// impl Transport for Canned {
///     fn send(&self, _request: http::Request<Vec<u8>>) -> fetchy::Result<http::Response<Body>> {
///         let body: Body = Box::new(std::io::Cursor::new(b"hello".to_vec()));
///         Ok(http::Response::new(body))
///     }
/// }
///
/// let mut response = fetchy::fetch("http://x/1").execute_with(&Canned).unwrap();
/// assert_eq!(response.read_string().unwrap(), "hello");
/// ```
pub trait Transport {
    /// Sends the request and blocks until the response head is available.
    fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Body>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Body>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Body>> {
        (**self).send(request)
    }
}

/// The default transport, backed by [`reqwest::blocking::Client`].
///
/// Every [`Request::execute`](crate::Request::execute) call creates its own
/// `ReqwestTransport`; build one yourself with [`ReqwestTransport::builder`]
/// to set a timeout or default headers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be initialized
    /// (for example when the TLS backend fails to load).
    pub fn new() -> Result<Self> {
        TransportBuilder::new().build()
    }

    /// Creates a new `TransportBuilder` for configuring a transport.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fetchy::ReqwestTransport;
    /// use std::time::Duration;
    ///
    /// # fn example() -> Result<(), fetchy::Error> {
    /// let transport = ReqwestTransport::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .default_header("Accept", "application/json")?
    ///     .build()?;
    ///
    /// let response = fetchy::fetch("https://api.example.com/health").execute_with(&transport)?;
    /// println!("Status: {}", response.status());
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> TransportBuilder {
        TransportBuilder::new()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Body>> {
        let (parts, body) = request.into_parts();
        let url = Url::parse(&parts.uri.to_string())?;

        let response = self
            .client
            .request(parts.method, url)
            .headers(parts.headers)
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Network(e)
                }
            })?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();

        let mut wrapped = http::Response::new(Box::new(response) as Body);
        *wrapped.status_mut() = status;
        *wrapped.version_mut() = version;
        *wrapped.headers_mut() = headers;
        Ok(wrapped)
    }
}

/// Builder for configuring and creating a [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct TransportBuilder {
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportBuilder {
    /// Creates a new `TransportBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header that will be included in every request sent through
    /// this transport. Headers set on the request take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::InvalidRequest(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::InvalidRequest(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the total timeout for each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configured `ReqwestTransport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is invalid.
    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = reqwest::blocking::Client::builder().default_headers(self.default_headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder.build().map_err(|e| {
            Error::InvalidRequest(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(ReqwestTransport { client })
    }
}

//! Fluent request builder.
//!
//! A [`Request`] collects the method, URL, headers and body through chained
//! calls and is consumed by [`Request::execute`]. Configuration steps that can
//! fail (currently only [`Request::json`]) do not break the chain: the first
//! failure is kept and returned when the request is built.

use crate::{
    transport::{ReqwestTransport, Transport},
    Error, Response, Result,
};
use http::{HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

/// Creates a `GET` request for the given URL.
///
/// # Examples
///
/// ```no_run
/// # fn example() -> Result<(), fetchy::Error> {
/// let mut response = fetchy::fetch("https://jsonplaceholder.typicode.com/posts/1").execute()?;
/// println!("{}", response.read_string()?);
/// # Ok(())
/// # }
/// ```
pub fn fetch(url: impl Into<String>) -> Request {
    Request::get(url)
}

/// An HTTP request under construction.
///
/// # Examples
///
/// ```no_run
/// use fetchy::Request;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct NewPost {
///     title: String,
///     body: String,
///     #[serde(rename = "userId")]
///     user_id: u32,
/// }
///
/// # fn example() -> Result<(), fetchy::Error> {
/// let post = NewPost {
///     title: "foo".to_string(),
///     body: "bar".to_string(),
///     user_id: 1,
/// };
///
/// let response = Request::new("post", "https://jsonplaceholder.typicode.com/posts")
///     .header("Accept", "application/json")
///     .json(&post)
///     .execute()?;
///
/// println!("Status: {}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "a request does nothing until it is executed"]
pub struct Request {
    inner: Result<Parts>,
}

#[derive(Debug, Clone, Default)]
struct Parts {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    /// Creates a request with the given method and URL.
    ///
    /// The method is upper-cased. Nothing is validated until the request is
    /// built.
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        Self {
            inner: Ok(Parts {
                url: url.into(),
                method: method.as_ref().to_uppercase(),
                headers: Vec::new(),
                body: Vec::new(),
            }),
        }
    }

    /// Creates a `GET` request for the given URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Appends a header.
    ///
    /// Headers are not deduplicated here. When the request is built they are
    /// applied in order, so the last value set for a name wins.
    pub fn header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|parts| parts.headers.push((key.into(), value.into())))
    }

    /// Appends several headers, in order.
    pub fn headers<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map(|parts| {
            parts
                .headers
                .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
        })
    }

    /// Replaces the method. The method is upper-cased.
    pub fn method(self, method: impl AsRef<str>) -> Self {
        self.map(|parts| parts.method = method.as_ref().to_uppercase())
    }

    /// Replaces the raw body.
    pub fn body(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.map(|parts| parts.body = bytes.into())
    }

    /// Sets the body to the JSON encoding of `value` and adds
    /// `Content-Type: application/json`.
    ///
    /// If `value` cannot be serialized the body is left as it was and the
    /// error is returned by [`build`](Self::build) and
    /// [`execute`](Self::execute).
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let request = self.header("Content-Type", "application/json");
        if request.inner.is_err() {
            return request;
        }

        match serde_json::to_vec(value) {
            Ok(bytes) => request.body(bytes),
            Err(e) => {
                tracing::debug!(error = %e, "Deferring JSON serialization error");
                Self {
                    inner: Err(Error::SerializationFailed(e)),
                }
            }
        }
    }

    /// The accumulated method, or `None` if a configuration step failed.
    pub fn method_str(&self) -> Option<&str> {
        self.inner.as_ref().ok().map(|parts| parts.method.as_str())
    }

    /// The accumulated URL, or `None` if a configuration step failed.
    pub fn url(&self) -> Option<&str> {
        self.inner.as_ref().ok().map(|parts| parts.url.as_str())
    }

    /// The accumulated headers in insertion order, duplicates included.
    pub fn header_pairs(&self) -> &[(String, String)] {
        self.inner
            .as_ref()
            .map(|parts| parts.headers.as_slice())
            .unwrap_or(&[])
    }

    /// The accumulated body.
    pub fn body_bytes(&self) -> &[u8] {
        self.inner
            .as_ref()
            .map(|parts| parts.body.as_slice())
            .unwrap_or(&[])
    }

    /// The deferred configuration error, if any.
    pub fn error(&self) -> Option<&Error> {
        self.inner.as_ref().err()
    }

    /// Builds the transport-level request.
    ///
    /// An empty method defaults to `GET`.
    ///
    /// # Errors
    ///
    /// Returns the deferred configuration error if there is one, otherwise an
    /// error for an invalid method, URL or header.
    pub fn build(self) -> Result<http::Request<Vec<u8>>> {
        let parts = self.inner?;

        let method = if parts.method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(parts.method.as_bytes())
                .map_err(|e| Error::InvalidRequest(format!("Invalid method: {}", e)))?
        };
        let url = Url::parse(&parts.url)?;

        let mut request = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(parts.body)
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        let headers = request.headers_mut();
        for (key, value) in &parts.headers {
            let name = HeaderName::try_from(key.as_str())
                .map_err(|e| Error::InvalidRequest(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::InvalidRequest(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        Ok(request)
    }

    /// Sends the request through a fresh default [`ReqwestTransport`] and
    /// blocks until the response head arrives.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build); additionally returns transport failures
    /// such as [`Error::Network`] and [`Error::Timeout`].
    pub fn execute(self) -> Result<Response> {
        let request = self.build()?;
        let transport = ReqwestTransport::new()?;
        dispatch(&transport, request)
    }

    /// Sends the request through the given transport.
    pub fn execute_with<T: Transport + ?Sized>(self, transport: &T) -> Result<Response> {
        let request = self.build()?;
        dispatch(transport, request)
    }

    fn map(mut self, f: impl FnOnce(&mut Parts)) -> Self {
        if let Ok(parts) = &mut self.inner {
            f(parts);
        }
        self
    }
}

fn dispatch<T: Transport + ?Sized>(
    transport: &T,
    request: http::Request<Vec<u8>>,
) -> Result<Response> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!(
        method = %method,
        url = %uri,
        headers = request.headers().len(),
        body_len = request.body().len(),
        "Executing HTTP request"
    );

    match transport.send(request) {
        Ok(response) => {
            tracing::info!(
                status = response.status().as_u16(),
                method = %method,
                url = %uri,
                "Received HTTP response"
            );
            Ok(Response::new(response))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                method = %method,
                url = %uri,
                "Request failed"
            );
            Err(e)
        }
    }
}

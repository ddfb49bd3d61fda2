//! Read-once wrapper around a transport response.
//!
//! The [`Response`] type owns the transport response and forwards status and
//! header access to it. The body stream can be consumed exactly once, as
//! bytes, text or decoded JSON; a second attempt fails with
//! [`Error::BodyAlreadyRead`].

use crate::{transport::Body, Error, Result};
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use std::io::Read;

/// A response returned by [`Request::execute`](crate::Request::execute).
///
/// # Examples
///
/// ```no_run
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Post {
///     id: u64,
///     title: String,
/// }
///
/// # fn example() -> Result<(), fetchy::Error> {
/// let mut response = fetchy::fetch("https://jsonplaceholder.typicode.com/posts/1").execute()?;
///
/// println!("Status: {}", response.status());
/// println!("Content-Type: {:?}", response.header("content-type"));
///
/// let post: Post = response.read_json()?;
/// println!("Post {}: {}", post.id, post.title);
///
/// // The body is gone now.
/// assert!(response.read_bytes().is_err());
/// # Ok(())
/// # }
/// ```
pub struct Response {
    inner: http::Response<Body>,
    has_read: bool,
}

impl Response {
    /// Wraps a transport response whose body has not been read yet.
    pub fn new(inner: http::Response<Body>) -> Self {
        Self {
            inner,
            has_read: false,
        }
    }

    /// The HTTP status code of the response.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// The HTTP version of the response.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Returns a header value by name, if present and valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fetchy::{Body, Response};
    /// let body: Body = Box::new(std::io::empty());
    /// let inner = http::Response::builder()
    ///     .header("content-type", "application/json")
    ///     .body(body)
    ///     .unwrap();
    ///
    /// let response = Response::new(inner);
    /// assert_eq!(response.header("content-type"), Some("application/json"));
    /// assert_eq!(response.header("x-missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Returns `true` if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Returns `true` once the body stream has been consumed.
    pub fn has_read(&self) -> bool {
        self.has_read
    }

    /// Reads the whole body into bytes.
    ///
    /// The stream is closed when this returns, whether or not the read
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BodyAlreadyRead`] if the body was consumed before, or
    /// [`Error::Read`] if draining the stream fails.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        if self.has_read {
            return Err(Error::BodyAlreadyRead);
        }
        self.has_read = true;

        // Dropped on every path out of this function, which closes the stream.
        let mut stream = std::mem::replace(self.inner.body_mut(), Box::new(std::io::empty()));

        let mut bytes = Vec::new();
        match stream.read_to_end(&mut bytes) {
            Ok(len) => {
                tracing::debug!(status = self.status().as_u16(), len, "Read response body");
                Ok(bytes)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    partial_len = bytes.len(),
                    "Failed to read response body"
                );
                Err(Error::Read(e))
            }
        }
    }

    /// Reads the whole body as text.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Reads the whole body and decodes it as JSON.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`read_bytes`](Self::read_bytes), returns
    /// [`Error::DeserializationFailed`] with the raw body when decoding fails.
    pub fn read_json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.read_bytes()?;

        serde_json::from_slice(&bytes).map_err(|e| {
            let raw_response = String::from_utf8_lossy(&bytes).into_owned();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                "Failed to deserialize response"
            );

            Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status: self.status(),
            }
        })
    }

    /// Reads the whole body as JSON into an existing value.
    ///
    /// `target` is only overwritten when decoding succeeds.
    pub fn read_json_into<T: DeserializeOwned>(&mut self, target: &mut T) -> Result<()> {
        *target = self.read_json()?;
        Ok(())
    }

    /// Releases the wrapped transport response.
    ///
    /// If the body was already read, the returned body is empty.
    pub fn into_inner(self) -> http::Response<Body> {
        self.inner
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status())
            .field("version", &self.version())
            .field("headers", self.headers())
            .field("has_read", &self.has_read)
            .finish()
    }
}

impl From<http::Response<Body>> for Response {
    fn from(inner: http::Response<Body>) -> Self {
        Self::new(inner)
    }
}

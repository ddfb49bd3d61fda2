//! # Fetchy - fluent HTTP requests with read-once responses
//!
//! Fetchy is a small convenience layer over a blocking HTTP client. A
//! [`Request`] is configured through chained calls and sent with
//! [`Request::execute`]; the resulting [`Response`] lets you read the body
//! exactly once as bytes, text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fetchy::{fetch, Request};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! #[derive(Serialize)]
//! struct NewPost {
//!     title: String,
//!     body: String,
//! }
//!
//! fn main() -> Result<(), fetchy::Error> {
//!     // GET and decode
//!     let post: Post = fetch("https://jsonplaceholder.typicode.com/posts/1")
//!         .execute()?
//!         .read_json()?;
//!     println!("Post {}: {}", post.id, post.title);
//!
//!     // POST a JSON body
//!     let new_post = NewPost {
//!         title: "foo".to_string(),
//!         body: "bar".to_string(),
//!     };
//!     let response = Request::new("POST", "https://jsonplaceholder.typicode.com/posts")
//!         .json(&new_post)
//!         .execute()?;
//!     println!("Status: {}", response.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Deferred errors
//!
//! Configuration steps never break the chain. If [`Request::json`] cannot
//! serialize its argument, the error is kept and returned by
//! [`Request::execute`], and nothing is sent:
//!
//! ```
//! use fetchy::{Error, Request};
//!
//! let mut map = std::collections::HashMap::new();
//! map.insert(vec![1u8], "non-string keys cannot be JSON object keys");
//! let result = Request::new("POST", "http://localhost/items").json(&map).execute();
//! assert!(matches!(result, Err(Error::SerializationFailed(_))));
//! ```
//!
//! ## Features
//!
//! - **Fluent builder** - method, URL, headers, raw or JSON body in one expression
//! - **Read-once bodies** - a second read fails with [`Error::BodyAlreadyRead`]
//! - **Pluggable transport** - [`Request::execute_with`] takes any [`Transport`]
//! - **Automatic logging** - Structured logging with `tracing` for observability

mod error;
mod request;
mod response;
pub mod transport;

pub use error::{Error, Result};
pub use request::{fetch, Request};
pub use response::Response;
pub use transport::{Body, ReqwestTransport, Transport, TransportBuilder};

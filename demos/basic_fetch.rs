//! Basic example demonstrating a GET and a JSON POST.
//!
//! This example shows how to:
//! - Fetch a resource and read its body as text
//! - Send a JSON body with a fluent request
//! - Decode a JSON response into a struct
//!
//! Run with: `cargo run --example basic_fetch`

use fetchy::{fetch, Error, Request};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("fetchy=debug,basic_fetch=info")
        .init();

    println!("=== GET Request Example ===");
    let mut response = fetch("https://jsonplaceholder.typicode.com/posts/1").execute()?;
    println!("Status code: {}", response.status());
    println!("Response body: {}", response.read_string()?);
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "foo".to_string(),
        body: "bar".to_string(),
        user_id: 1,
    };

    let mut response = Request::new("POST", "https://jsonplaceholder.typicode.com/posts")
        .header("Accept", "application/json")
        .json(&new_post)
        .execute()?;
    println!("Status code: {}", response.status());
    println!("Content-Type: {:?}", response.header("content-type"));

    let created: Post = response.read_json()?;
    println!("Created post ID: {}", created.id);
    println!("Title: {}", created.title);

    // The body has been consumed; a second read is refused.
    if let Err(e) = response.read_bytes() {
        println!("Second read: {}", e);
    }

    Ok(())
}

//! Client for the JSONPlaceholder REST API
//!
//! Fetches users and posts and hands back both the raw response body (for
//! verbatim caching) and the decoded records.
//!
//! # Example
//!
//! ```no_run
//! use jsonplaceholder_client::{fetch_records, PlaceholderClient, Resource, User};
//!
//! # async fn example() -> jsonplaceholder_client::Result<()> {
//! let client = PlaceholderClient::new();
//! let fetched = fetch_records::<Vec<User>>(&client, &Resource::Users).await?;
//! println!("{} bytes, {:?} users", fetched.body.len(), fetched.records.map(|u| u.len()));
//! # Ok(())
//! # }
//! ```
//!
//! # Endpoints
//!
//! - `GET /users`
//! - `GET /users/{id}`
//! - `GET /users/{id}/posts`
//! - `GET /posts`

mod client;
mod error;
mod types;

pub use client::{fetch_records, Fetched, PlaceholderClient, RecordFetcher, Resource};
pub use error::{PlaceholderError, Result};
pub use types::{Address, Company, Geo, Post, User};

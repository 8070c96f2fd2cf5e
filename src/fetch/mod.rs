//! HTTP transport port used by the language-pack loader and error reporter.

mod client;
mod error;
mod http;

pub use client::{FetchClient, FetchRequest, FetchResponse, Method};
pub use error::FetchError;
pub use http::HttpFetchClient;

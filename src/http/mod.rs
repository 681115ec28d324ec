//! Document-protocol adapter: JSON over HTTP, one round trip per verb.

mod client;
mod wire;

pub use client::{HttpClient, HttpClientBuilder};

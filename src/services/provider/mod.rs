pub mod client;
pub mod http;

pub use client::{ProviderClient, ProviderError, ProviderResponse};
pub use http::HttpProviderClient;

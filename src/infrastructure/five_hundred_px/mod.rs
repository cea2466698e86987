//! 500px-style photo feed API client.

mod client;
mod dto;

pub use client::{DEFAULT_BASE_URL, FiveHundredPxClient, FiveHundredPxConfig};

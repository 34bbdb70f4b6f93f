//! Network boundary of the portal client.

pub mod client;
pub mod error;

pub use client::HttpPortalClient;

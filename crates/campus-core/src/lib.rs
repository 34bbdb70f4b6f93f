//! Domain model and service boundaries of the Campus Portal client.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod ids;
pub mod notification;
pub mod request;
pub mod review;
pub mod scholarship;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{PortalError, Result};

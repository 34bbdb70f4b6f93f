//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Session, user identity and the persisted envelope
//! - `route`: Guarded routes and the login landing decision

mod model;
mod route;

pub use model::{
    AuthUser, Credentials, PersistedSession, SESSION_STORAGE_KEY, SESSION_STORAGE_VERSION,
    Session, TokenResponse, UserRole,
};
pub use route::{GuardDecision, Route};

//! Application layer of the Campus Portal client.
//!
//! Each workflow is a state container over [`campus_core::api::PortalApi`]:
//! user action, local state update, REST call, response merged back.

pub mod auth;
mod busy;
pub mod chat;
pub mod documents;
pub mod notifications;
pub mod requests;
pub mod review;
pub mod wizard;

pub use auth::AuthSessionService;
pub use chat::ChatPanel;
pub use documents::{DocumentTracker, SlotAction, ViewedDocument};
pub use notifications::{FeedEntry, NotificationFeed, NotificationPoller};
pub use requests::RequestBoard;
pub use review::{BulkOutcome, ReviewDetails, ReviewQueue};
pub use wizard::{ApplicationWizard, WizardStep};

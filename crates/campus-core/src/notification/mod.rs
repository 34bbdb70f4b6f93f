//! Notification domain module.

mod model;

pub use model::{MirrorState, Notification};

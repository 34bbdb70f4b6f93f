//! Chat domain module.

mod model;

pub use model::{ChatMessage, ChatReply, ChatRequest, SenderRole};

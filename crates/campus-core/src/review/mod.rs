//! Admin review domain module.

mod model;

pub use model::{
    BusPassRow, MemoCardRow, PendingApplicationRow, QueueKind, ReviewAction, ReviewDecision,
    ReviewItem, StatusTab, WorkflowAction,
};

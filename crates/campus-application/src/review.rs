//! Admin review queue.
//!
//! The loaded list is filtered client-side by status tab. Selection is purely
//! local state used by bulk decisions.

use crate::busy::BusyFlag;
use campus_core::api::PortalApi;
use campus_core::review::{QueueKind, ReviewAction, ReviewDecision, ReviewItem, StatusTab};
use campus_core::scholarship::VerificationReport;
use campus_core::{PortalError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Details shown when an admin opens one item.
#[derive(Debug, Clone)]
pub enum ReviewDetails {
    /// Full verification report of a scholarship application.
    Verification(VerificationReport),
    /// The loaded row, for queues without a details endpoint.
    Row(ReviewItem),
}

/// Per-item result of a bulk decision.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, PortalError)>,
}

impl BulkOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub struct ReviewQueue {
    api: Arc<dyn PortalApi>,
    kind: QueueKind,
    tab: StatusTab,
    items: Vec<ReviewItem>,
    selected: BTreeSet<String>,
    loading: BusyFlag,
    error: Option<String>,
}

impl ReviewQueue {
    pub fn new(api: Arc<dyn PortalApi>, kind: QueueKind) -> Self {
        Self {
            api,
            kind,
            tab: StatusTab::default(),
            items: Vec::new(),
            selected: BTreeSet::new(),
            loading: BusyFlag::default(),
            error: None,
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn tab(&self) -> StatusTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: StatusTab) {
        self.tab = tab;
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items of the current tab.
    pub fn visible(&self) -> Vec<&ReviewItem> {
        self.items
            .iter()
            .filter(|item| self.tab.matches(item.status))
            .collect()
    }

    pub fn count_for(&self, tab: StatusTab) -> usize {
        self.items.iter().filter(|item| tab.matches(item.status)).count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) -> Result<()> {
        let result = {
            let _busy = self.loading.enter()?;
            self.api.list_review_queue(self.kind).await
        };

        match result {
            Ok(items) => {
                tracing::debug!("[Review] Loaded {} {} item(s)", items.len(), self.kind);
                self.items = items;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Review] Loading {} failed: {}", self.kind, e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn view_details(&self, id: &str) -> Result<ReviewDetails> {
        match self.kind {
            QueueKind::Scholarships => Ok(ReviewDetails::Verification(
                self.api.verification_details(id).await?,
            )),
            _ => self
                .item(id)
                .cloned()
                .map(ReviewDetails::Row)
                .ok_or_else(|| PortalError::not_found("review item", id)),
        }
    }

    fn check_action(&self, action: ReviewAction) -> Result<()> {
        if self.kind.supports(action) {
            Ok(())
        } else {
            Err(PortalError::validation(
                "action",
                format!("{} can only be approved or rejected", self.kind),
            ))
        }
    }

    /// Posts one decision, then reloads the queue.
    pub async fn decide(
        &mut self,
        id: &str,
        action: ReviewAction,
        comments: Option<String>,
    ) -> Result<()> {
        self.check_action(action)?;
        let decision = ReviewDecision::new(action, comments);

        if let Err(e) = self.api.submit_review(self.kind, id, &decision).await {
            tracing::warn!("[Review] {} {} -> {} failed: {}", self.kind, id, action.as_str(), e);
            self.error = Some(e.user_message());
            return Err(e);
        }

        tracing::info!("[Review] {} {} -> {}", self.kind, id, action.as_str());
        self.load().await
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn select_all_visible(&mut self) {
        let ids: Vec<String> = self.visible().iter().map(|item| item.id.clone()).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Applies one decision to every selected item, one at a time.
    ///
    /// The selection is cleared afterwards whatever the individual results.
    pub async fn bulk_decide(
        &mut self,
        action: ReviewAction,
        comments: Option<String>,
    ) -> Result<BulkOutcome> {
        self.check_action(action)?;
        let decision = ReviewDecision::new(action, comments);
        let ids = std::mem::take(&mut self.selected);

        let mut outcome = BulkOutcome::default();
        for id in ids {
            match self.api.submit_review(self.kind, &id, &decision).await {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    tracing::warn!("[Review] Bulk {} on {} failed: {}", action.as_str(), id, e);
                    outcome.failed.push((id, e));
                }
            }
        }

        tracing::info!(
            "[Review] Bulk {}: {} succeeded, {} failed",
            action.as_str(),
            outcome.succeeded.len(),
            outcome.failed.len()
        );

        if let Err(e) = self.load().await {
            tracing::debug!("[Review] Reload after bulk decision failed: {}", e);
        }
        if let Some((_, first)) = outcome.failed.first() {
            self.error = Some(format!(
                "{} of {} item(s) failed: {}",
                outcome.failed.len(),
                outcome.attempted(),
                first.user_message()
            ));
        }

        Ok(outcome)
    }
}

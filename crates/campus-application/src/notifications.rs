//! Notification feed with optimistic read marks and a cancellable poller.

use campus_core::api::PortalApi;
use campus_core::notification::{MirrorState, Notification};
use campus_core::{PortalError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest poll period; `tokio::time::interval` rejects a zero period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A notification plus the delivery state of its local read mark.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub notification: Notification,
    pub mirror: MirrorState,
}

pub struct NotificationFeed {
    api: Arc<dyn PortalApi>,
    entries: Vec<FeedEntry>,
    error: Option<String>,
}

impl NotificationFeed {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            entries: Vec::new(),
            error: None,
        }
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&FeedEntry> {
        self.entries.iter().find(|entry| entry.notification.id == id)
    }

    /// Derived from the list on every call.
    pub fn unread_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.notification.is_read)
            .count()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the list with the server's, keeping unconfirmed local read marks.
    pub async fn refresh(&mut self) -> Result<()> {
        let fetched = match self.api.list_notifications().await {
            Ok(list) => list,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        let entries = fetched
            .into_iter()
            .map(|mut notification| {
                // A server-side read supersedes any local mark.
                let local = self
                    .get(&notification.id)
                    .map(|entry| entry.mirror.clone())
                    .filter(|mirror| !notification.is_read && mirror.is_unconfirmed());
                match local {
                    Some(mirror) => {
                        notification.is_read = true;
                        FeedEntry {
                            notification,
                            mirror,
                        }
                    }
                    None => FeedEntry {
                        notification,
                        mirror: MirrorState::Synced,
                    },
                }
            })
            .collect();

        self.entries = entries;
        self.error = None;
        tracing::debug!(
            "[Notifications] {} item(s), {} unread",
            self.entries.len(),
            self.unread_count()
        );
        Ok(())
    }

    /// Marks one notification read locally, then mirrors it to the backend.
    ///
    /// A failed mirror call leaves the local mark in place, tagged `Failed`.
    pub async fn mark_read(&mut self, id: &str) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.notification.id == id)
            .ok_or_else(|| PortalError::not_found("notification", id))?;

        {
            let entry = &mut self.entries[index];
            if entry.notification.is_read && !matches!(entry.mirror, MirrorState::Failed { .. }) {
                return Ok(());
            }
            entry.notification.is_read = true;
            entry.mirror = MirrorState::Pending;
        }

        let result = self.api.mark_notification_read(id).await;
        self.settle(&[index], result)
    }

    /// Marks everything read locally and mirrors it with one call.
    pub async fn mark_all_read(&mut self) -> Result<()> {
        let mut touched = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if !entry.notification.is_read || entry.mirror.is_unconfirmed() {
                entry.notification.is_read = true;
                entry.mirror = MirrorState::Pending;
                touched.push(index);
            }
        }

        let result = self.api.mark_all_notifications_read().await;
        self.settle(&touched, result)
    }

    /// Re-sends every failed mirror. Returns how many are now confirmed.
    pub async fn retry_failed(&mut self) -> Result<usize> {
        let failed: Vec<(usize, String)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches!(entry.mirror, MirrorState::Failed { .. }))
            .map(|(index, entry)| (index, entry.notification.id.clone()))
            .collect();

        let mut confirmed = 0;
        let mut last_error = None;
        for (index, id) in failed {
            self.entries[index].mirror = MirrorState::Pending;
            let result = self.api.mark_notification_read(&id).await;
            match self.settle(&[index], result) {
                Ok(()) => confirmed += 1,
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) if confirmed == 0 => Err(e),
            _ => Ok(confirmed),
        }
    }

    fn settle(&mut self, indices: &[usize], result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                for &index in indices {
                    self.entries[index].mirror = MirrorState::Confirmed;
                }
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "[Notifications] Read mark for {} item(s) not mirrored: {}",
                    indices.len(),
                    e
                );
                for &index in indices {
                    self.entries[index].mirror = MirrorState::Failed {
                        error: e.user_message(),
                    };
                }
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

/// Background refresh of a shared feed.
///
/// Fetches immediately, then once per interval. The task stops when
/// [`cancel`](Self::cancel) is called or the poller is dropped.
pub struct NotificationPoller {
    cancel: CancellationToken,
    polls: watch::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn spawn(feed: Arc<Mutex<NotificationFeed>>, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let (tx, polls) = watch::channel(0u64);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut completed = 0u64;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = feed.lock().await.refresh().await {
                            tracing::warn!("[Notifications] Poll failed: {}", e);
                        }
                        completed += 1;
                        let _ = tx.send(completed);
                    }
                }
            }
            tracing::debug!("[Notifications] Poller stopped after {} poll(s)", completed);
        });

        tracing::debug!("[Notifications] Poller started, every {:?}", interval);
        Self {
            cancel,
            polls,
            handle,
        }
    }

    /// Receiver of the number of completed polls.
    pub fn polls(&self) -> watch::Receiver<u64> {
        self.polls.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

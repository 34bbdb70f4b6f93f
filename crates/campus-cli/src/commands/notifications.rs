use super::or_dash;
use crate::app::AppContext;
use anyhow::Result;
use campus_application::{FeedEntry, NotificationFeed, NotificationPoller};
use campus_core::notification::MirrorState;
use campus_core::session::Route;
use clap::Subcommand;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Show the feed
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification read
    Read { id: String },
    /// Mark every notification read
    ReadAll,
    /// Keep polling and print new notifications until Ctrl-C
    Watch,
}

pub async fn run(ctx: &AppContext, action: NotificationsAction) -> Result<()> {
    ctx.require(Route::Notifications)?;
    let mut feed = NotificationFeed::new(ctx.api());

    match action {
        NotificationsAction::List { unread } => {
            feed.refresh().await?;
            let entries = feed
                .entries()
                .iter()
                .filter(|entry| !unread || !entry.notification.is_read);
            for entry in entries {
                print_entry(entry);
            }
            println!("{} unread", feed.unread_count());
        }
        NotificationsAction::Read { id } => {
            feed.refresh().await?;
            feed.mark_read(&id).await?;
            println!("Marked {id} read. {} unread", feed.unread_count());
        }
        NotificationsAction::ReadAll => {
            feed.refresh().await?;
            feed.mark_all_read().await?;
            println!("All notifications read.");
        }
        NotificationsAction::Watch => watch(ctx, feed).await?,
    }
    Ok(())
}

async fn watch(ctx: &AppContext, feed: NotificationFeed) -> Result<()> {
    let interval = ctx.config().notification_poll_interval();
    let feed = Arc::new(Mutex::new(feed));
    let poller = NotificationPoller::spawn(feed.clone(), interval);
    let mut polls = poller.polls();
    let mut seen = HashSet::new();

    println!("Watching notifications every {}s. Ctrl-C to stop.", interval.as_secs());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = polls.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = feed.lock().await;
                if let Some(error) = current.error() {
                    eprintln!("error: {error}");
                    continue;
                }
                for entry in current.entries() {
                    if seen.insert(entry.notification.id.clone()) && !entry.notification.is_read {
                        print_entry(entry);
                    }
                }
            }
        }
    }

    poller.cancel();
    Ok(())
}

fn print_entry(entry: &FeedEntry) {
    let n = &entry.notification;
    let marker = match (&entry.mirror, n.is_read) {
        (MirrorState::Failed { .. }, _) => "!",
        (_, false) => "*",
        (_, true) => " ",
    };
    println!(
        "{marker} {:<6} {:<20} {} - {}",
        n.id,
        or_dash(n.sent_at.as_deref()),
        n.title,
        n.message
    );
}

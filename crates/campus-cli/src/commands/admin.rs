use super::or_dash;
use crate::app::AppContext;
use crate::commands::requests::display_status;
use anyhow::{Result, bail};
use campus_application::{ReviewDetails, ReviewQueue};
use campus_core::review::{QueueKind, ReviewAction, ReviewItem, StatusTab};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminAction {
    /// List a review queue
    Queue {
        /// requests, scholarships, memo-cards or bus-passes
        #[arg(value_parser = parse_kind)]
        kind: QueueKind,
        /// pending, approved, rejected or all
        #[arg(long, default_value = "pending", value_parser = parse_tab)]
        tab: StatusTab,
    },
    /// Show one item in full
    Details {
        #[arg(value_parser = parse_kind)]
        kind: QueueKind,
        id: String,
    },
    /// Approve, reject or ask for more information
    Review {
        #[arg(value_parser = parse_kind)]
        kind: QueueKind,
        id: String,
        /// approve, reject or more-info
        #[arg(value_parser = parse_action)]
        action: ReviewAction,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Apply one decision to several items
    Bulk {
        #[arg(value_parser = parse_kind)]
        kind: QueueKind,
        #[arg(value_parser = parse_action)]
        action: ReviewAction,
        /// Item ids; with --all every item of the tab is used instead
        ids: Vec<String>,
        #[arg(long)]
        all: bool,
        #[arg(long, default_value = "pending", value_parser = parse_tab)]
        tab: StatusTab,
        #[arg(long)]
        comments: Option<String>,
    },
}

fn parse_kind(raw: &str) -> Result<QueueKind, String> {
    QueueKind::parse(raw).ok_or_else(|| format!("unknown queue '{raw}'"))
}

fn parse_tab(raw: &str) -> Result<StatusTab, String> {
    StatusTab::parse(raw).ok_or_else(|| format!("unknown tab '{raw}'"))
}

fn parse_action(raw: &str) -> Result<ReviewAction, String> {
    ReviewAction::parse(raw).ok_or_else(|| format!("unknown action '{raw}'"))
}

pub async fn run(ctx: &AppContext, action: AdminAction) -> Result<()> {
    let admin = ctx.require_admin()?;
    tracing::debug!("[Cli] Admin command by {}", admin.username);

    match action {
        AdminAction::Queue { kind, tab } => {
            let mut queue = ReviewQueue::new(ctx.api(), kind);
            queue.load().await?;
            queue.set_tab(tab);
            for item in queue.visible() {
                print_item(item);
            }
            println!(
                "pending {} | approved {} | rejected {} | all {}",
                queue.count_for(StatusTab::Pending),
                queue.count_for(StatusTab::Approved),
                queue.count_for(StatusTab::Rejected),
                queue.count_for(StatusTab::All)
            );
        }
        AdminAction::Details { kind, id } => {
            let mut queue = ReviewQueue::new(ctx.api(), kind);
            if kind != QueueKind::Scholarships {
                queue.load().await?;
            }
            match queue.view_details(&id).await? {
                ReviewDetails::Verification(report) => {
                    println!(
                        "Application {} ({})",
                        or_dash(report.application_number.as_deref()),
                        display_status(report.status)
                    );
                    match report.overall_score {
                        Some(score) => println!("Overall score: {score:.1}%"),
                        None => println!("Overall score: -"),
                    }
                    for doc in &report.documents {
                        let score = doc.score.map(|s| format!("{s:.1}%")).unwrap_or_default();
                        println!(
                            "  {:<22} {:<12} {}",
                            doc.doc_type, doc.verification_status, score
                        );
                    }
                    if !report.verification_results.is_null() {
                        println!("{}", serde_json::to_string_pretty(&report.verification_results)?);
                    }
                }
                ReviewDetails::Row(item) => {
                    print_item(&item);
                    println!("{}", serde_json::to_string_pretty(&item.raw)?);
                }
            }
        }
        AdminAction::Review {
            kind,
            id,
            action,
            comments,
        } => {
            let mut queue = ReviewQueue::new(ctx.api(), kind);
            queue.decide(&id, action, comments).await?;
            let status = queue
                .item(&id)
                .map(|item| display_status(item.status))
                .unwrap_or("-");
            println!("{kind} {id}: {} ({status})", action.workflow_verb());
        }
        AdminAction::Bulk {
            kind,
            action,
            ids,
            all,
            tab,
            comments,
        } => {
            let mut queue = ReviewQueue::new(ctx.api(), kind);
            queue.load().await?;
            queue.set_tab(tab);
            if all {
                queue.select_all_visible();
            } else {
                for id in &ids {
                    queue.toggle(id);
                }
            }
            if queue.selected().is_empty() {
                bail!("Nothing selected. Pass item ids or --all.");
            }

            let outcome = queue.bulk_decide(action, comments).await?;
            println!(
                "{} of {} item(s) {}",
                outcome.succeeded.len(),
                outcome.attempted(),
                action.as_str()
            );
            for (id, error) in &outcome.failed {
                eprintln!("  {id}: {}", error.user_message());
            }
        }
    }
    Ok(())
}

fn print_item(item: &ReviewItem) {
    let docs = item
        .documents_count
        .map(|n| format!("{n} doc(s)"))
        .unwrap_or_default();
    println!(
        "{:<26} {:<20} {:<12} {:<20} {} {}",
        item.id,
        item.reference,
        display_status(item.status),
        or_dash(item.submitted_date.as_deref()),
        item.title,
        docs
    );
}

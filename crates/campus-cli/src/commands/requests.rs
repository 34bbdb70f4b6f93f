use super::or_dash;
use crate::app::AppContext;
use anyhow::Result;
use campus_application::RequestBoard;
use campus_core::request::{NewServiceRequest, Priority, RequestQuery, RequestStatus};
use campus_core::session::Route;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum RequestsAction {
    /// List your requests
    List {
        /// Backend status filter (pending, approved, rejected, ...)
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Submit a new request
    New {
        /// Request type, e.g. certificate or bus_pass
        #[arg(long = "type")]
        request_type: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high or urgent
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| format!("unknown priority '{raw}'"))
}

pub async fn run(ctx: &AppContext, action: RequestsAction) -> Result<()> {
    ctx.require(Route::Requests)?;
    let mut board = RequestBoard::new(ctx.api());

    match action {
        RequestsAction::List {
            status,
            page,
            page_size,
        } => {
            let query = RequestQuery {
                page,
                page_size,
                status_filter: status,
                ..RequestQuery::default()
            };
            board.load(query).await?;
            print_board(&board);
        }
        RequestsAction::New {
            request_type,
            title,
            description,
            priority,
        } => {
            let created = board
                .submit(NewServiceRequest {
                    request_type,
                    title,
                    description,
                    priority,
                    request_data: None,
                })
                .await?;
            println!(
                "Created {} ({})",
                or_dash(created.request_number.as_deref()),
                created.id
            );
        }
    }
    Ok(())
}

fn print_board(board: &RequestBoard) {
    if board.requests().is_empty() {
        println!("No requests.");
        return;
    }
    for request in board.visible() {
        println!(
            "{:<8} {:<16} {:<12} {:<14} {}",
            request.id,
            or_dash(request.request_number.as_deref()),
            display_status(request.status),
            request.request_type,
            request.title
        );
    }
    let query = board.query();
    println!(
        "page {} ({} per page), {} total",
        query.page, query.page_size, board.total()
    );
}

pub(crate) fn display_status(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "Pending",
        RequestStatus::Approved => "Approved",
        RequestStatus::Rejected => "Rejected",
        RequestStatus::NeedsAction => "Needs action",
        RequestStatus::InProgress => "In progress",
        RequestStatus::Unknown => "Unknown",
    }
}

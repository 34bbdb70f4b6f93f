use anyhow::Result;
use campus_core::PortalError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;
mod logging;

use app::AppContext;
use commands::{admin, auth, chat, notifications, requests, scholarship};

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus Portal - service requests, scholarships and notifications", long_about = None)]
struct Cli {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Also print info-level logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(auth::LoginArgs),
    /// Clear the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Exchange the refresh token for a new token pair
    Refresh,
    /// Generic service requests
    Requests {
        #[command(subcommand)]
        action: requests::RequestsAction,
    },
    /// Scholarship applications and their documents
    Scholarship {
        #[command(subcommand)]
        action: scholarship::ScholarshipAction,
    },
    /// Notification feed
    Notifications {
        #[command(subcommand)]
        action: notifications::NotificationsAction,
    },
    /// Admin review queues
    Admin {
        #[command(subcommand)]
        action: admin::AdminAction,
    },
    /// Ask the portal assistant
    Chat(chat::ChatArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match AppContext::bootstrap(cli.config_dir.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("campus: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(ctx.paths(), &ctx.config().log_level, cli.verbose);

    match run(cli.command, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("[Cli] Command failed: {:#}", e);
            match e.downcast_ref::<PortalError>() {
                Some(portal) => eprintln!("error: {}", portal.user_message()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Login(args) => auth::login(ctx, args).await,
        Commands::Logout => auth::logout(ctx),
        Commands::Whoami => auth::whoami(ctx),
        Commands::Refresh => auth::refresh(ctx).await,
        Commands::Requests { action } => requests::run(ctx, action).await,
        Commands::Scholarship { action } => scholarship::run(ctx, action).await,
        Commands::Notifications { action } => notifications::run(ctx, action).await,
        Commands::Admin { action } => admin::run(ctx, action).await,
        Commands::Chat(args) => chat::run(ctx, args).await,
    }
}

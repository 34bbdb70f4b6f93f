use super::{prompt, prompt_secret};
use crate::app::AppContext;
use anyhow::Result;
use campus_core::session::Credentials;
use clap::Args;

const PASSWORD_ENV: &str = "CAMPUS_PORTAL_PASSWORD";

#[derive(Args)]
pub struct LoginArgs {
    /// Account name
    #[arg(short, long)]
    username: Option<String>,

    /// Password; falls back to CAMPUS_PORTAL_PASSWORD, then a prompt
    #[arg(short, long)]
    password: Option<String>,
}

pub async fn login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(name) => name,
        None => prompt("Username: ")?,
    };
    let password = match args
        .password
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
    {
        Some(password) => password,
        None => prompt_secret("Password: ")?,
    };

    let credentials = Credentials { username, password };
    let landing = ctx.auth().sign_in(ctx.api().as_ref(), &credentials).await?;

    if let Some(user) = ctx.auth().current_user() {
        println!("Welcome, {}!", user.display_name());
    }
    println!("Landing page: {}", landing.path());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth().logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.auth().session();
    match session.user.filter(|_| session.is_authenticated) {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("username: {}", user.username);
            println!("role:     {:?}", user.role);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn refresh(ctx: &AppContext) -> Result<()> {
    ctx.auth().refresh(ctx.api().as_ref()).await?;
    println!("Session renewed.");
    Ok(())
}

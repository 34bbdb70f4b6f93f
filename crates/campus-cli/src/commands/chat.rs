use super::Prompter;
use crate::app::AppContext;
use anyhow::Result;
use campus_application::ChatPanel;
use campus_core::session::Route;
use clap::Args;

#[derive(Args)]
pub struct ChatArgs {
    /// Message to send; without it an interactive session starts
    message: Option<String>,

    /// Knowledge context, e.g. general or scholarship
    #[arg(long, default_value = "general")]
    context_type: String,

    #[arg(long, default_value = "")]
    context_name: String,

    #[arg(long, default_value = "english")]
    language: String,

    /// Ask about a specific request
    #[arg(long)]
    request: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ChatArgs) -> Result<()> {
    ctx.require(Route::Chat)?;

    let mut panel = ChatPanel::new(ctx.api())
        .with_context(args.context_type, args.context_name)
        .with_language(args.language);
    if let Some(request_id) = args.request {
        panel = panel.for_request(request_id);
    }

    if let Some(message) = args.message {
        let reply = panel.send(&message).await?;
        println!("{}", reply.text);
        return Ok(());
    }

    println!("Type a question, or an empty line to quit.");
    let mut prompter = Prompter::new()?;
    while let Some(line) = prompter.line("you> ")? {
        if line.trim().is_empty() {
            break;
        }
        match panel.send(&line).await {
            Ok(reply) => println!("assistant> {}", reply.text),
            Err(e) => eprintln!("error: {}", e.user_message()),
        }
    }
    Ok(())
}

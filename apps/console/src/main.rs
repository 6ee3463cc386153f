use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{HttpBouncerClient, InteractionController};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod input;
mod presenter;
mod session;

use presenter::{format_score, ConsolePresenter};
use session::run_session;

#[derive(Parser, Debug)]
#[command(name = "bouncer", about = "Decide who gets past the robot at the door")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Give up on a request to the judging service after this many seconds.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// End the session after this many judged decisions.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut client = HttpBouncerClient::new(&args.server_url)?;
    if let Some(secs) = args.request_timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs))?;
    }
    let client = Arc::new(client);
    let presenter = Arc::new(ConsolePresenter::new(std::io::stdout()));
    let controller = InteractionController::new(client.clone(), client, presenter.clone());

    let score = run_session(
        &controller,
        &*presenter,
        BufReader::new(tokio::io::stdin()),
        args.rounds,
    )
    .await?;
    println!("Final score: {}", format_score(score));

    Ok(())
}

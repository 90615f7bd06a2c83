//! Paint Agent - CLI Entry Point
//!
//! Prompts for the input string and recipient, then runs the agent loop.

use std::io::{self, Write};

use paint_agent::agent::{Agent, TaskRequest};
use paint_agent::config::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paint_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    let input = prompt_line("Enter a string to calculate its ASCII exponential sum: ")?;
    let input = if input.is_empty() {
        info!("Using default input: 'Hello World'");
        "Hello World".to_string()
    } else {
        input
    };

    let recipient = prompt_line("Enter the recipient email address for the visualization: ")?;
    let recipient = if recipient.is_empty() {
        info!("No recipient given, sending to {}", config.mail.address);
        config.mail.address.clone()
    } else {
        recipient
    };

    let request = TaskRequest { input, recipient };
    let agent = Agent::new(config);

    let report = agent.run_task(&request).await?;

    println!("\n=== Agent run complete ({} steps) ===", report.steps_used);
    println!("{}", report.summary);

    Ok(())
}

fn prompt_line(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

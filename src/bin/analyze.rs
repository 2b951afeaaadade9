//! One-shot analysis from the command line.
//!
//! ```text
//! analyze --chain solana --mint <address>
//! ```
//!
//! Prints the same JSON body the HTTP endpoint returns and exits non-zero
//! unless the status is 200.

use token_analyzer::config::Config;
use token_analyzer::{Analyzer, Providers};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn arg_value(args: &[String], long: &str, short: &str) -> Option<String> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the JSON body
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let chain = arg_value(&args, "--chain", "-c").unwrap_or_default();
    let mint = arg_value(&args, "--mint", "-m").unwrap_or_default();

    let config = Config::load()?;
    let analyzer = Analyzer::new(Providers::from_config(&config.providers)?);

    let output = analyzer.analyze(&chain, &mint).await;
    println!("{}", serde_json::to_string_pretty(&output.body)?);

    if output.status != 200 {
        std::process::exit(1);
    }
    Ok(())
}

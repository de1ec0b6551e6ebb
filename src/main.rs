use anyhow::Result;
use clap::Parser;
use hiring_chat::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hiring_chat=info,rocket=warn"));

    if cli.log_json {
        Registry::default()
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .with(filter)
            .init();
    } else {
        Registry::default()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    handle_command(cli.command).await
}

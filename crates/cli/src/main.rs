use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_kernel::settings::Settings;

/// Bookstore catalog command line
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations, then serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print every documented route
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "bookstore CLI starting");

    match cli.command {
        Command::Serve => bookstore_app::serve(&settings).await,
        Command::Migrate => {
            let applied = bookstore_app::migrate(&settings).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Routes => {
            for route in bookstore_app::route_table().await? {
                println!("{route}");
            }
            Ok(())
        }
    }
}

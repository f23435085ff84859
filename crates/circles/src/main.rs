use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use circles::config::Config;
use circles::controllers::{ApiGatewayEvent, Controllers, Route};
use circles::storage::dynamodb::{create_client, target_display, DynamoDbTable};
use circles::storage::inmemory::InMemoryTable;
use circles::storage::{Table, TableRepository};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Circles - Users and the circles they belong to
#[derive(Parser, Debug)]
#[command(name = "circles")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one controller against an API Gateway proxy event
    Invoke {
        /// Controller to run
        #[arg(value_enum)]
        route: Route,

        /// File holding the event as JSON, `-` for stdin. Defaults to an empty event.
        #[arg(long, short)]
        event: Option<PathBuf>,

        /// Use a fresh in-memory table instead of DynamoDB
        #[arg(long)]
        in_memory: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    match cli.command {
        Command::Invoke {
            route,
            event,
            in_memory,
        } => {
            let event = read_event(event.as_ref())?;
            let config = Config::from_env();

            let response = if in_memory {
                tracing::info!("Using in-memory table");
                invoke(InMemoryTable::new(), &config, route, event).await
            } else {
                tracing::info!(
                    target_table = %config.table_name,
                    "Connecting to {}",
                    target_display(&config)
                );
                let client = create_client(&config).await;
                invoke(DynamoDbTable::from_config(client, &config), &config, route, event).await
            };

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "circles=info,circles_core=info".into());

    // Lambda log groups expect one JSON object per line.
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_event(path: Option<&PathBuf>) -> Result<ApiGatewayEvent> {
    let raw = match path {
        None => return Ok(ApiGatewayEvent::default()),
        Some(path) if path.as_os_str() == "-" => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            raw
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event from {}", path.display()))?,
    };

    serde_json::from_str(&raw).context("Event is not a valid API Gateway proxy event")
}

async fn invoke<T: Table + 'static>(
    table: T,
    config: &Config,
    route: Route,
    event: ApiGatewayEvent,
) -> circles::controllers::ApiGatewayResponse {
    let repository = Arc::new(TableRepository::new(table));
    let controllers = Controllers::new(repository.clone(), repository, config.root_uri.clone());

    controllers.dispatch(route, event).await
}

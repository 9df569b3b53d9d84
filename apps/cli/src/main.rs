use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use chore_core::{ChoreController, ChoreEvent, OpStatus};
use shared::domain::Chore;
use store::{ChoreStore, HttpChoreStore, MemoryChoreStore};

mod config;

#[derive(Parser, Debug)]
#[command(name = "chores", about = "Manage the household chore list")]
struct Args {
    /// Document-store service base URL. Without it the in-memory store is
    /// used and data does not outlive the process.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    collection: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a chore by name (4 characters minimum)
    Add { name: String },
    /// Fetch and print the full chore list
    List,
    /// Delete the first chore matching the given name
    Delete { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = Some(server_url);
    }
    if let Some(collection) = args.collection {
        settings.collection = collection;
    }

    let store: Arc<dyn ChoreStore> = match &settings.server_url {
        Some(server_url) => {
            info!(server_url = %server_url, collection = %settings.collection, "chores: using document-store service");
            Arc::new(HttpChoreStore::with_collection(
                server_url.clone(),
                settings.collection.clone(),
            ))
        }
        None => {
            info!("chores: no server_url configured, using in-memory store");
            Arc::new(MemoryChoreStore::new())
        }
    };

    let controller = ChoreController::start(store).await;

    match args.command {
        Command::Add { name } => {
            controller
                .handle_event(ChoreEvent::NameEdited(name))
                .await;
            controller.handle_event(ChoreEvent::SaveClicked).await;
        }
        Command::List => controller.handle_event(ChoreEvent::RefreshClicked).await,
        Command::Delete { name } => {
            controller
                .handle_event(ChoreEvent::ItemDeleted(Chore::new(name)))
                .await;
        }
    }

    let state = controller.snapshot();
    if !state.error_message.is_empty() {
        eprintln!("error: {}", state.error_message);
    }
    if state.upload_status == OpStatus::Failure || state.download_status == OpStatus::Failure {
        std::process::exit(1);
    }

    println!("All chores ({}):", state.chores.len());
    for chore in &state.chores {
        println!("  - {}", chore.name);
    }

    Ok(())
}

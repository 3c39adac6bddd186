//! Frontdesk application binary - composition root.
//!
//! Ties together all Frontdesk crates into a single executable:
//! 1. Resolve configuration (CLI args > env vars > config file > defaults)
//! 2. Open the SQLite document store
//! 3. Construct the service graph (completion client, dispatcher, engines)
//! 4. Optionally seed the knowledge base
//! 5. Start the background timeout sweep
//! 6. Start the axum REST API server

mod cli;
mod seed;
mod sweep;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use frontdesk_agent::ConversationOrchestrator;
use frontdesk_api::{start_server, AppState};
use frontdesk_core::config::FrontdeskConfig;
use frontdesk_core::error::Result;
use frontdesk_escalation::HelpRequestEngine;
use frontdesk_knowledge::KnowledgeEngine;
use frontdesk_llm::{CompletionClient, HttpCompletionClient};
use frontdesk_notify::{LogSink, NotificationDispatcher};
use frontdesk_store::{DocumentStore, SqliteStore};

use cli::{expand_home, CliArgs};
use sweep::SweepTask;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let mut config = FrontdeskConfig::load_or_default(&config_path);

    // Env-sourced secrets never live in the config file.
    if let Ok(key) = std::env::var("FRONTDESK_COMPLETION_API_KEY") {
        config.completion.api_key = key;
    }
    if let Ok(url) = std::env::var("FRONTDESK_COMPLETION_URL") {
        config.completion.url = url;
    }

    let port = args.resolve_port(config.general.port);
    let store_path = args.resolve_store_path(&config.store.path);
    let log_level = args.resolve_log_level(&config.general.log_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!(
        environment = %config.general.environment,
        port,
        "Frontdesk starting up"
    );

    // Storage.
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteStore::open(&expand_home(&store_path))?);

    // External capabilities.
    let completion: Arc<dyn CompletionClient> =
        Arc::new(HttpCompletionClient::new(&config.completion)?);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(LogSink::new()),
        config.escalation.notification_retry,
    ));

    // Engines, constructed once and shared by handle.
    let knowledge = Arc::new(KnowledgeEngine::new(
        Arc::clone(&store),
        Arc::clone(&completion),
    ));
    let escalation = Arc::new(HelpRequestEngine::new(
        Arc::clone(&store),
        dispatcher,
        Arc::clone(&knowledge),
        config.escalation.timeout_secs,
    ));
    let agent = Arc::new(ConversationOrchestrator::new(
        Arc::clone(&knowledge),
        Arc::clone(&escalation),
        completion,
        Arc::clone(&store),
        config.agent.clone(),
    ));

    if args.seed {
        seed::seed_knowledge(&knowledge).await?;
    }

    // Background timeout sweep.
    let sweep = Arc::new(SweepTask::new(
        Arc::clone(&escalation),
        config.escalation.sweep_interval_secs,
    ));
    let sweep_handle = {
        let sweep = Arc::clone(&sweep);
        tokio::spawn(async move { sweep.run().await })
    };

    // HTTP surface. Ctrl-C stops the server, then the sweep.
    let state = AppState::new(escalation, knowledge, agent);
    let serve = start_server(state, &config.general.host, port);
    tokio::select! {
        result = serve => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    sweep.shutdown();
    let _ = sweep_handle.await;
    tracing::info!("Frontdesk shut down");
    Ok(())
}

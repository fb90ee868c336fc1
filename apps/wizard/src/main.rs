mod collaborators;
mod config;
mod errors;
mod extract;
mod models;
mod plan;
mod routes;
mod state;
mod store;
mod wizard;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::collaborators::HttpCollaborators;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::wizard::{WizardController, WizardView};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting roadmap wizard v{}", env!("CARGO_PKG_VERSION"));

    // Persisted store
    let store: Box<dyn KeyValueStore> = match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path)?;
            info!("Persisting wizard state to {}", store.path().display());
            Box::new(store)
        }
        None => {
            info!("STORE_PATH not set; wizard state is kept in memory only");
            Box::new(MemoryStore::new())
        }
    };

    // Remote collaborators
    let collaborators = Arc::new(HttpCollaborators::new(
        config.collaborator_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    info!("Collaborators at {}", config.collaborator_base_url);

    let wizard = Arc::new(WizardController::rehydrate(store, collaborators));
    tokio::spawn(log_transitions(wizard.subscribe()));

    let state = AppState {
        wizard,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Logs every status or step change published by the wizard.
async fn log_transitions(mut updates: watch::Receiver<WizardView>) {
    let mut last = {
        let view = updates.borrow_and_update();
        (view.status, view.step)
    };
    while updates.changed().await.is_ok() {
        let current = {
            let view = updates.borrow_and_update();
            (view.status, view.step)
        };
        if current != last {
            info!("Wizard is now {:?} at step {:?}", current.0, current.1);
            last = current;
        }
    }
}

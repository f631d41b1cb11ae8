use std::process;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};

use customers::config::{init_config, LoggingConfig};
use customers::server::{
    build_router, shutdown_signal, AppState, AuthState, CustomerStore, Database,
};

fn init_tracing(logging: &LoggingConfig) {
    if !logging.enabled {
        return;
    }

    let level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() {
    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    init_tracing(&config.logging);

    if config.auth.uses_default_token() {
        warn!("Using the built-in shared secret; set CUSTOMERS_AUTH_TOKEN to replace it");
    }

    // Nothing is served until the database is reachable and the table exists.
    let db = match Database::connect(&config.database.url).await {
        Ok(db) => db,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = db.ensure_schema().await {
        error!("{e}");
        process::exit(1);
    }

    let store: Arc<dyn CustomerStore> = db.clone();
    let state = AppState::new(store, AuthState::from_config(&config.auth));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            process::exit(1);
        }
    };

    info!(backend = db.kind(), "Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
    }

    db.close().await;
    info!("Database connections closed");
}

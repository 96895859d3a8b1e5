use std::sync::Arc;

use tracing::{error, info};

use ephemail::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = ephemail::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        ephemail::logging::init_console_only(&config.logging.level);
    }

    info!("ephemail - disposable mailbox service");
    info!(
        "Serving mailboxes under @{} on {}:{}",
        config.mailbox.domain, config.web.host, config.web.port
    );

    // An unreachable store is the one fatal startup condition
    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let server = WebServer::new(&config, db);
    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        std::process::exit(1);
    }
}

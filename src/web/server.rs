//! Web server for the ephemail API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::Database;
use crate::sweep::RetentionSweeper;

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed browser origins.
    allowed_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Arc<Database>) -> Self {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .expect("Invalid web server address");

        Self {
            addr,
            app_state: Arc::new(AppState::new(db, config)),
            allowed_origins: config.web.allowed_origins.clone(),
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server.
    ///
    /// The retention sweeper is started as a background task once the
    /// listener is bound; it runs on its own timer, independent of request
    /// handling.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = create_router(self.app_state.clone(), &self.allowed_origins)
            .merge(create_health_router());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        let sweeper = RetentionSweeper::new(
            self.app_state.db.clone(),
            &self.app_state.retention_config,
        );
        tokio::spawn(async move { sweeper.run().await });

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_server_addr() {
        let mut config = Config::default();
        config.web.host = "127.0.0.1".to_string();
        config.web.port = 0;

        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let server = WebServer::new(&config, db);
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }
}

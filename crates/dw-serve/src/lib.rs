pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod signature;

#[cfg(test)]
mod testing;

use axum::Router;
use dw_core::error::ConfigError;
use dw_core::settings::Settings;
use dw_core::{GithubApi, Watcher};
use dw_github::GithubClient;
use std::sync::Arc;
use tokio::net::TcpListener;

pub type SharedWatcher = Arc<Watcher<Arc<dyn GithubApi>>>;

#[derive(Clone)]
pub struct AppState {
    pub watcher: SharedWatcher,
    pub webhook_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(api: Arc<dyn GithubApi>, settings: &Settings) -> Self {
        let watcher = Watcher::new(api, settings.bot_login.clone())
            .with_config_path(settings.repo_config_path.clone());
        Self {
            watcher: Arc::new(watcher),
            webhook_secret: settings.webhook_secret.as_deref().map(Arc::from),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let client = GithubClient::from_settings(settings)?;
        Ok(Self::new(Arc::new(client), settings))
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    if state.webhook_secret.is_none() {
        tracing::warn!("no webhook secret configured; deliveries are not authenticated");
    }
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening for webhooks");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

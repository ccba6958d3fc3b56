use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::manager::CustomerManager;
use crate::responses::error_response;
use crate::router::{handle, AppState};
use astra::Server;
use chrono::Utc;
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod manager;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => e.exit(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    let auth = match cfg.auth_settings() {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let db = Database::new(cfg.database_path.clone());
    if let Err(e) = init_db(&db, &cfg.schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    if cfg.seed_demo {
        match CustomerManager::new(db.clone()).seed_demo(Utc::now()) {
            Ok(n) => info!(added = n, "demo seed finished"),
            Err(e) => warn!(error = %e, "demo seed failed"),
        }
    }

    let addr: SocketAddr = match cfg.socket_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, addr = %cfg.socket_addr(), "invalid listen address");
            std::process::exit(2);
        }
    };

    info!(%addr, workers = cfg.max_workers, mode = ?auth.mode, "starting server");

    let state = AppState::new(db, auth);
    let server = Server::bind(&addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => {
            if err.status_code() >= 500 {
                error!(error = %err, "request failed");
            }
            error_response(&err)
        }
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}

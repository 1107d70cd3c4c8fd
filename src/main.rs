// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::{error, info};

use nft_market_server::{api, config::Config, db, logging, state::AppState};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let pool = match db::connect(&config).await {
        Ok(pool) => pool,
        Err(err) => {
            error!(error = %err, "failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = db::ensure_schema(&pool).await {
        error!(error = %err, "failed to bootstrap schema");
        return ExitCode::FAILURE;
    }

    let cors = api::cors_layer(&config.cors_origins);
    let state = AppState::new(pool, &config);
    let app = api::router(state, cors);

    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, address = %config.bind_address(), "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(%addr, "NFT market server listening (docs at /docs)");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}

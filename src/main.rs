use std::sync::Arc;

use chrono::Utc;
use dispatch_board::api;
use dispatch_board::board::seed::{demo_board, roster};
use dispatch_board::board::OrderBoard;
use dispatch_board::config::{Config, LogFormat};
use dispatch_board::error::AppError;
use dispatch_board::render::DisplayOptions;
use dispatch_board::state::{AppState, StateOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    init_tracing(&config);

    let board = if config.seed_demo_data {
        demo_board(Utc::now())?
    } else {
        OrderBoard::new(roster())?
    };
    tracing::info!(
        orders = board.len(),
        drivers = board.drivers().len(),
        "board loaded"
    );

    let state = AppState::new(
        board,
        StateOptions {
            event_buffer_size: config.event_buffer_size,
            ingest_delay: config.ingest_delay,
            ingest_seed: config.ingest_seed,
            notice_ttl: config.notice_ttl,
            display: DisplayOptions {
                locale: config.display_locale,
            },
        },
    );
    let shared_state = Arc::new(state);

    let app = api::rest::router_with_static(shared_state, &config.static_dir);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::new(config.log_level.clone());
    match config.log_format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

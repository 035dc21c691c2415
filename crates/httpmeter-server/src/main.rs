//! httpmeter server
//!
//! - Config: `HTTPMETER_CONFIG` (default `httpmeter.yaml`), `PORT` override
//! - Routes: /health, /ready, /api, /slow, /error, /user/:id, /metrics
//! - Graceful shutdown on Ctrl-C / SIGTERM, readiness drains first

use std::error::Error;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use httpmeter_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "httpmeter-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let path = std::env::var("HTTPMETER_CONFIG").unwrap_or_else(|_| "httpmeter.yaml".into());
    let mut cfg = config::load_or_default(&path)?;
    if let Ok(port) = std::env::var("PORT") {
        config::apply_port_override(&mut cfg, &port)?;
    }
    let listen = cfg.server.listen_addr()?;

    // Registration failures (duplicate names) are fatal here, at startup.
    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, metrics_path = %state.cfg().metrics.path, "httpmeter-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("httpmeter-server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}

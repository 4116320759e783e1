//! # PetHub Binary
//!
//! Assembles the HTTP service from settings and compile-time features.

mod telemetry;
mod wiring;

use anyhow::Context;
use api_adapters::{router, AppState, RouterOptions};
use configs::Settings;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    telemetry::init(&settings.log);

    let ports = wiring::build_ports(&settings).await?;
    let state = AppState::from_ports(ports);
    let app = router(
        state,
        RouterOptions {
            cors_origin: settings.server.cors_origin.clone(),
            body_limit_bytes: settings.server.request_body_limit_bytes,
            uploads: Some((
                settings.media.url_prefix.clone(),
                settings.media.root.clone(),
            )),
        },
    );

    let listener = TcpListener::bind(settings.server.bind_addr())
        .await
        .with_context(|| format!("binding {}", settings.server.bind_addr()))?;
    info!(addr = %listener.local_addr()?, "pethub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("pethub stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}

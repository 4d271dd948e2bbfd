use tracing_subscriber::EnvFilter;

use brawler_host::config::LogFormat;
use brawler_host::{HostConfig, follow_session, spawn_session};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let (config, problems) = HostConfig::load();
    init_tracing(config.log_format);
    for e in &problems {
        tracing::warn!("{e}, ignored");
    }

    tracing::info!("Brawler host starting");

    let (session, mut rx, handle) = match spawn_session(&config) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start session");
            std::process::exit(1);
        },
    };
    if let Err(e) = session.start() {
        tracing::error!(error = %e, "Failed to start match");
        std::process::exit(1);
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    follow_session(&session, &mut rx, shutdown).await;

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Session task failed");
    }
}

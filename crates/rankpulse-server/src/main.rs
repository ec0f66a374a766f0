mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limits, AppState},
    middleware::BearerAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(rankpulse_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = rankpulse_db::PoolConfig::from_app_config(&config);
    let pool = rankpulse_db::connect_pool(&config.database_url, pool_config).await?;
    rankpulse_db::run_migrations(&pool).await?;

    // Without a Google credential the provider-backed endpoints answer
    // 503; history and health stay available.
    let providers = if config.google_access_token.is_some() {
        Some(Arc::new(rankpulse_report::Providers::from_config(&config)?))
    } else {
        tracing::warn!("no google access token configured; provider endpoints disabled");
        None
    };

    let auth =
        BearerAuth::from_env(matches!(config.env, rankpulse_core::Environment::Development))?;
    let app = build_app(AppState { pool, providers }, auth, default_rate_limits());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

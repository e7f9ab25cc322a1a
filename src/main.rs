use std::{net::SocketAddr, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seafood_catalog_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    routes::create_app,
    services::admin_service,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,seafood_catalog_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    let applied = run_migrations(&orm).await?;
    tracing::debug!(statements = applied, "schema up to date");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    let state = AppState::new(orm, config);
    spawn_upload_sweeper(state.clone());

    let app = create_app(state);
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

fn spawn_upload_sweeper(state: AppState) {
    let every = state.config.upload_sweep_interval_secs;
    if every == 0 {
        return;
    }

    tracing::info!(interval_secs = every, "upload sweeper enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(every));
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = admin_service::sweep_uploads(&state).await {
                tracing::warn!(error = %err, "upload sweep failed");
            }
        }
    });
}

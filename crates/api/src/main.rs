use anyhow::Context;

use ems_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ems_observability::init();

    let config = Config::from_env()?;
    let app = ems_api::app::build_app(&config.signing_key, config.token_validity);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;

use garrison_api::config::ApiConfig;
use garrison_api::credentials::InMemoryCredentials;
use garrison_auth::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    garrison_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let mut credentials = InMemoryCredentials::new();
    if let Some(admin) = &config.bootstrap_admin {
        let id = credentials.add_user(admin.username.clone(), admin.password.clone(), Role::ADMIN);
        tracing::info!(username = %admin.username, %id, "seeded bootstrap admin");
    }

    let app = garrison_api::app::build_app(&config, Arc::new(credentials));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, ttl = %config.token_ttl, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

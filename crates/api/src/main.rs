use std::sync::Arc;

use gatekey_api::app::services::AppServices;
use gatekey_api::config::ApiConfig;

#[tokio::main]
async fn main() {
    gatekey_observability::init();

    let config = ApiConfig::from_env();

    let services = Arc::new(AppServices::in_memory(
        &config.jwt_secret,
        config.service.clone(),
    ));
    let app = gatekey_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

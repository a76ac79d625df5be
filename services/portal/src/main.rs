use sea_orm::Database;
use tracing::info;

use portal::config::PortalConfig;
use portal::router::build_router;
use portal::state::AppState;
use portal_auth_types::token::TokenService;
use portal_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing(env!("CARGO_CRATE_NAME"));

    let config = PortalConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_secs);
    let router = build_router(AppState::new(db, tokens));

    let http_addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("portal service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}

use restaurant_auth::config::ServerConfig;
use restaurant_auth::{db, init_tracing, routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing("info,tower_http=info");

    let config = ServerConfig::from_env().expect("invalid server configuration");

    let pool = db::init_pool(&config)
        .await
        .expect("database init failed");
    let state = state::AppState::from_pool(pool);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "restaurant-auth listening");
    axum::serve(listener, app).await.expect("server failed");
}

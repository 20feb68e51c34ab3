use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use trivia_backend::{
    config::{get_config, init_config},
    routes, telemetry, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    telemetry::init_tracing(config.log_format);

    let app_state = AppState::new(config)?;
    info!(
        model = %config.generation_model,
        endpoint = %config.generation_api_url,
        embedding_enabled = config.embedding_enabled,
        "Question generator ready"
    );

    let app = routes::router(app_state, config.public_rps);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

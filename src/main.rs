use ai_relay::config::RelayConfig;
use ai_relay::server::build_router;
use ai_relay::util::{init_tracing, AppState};
use anyhow::Context;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = RelayConfig::from_env().context("invalid relay configuration")?;
    let addr = config.bind_addr();
    let port = config.port;

    tracing::info!(
        chat_url = %config.chat_url,
        responses_url = %config.responses_url,
        vision_model = %config.vision_model,
        image_model = %config.image_model,
        "upstream configured"
    );

    let app = build_router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Unified AI API is running on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

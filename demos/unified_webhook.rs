//! Run a tiny Axum server that accepts Catapult callbacks on `/webhooks`
//! (provider recognized from the payload) and `/webhooks/{provider}`.

use catapult_bridge::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    catapult_bridge::logging::init(&config.logging)?;

    let app = router(AppState {
        registry: config.registry(),
    });

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

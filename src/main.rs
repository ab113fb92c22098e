use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contact_intel::api;
use contact_intel::app::AppState;
use contact_intel::model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e.to_string())
    })?;

    let db_pool = web::Data::from(state.db_pool);
    let pipeline = web::Data::from(state.pipeline);
    let review_service = web::Data::from(state.review_service);
    let reprocess_service = web::Data::from(state.reprocess_service);

    tracing::info!("Starting Contact Intel server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(pipeline.clone())
            .app_data(review_service.clone())
            .app_data(reprocess_service.clone())
            .configure(api::artifacts::configure)
            .configure(api::suggestions::configure)
            .configure(api::contacts::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}

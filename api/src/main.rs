//! smsverify service entry point

use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use sv_api::routes;
use sv_api::state::AppState;
use sv_core::{CodeIssuer, RateLimiter, VerificationConfig, Verifier};
use sv_infra::{create_notifier, RedisStore};
use sv_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(bind = %config.server.bind_address(), "starting smsverify service");

    // The service is useless without its store; fail startup loudly
    let store = Arc::new(
        RedisStore::connect(&config.cache)
            .await
            .map_err(io_error)?,
    );
    store.health_check().await.map_err(io_error)?;

    let notifier = create_notifier(&config.sms).map_err(io_error)?;

    let state = web::Data::new(AppState {
        rate_limiter: Arc::new(RateLimiter::new(
            Arc::clone(&store),
            config.rate_limit.clone(),
        )),
        issuer: Arc::new(CodeIssuer::new(
            Arc::clone(&store),
            VerificationConfig::new(config.sms.code_length),
        )),
        verifier: Arc::new(Verifier::new(Arc::clone(&store))),
        notifier,
    });

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(routes::configure::<RedisStore>)
            .default_service(web::route().to(not_found))
    })
    .bind(&bind_address)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    info!(bind = %bind_address, "smsverify service listening");
    server.run().await
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "status": "fail",
        "msg": "the requested resource was not found"
    }))
}

fn io_error(e: impl std::error::Error + Send + Sync + 'static) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e)
}

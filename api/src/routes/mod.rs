//! HTTP routes

pub mod send_code;
pub mod verify_code;

use actix_web::{web, HttpResponse};
use tracing::error;

use sv_core::{CodeStore, DomainError};
use sv_shared::mask_phone;

use crate::dto::ApiResponse;

/// Register all routes
pub fn configure<S: CodeStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(ping))
        .route("/sms/code/send", web::post().to(send_code::send_code::<S>))
        .route(
            "/sms/code/verify",
            web::post().to(verify_code::verify_code::<S>),
        );
}

/// Liveness probe
async fn ping() -> HttpResponse {
    HttpResponse::Ok().json("pong")
}

/// Log a store fault with context and answer with an opaque system error
pub(crate) fn system_error(context: &str, phone: &str, err: DomainError) -> HttpResponse {
    error!(phone = %mask_phone(phone), error = %err, "{}", context);
    HttpResponse::InternalServerError().json(ApiResponse::with_status("system_err", "system error"))
}

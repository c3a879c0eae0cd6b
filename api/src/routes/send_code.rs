//! Handler for POST /sms/code/send

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use tracing::{error, info};
use validator::Validate;

use sv_core::{CodeStore, IdentityKey, OperationClass};
use sv_shared::{is_valid_phone, mask_phone};

use crate::dto::{first_validation_message, ApiResponse, SendCodeRequest};
use crate::routes::system_error;
use crate::state::AppState;

/// Issue a verification code and hand it to the delivery backend.
///
/// Flow: validate input, count the request against the send quota, issue a
/// (code, token) pair, deliver the code. Only the token ever reaches the
/// caller.
pub async fn send_code<S: CodeStore>(
    state: web::Data<AppState<S>>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return HttpResponse::Ok().json(ApiResponse::fail(first_validation_message(&errors)));
    }
    if !is_valid_phone(&request.phone) {
        return HttpResponse::Ok().json(ApiResponse::fail("invalid phone"));
    }

    let identity = IdentityKey::new(&request.phone, &request.template_code);

    match state
        .rate_limiter
        .check_limit(OperationClass::Send, identity)
        .await
    {
        Ok(false) => {}
        Ok(true) => {
            info!(
                phone = %mask_phone(&request.phone),
                template_code = %request.template_code,
                "send code request over limit"
            );
            return HttpResponse::Ok().json(ApiResponse::with_status(
                "limit_control",
                "too many code requests, try again later",
            ));
        }
        Err(e) => return system_error("failed to check send code limit", &request.phone, e),
    }

    let issued = match state.issuer.issue(identity).await {
        Ok(issued) => issued,
        Err(e) => return system_error("failed to generate code and token", &request.phone, e),
    };

    info!(
        phone = %mask_phone(&request.phone),
        template_code = %request.template_code,
        "generated verification code"
    );

    // delivery failure is surfaced to the caller instead of silently dropped
    let params = HashMap::new();
    if let Err(e) = state
        .notifier
        .deliver(&request.phone, &request.template_code, &issued.code, &params)
        .await
    {
        error!(
            phone = %mask_phone(&request.phone),
            template_code = %request.template_code,
            error = %e,
            "failed to deliver verification code"
        );
        return HttpResponse::Ok().json(ApiResponse::fail("failed to deliver verification code"));
    }

    HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "token": issued.token })))
}

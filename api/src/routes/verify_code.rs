//! Handler for POST /sms/code/verify

use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use sv_core::{CodeStore, IdentityKey, OperationClass};
use sv_shared::{is_valid_phone, mask_phone};

use crate::dto::{first_validation_message, ApiResponse, VerifyCodeRequest};
use crate::routes::system_error;
use crate::state::AppState;

/// Run a submitted (token, code) pair through the verification state
/// machine. Mismatch outcomes are ordinary statuses, not errors.
pub async fn verify_code<S: CodeStore>(
    state: web::Data<AppState<S>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return HttpResponse::Ok().json(ApiResponse::fail(first_validation_message(&errors)));
    }
    if !is_valid_phone(&request.phone) {
        return HttpResponse::Ok().json(ApiResponse::fail("invalid phone"));
    }

    let identity = IdentityKey::new(&request.phone, &request.template_code);

    info!(
        phone = %mask_phone(&request.phone),
        template_code = %request.template_code,
        "start to verify code"
    );

    match state
        .rate_limiter
        .check_limit(OperationClass::Verify, identity)
        .await
    {
        Ok(false) => {}
        Ok(true) => {
            info!(
                phone = %mask_phone(&request.phone),
                template_code = %request.template_code,
                "verify attempt over limit"
            );
            return HttpResponse::Ok().json(ApiResponse::with_status(
                "limit_control",
                "too many verify attempts, try again later",
            ));
        }
        Err(e) => return system_error("failed to check verify code limit", &request.phone, e),
    }

    match state
        .verifier
        .verify(identity, &request.token, &request.code)
        .await
    {
        Ok(status) => HttpResponse::Ok().json(ApiResponse::with_status(status.as_str(), "")),
        Err(e) => system_error("failed to verify code", &request.phone, e),
    }
}

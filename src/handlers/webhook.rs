use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::config::PaymentsConfig;
use crate::error::{AppError, AppResult};
use crate::models::IpnPayload;
use crate::services::SubscriptionService;
use crate::utils::verify_ipn_signature;

const SIGNATURE_HEADER: &str = "x-curiopay-sig";

/// Payment provider IPN callback.
///
/// Order of checks is part of the contract: header presence (400), then
/// HMAC over the raw body (401), and only then is the body parsed at all.
/// Business-level misses inside reconciliation are acknowledged no-ops so
/// the provider stops retrying.
#[utoipa::path(
    post,
    path = "/webhook/payments",
    responses(
        (status = 200, description = "Callback acknowledged"),
        (status = 400, description = "Missing signature header"),
        (status = 401, description = "Invalid signature"),
        (status = 500, description = "Verified callback failed during processing")
    ),
    tag = "webhook"
)]
pub async fn payments_webhook(
    req: HttpRequest,
    body: web::Bytes,
    payments: web::Data<PaymentsConfig>,
    subscription_service: web::Data<SubscriptionService>,
) -> AppResult<HttpResponse> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::ValidationError(format!("Missing {SIGNATURE_HEADER} header"))
        })?;

    if !verify_ipn_signature(&payments.ipn_secret, &body, signature) {
        return Err(AppError::SignatureInvalid);
    }

    // Past the signature check every failure is ours to retry: a verified
    // body we cannot read gets a 5xx so the provider redelivers.
    let payload: IpnPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::InternalError(format!("Unreadable IPN body: {e}")))?;

    log::info!(
        "IPN for order {} with status '{}'",
        payload.order_id,
        payload.payment_status
    );

    subscription_service
        .reconcile(&payload.order_id, &payload.payment_status)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook").route("/payments", web::post().to(payments_webhook)));
}

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::get_user_id;
use crate::models::{PrepareOrderRequest, SelectPlanRequest};
use crate::services::SubscriptionService;

#[utoipa::path(
    post,
    path = "/api/v1/subscription/select-plan",
    request_body = SelectPlanRequest,
    responses(
        (status = 200, description = "Plan applied with its default quotas"),
        (status = 400, description = "Paid plans require an order")
    ),
    tag = "subscription",
    security(("bearer_auth" = []))
)]
pub async fn select_plan(
    req: HttpRequest,
    subscription_service: web::Data<SubscriptionService>,
    request: web::Json<SelectPlanRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let user = subscription_service
        .select_plan(user_id, request.into_inner().plan)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": user
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/subscription/prepare-order",
    request_body = PrepareOrderRequest,
    responses(
        (status = 200, description = "Order staged for the payment widget"),
        (status = 400, description = "Starter does not require payment")
    ),
    tag = "subscription",
    security(("bearer_auth" = []))
)]
pub async fn prepare_order(
    req: HttpRequest,
    subscription_service: web::Data<SubscriptionService>,
    request: web::Json<PrepareOrderRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let order = subscription_service
        .prepare_order(user_id, request.into_inner().plan)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": order
    })))
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription")
            .route("/select-plan", web::post().to(select_plan))
            .route("/prepare-order", web::post().to(prepare_order)),
    );
}

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::entities::ContentCategory;
use crate::error::{AppError, AppResult};
use crate::external::GeneratorService;
use crate::handlers::get_user_id;
use crate::models::plan::{Decision, DenyReason, UsageSnapshot, can_consume};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::services::{AuthService, UsageService};

/// Entitlement gate shared by every generation endpoint. Reads only; the
/// charge happens after the upstream call succeeds, so a failed generation
/// never costs quota.
async fn check_entitlement(
    auth_service: &AuthService,
    user_id: i64,
    category: ContentCategory,
) -> AppResult<()> {
    let user = auth_service.get_user_by_id(user_id).await?;
    let usage = UsageSnapshot::from_user(&user);

    match can_consume(&user.plan, &usage, category) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::PlanLocked) => Err(AppError::PlanLocked {
            plan: user.plan.to_string(),
            category: category.to_string(),
        }),
        Decision::Deny(DenyReason::LimitReached) => Err(AppError::QuotaExceeded {
            plan: user.plan.to_string(),
            category: category.to_string(),
        }),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/post",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated post plus remaining quota"),
        (status = 403, description = "Quota spent or category locked"),
        (status = 502, description = "Generator unavailable")
    ),
    tag = "generate",
    security(("bearer_auth" = []))
)]
pub async fn generate_post(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    generator: web::Data<GeneratorService>,
    usage_service: web::Data<UsageService>,
    request: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    check_entitlement(&auth_service, user_id, ContentCategory::Posts).await?;

    let content = generator.generate_post(&request.topic).await?;
    let quota = usage_service
        .increment(user_id, ContentCategory::Posts)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": GenerateResponse { content, quota }
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/image",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated image prompt plus remaining quota"),
        (status = 403, description = "Quota spent or category locked"),
        (status = 502, description = "Generator unavailable")
    ),
    tag = "generate",
    security(("bearer_auth" = []))
)]
pub async fn generate_image(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    generator: web::Data<GeneratorService>,
    usage_service: web::Data<UsageService>,
    request: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    check_entitlement(&auth_service, user_id, ContentCategory::Images).await?;

    let content = generator.generate_image_prompt(&request.topic).await?;
    let quota = usage_service
        .increment(user_id, ContentCategory::Images)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": GenerateResponse { content, quota }
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/script",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated script plus remaining quota"),
        (status = 403, description = "Quota spent or category locked"),
        (status = 502, description = "Generator unavailable")
    ),
    tag = "generate",
    security(("bearer_auth" = []))
)]
pub async fn generate_script(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    generator: web::Data<GeneratorService>,
    usage_service: web::Data<UsageService>,
    request: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    check_entitlement(&auth_service, user_id, ContentCategory::Scripts).await?;

    let content = generator.generate_script(&request.topic).await?;
    let quota = usage_service
        .increment(user_id, ContentCategory::Scripts)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": GenerateResponse { content, quota }
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/agent",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Deployed agent plus remaining quota"),
        (status = 403, description = "Quota spent or category locked"),
        (status = 502, description = "Generator unavailable")
    ),
    tag = "generate",
    security(("bearer_auth" = []))
)]
pub async fn deploy_agent(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    generator: web::Data<GeneratorService>,
    usage_service: web::Data<UsageService>,
    request: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    check_entitlement(&auth_service, user_id, ContentCategory::Agents).await?;

    let content = generator.deploy_agent(&request.topic).await?;
    let quota = usage_service
        .increment(user_id, ContentCategory::Agents)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": GenerateResponse { content, quota }
    })))
}

pub fn generate_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/generate")
            .route("/post", web::post().to(generate_post))
            .route("/image", web::post().to(generate_image))
            .route("/script", web::post().to(generate_script))
            .route("/agent", web::post().to(deploy_agent)),
    );
}

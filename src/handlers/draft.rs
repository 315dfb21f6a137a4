use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::get_user_id;
use crate::models::{CreateDraftRequest, PaginationParams};
use crate::services::DraftService;

#[utoipa::path(
    get,
    path = "/api/v1/drafts",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page, 1-100")
    ),
    responses(
        (status = 200, description = "Drafts, newest first"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "drafts",
    security(("bearer_auth" = []))
)]
pub async fn list_drafts(
    req: HttpRequest,
    draft_service: web::Data<DraftService>,
    params: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let drafts = draft_service.list_drafts(user_id, &params).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": drafts
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts",
    request_body = CreateDraftRequest,
    responses(
        (status = 200, description = "Draft saved with server-assigned id and timestamp"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "drafts",
    security(("bearer_auth" = []))
)]
pub async fn create_draft(
    req: HttpRequest,
    draft_service: web::Data<DraftService>,
    request: web::Json<CreateDraftRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let draft = draft_service.add_draft(user_id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": draft
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{id}",
    params(("id" = i64, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Draft deleted (or was already gone)"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "drafts",
    security(("bearer_auth" = []))
)]
pub async fn delete_draft(
    req: HttpRequest,
    draft_service: web::Data<DraftService>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    draft_service.delete_draft(user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "deleted": true }
    })))
}

pub fn draft_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/drafts")
            .route("", web::get().to(list_drafts))
            .route("", web::post().to(create_draft))
            .route("/{id}", web::delete().to(delete_draft)),
    );
}

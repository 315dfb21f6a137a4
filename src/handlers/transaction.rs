use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::get_user_id;
use crate::models::{NotarizeRequest, PaginationParams, TransactionSearchQuery};
use crate::services::NotaryService;

#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page, 1-100")
    ),
    responses(
        (status = 200, description = "Notarization records, newest first"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn list_transactions(
    req: HttpRequest,
    notary_service: web::Data<NotaryService>,
    params: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let transactions = notary_service.list_transactions(user_id, &params).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": transactions
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions/search",
    params(("q" = String, Query, description = "Substring of a signature or content hash")),
    responses(
        (status = 200, description = "First matching record, newest first"),
        (status = 404, description = "No matching transaction")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn search_transactions(
    req: HttpRequest,
    notary_service: web::Data<NotaryService>,
    query: web::Query<TransactionSearchQuery>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let transaction = notary_service.search(user_id, &query.q).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": transaction
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/transactions/notarize",
    request_body = NotarizeRequest,
    responses(
        (status = 200, description = "Content digest anchored; record appended"),
        (status = 502, description = "Chain RPC unavailable")
    ),
    tag = "transactions",
    security(("bearer_auth" = []))
)]
pub async fn notarize(
    req: HttpRequest,
    notary_service: web::Data<NotaryService>,
    request: web::Json<NotarizeRequest>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let response = notary_service.notarize(user_id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

pub fn transaction_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("", web::get().to(list_transactions))
            .route("/search", web::get().to(search_transactions))
            .route("/notarize", web::post().to(notarize)),
    );
}

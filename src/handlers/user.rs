use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::get_user_id;
use crate::services::{AuthService, UserService};

#[utoipa::path(
    get,
    path = "/api/v1/user/profile",
    responses(
        (status = 200, description = "Profile with plan, usage, and counts"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "user",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    let (user, statistics) = user_service.get_user_profile(user_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "user": user,
            "statistics": statistics
        }
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/account",
    responses(
        (status = 200, description = "Account and owned data deleted"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "user",
    security(("bearer_auth" = []))
)]
pub async fn delete_account(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    let user_id = get_user_id(&req)?;
    auth_service.delete_account(user_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "deleted": true }
    })))
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::get().to(get_profile))
            .route("/account", web::delete().to(delete_account)),
    );
}

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::error::AppResult;
use crate::models::{LoginRequest, RefreshTokenRequest, SignUpRequest};
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created; tokens issued"),
        (status = 400, description = "Invalid email, password, or name")
    ),
    tag = "auth"
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<SignUpRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service.sign_up(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued"),
        (status = 401, description = "Unknown email or wrong password")
    ),
    tag = "auth"
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token issued"),
        (status = 401, description = "Invalid refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service
        .refresh_token(&request.into_inner().refresh_token)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": response
    })))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh)),
    );
}

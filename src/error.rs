use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quota exceeded for {category} on plan {plan}")]
    QuotaExceeded { plan: String, category: String },

    #[error("Category {category} is not available on plan {plan}")]
    PlanLocked { plan: String, category: String },

    #[error("Invalid webhook signature")]
    SignatureInvalid,

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::QuotaExceeded { plan, category } => (
                actix_web::http::StatusCode::FORBIDDEN,
                "LIMIT_REACHED",
                format!("You've used your {category} quota on the {plan} plan"),
            ),
            AppError::PlanLocked { plan, category } => (
                actix_web::http::StatusCode::FORBIDDEN,
                "PLAN_LOCKED",
                format!("Upgrade from {plan} to unlock {category}"),
            ),
            // Keep the body fixed: the response must not help forging signatures.
            AppError::SignatureInvalid => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "SIGNATURE_INVALID",
                "Invalid signature".to_string(),
            ),
            AppError::UpstreamError(msg) => {
                log::error!("Upstream error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

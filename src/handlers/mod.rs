pub mod auth;
pub mod draft;
pub mod generate;
pub mod subscription;
pub mod transaction;
pub mod trends;
pub mod user;
pub mod webhook;

use actix_web::{HttpMessage, HttpRequest};

use crate::error::{AppError, AppResult};

/// The auth middleware parks the caller's id in request extensions;
/// handlers pick it up here.
pub(crate) fn get_user_id(req: &HttpRequest) -> AppResult<i64> {
    req.extensions()
        .get::<i64>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

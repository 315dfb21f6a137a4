use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::external::TrendsService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrendsQuery {
    pub sub: Option<String>,
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/trends",
    params(
        ("sub" = Option<String>, Query, description = "Trend feed, defaults to \"news\""),
        ("limit" = Option<u32>, Query, description = "Item cap, defaults to 20")
    ),
    responses(
        (status = 200, description = "Upstream trend payload, passed through"),
        (status = 502, description = "Trend upstream unavailable")
    ),
    tag = "trends"
)]
pub async fn get_trends(
    trends_service: web::Data<TrendsService>,
    query: web::Query<TrendsQuery>,
) -> AppResult<HttpResponse> {
    let sub = query.sub.as_deref().unwrap_or("news");
    let limit = query.limit.unwrap_or(20).min(100);

    // Browser widgets call this directly; the wildcard CORS header goes on
    // the error path too, otherwise the browser hides the failure.
    match trends_service.fetch(sub, limit).await {
        Ok(payload) => Ok(HttpResponse::Ok()
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .json(payload)),
        Err(e) => {
            log::error!("Trend fetch for '{sub}' failed: {e}");
            Ok(HttpResponse::BadGateway()
                .insert_header(("Access-Control-Allow-Origin", "*"))
                .json(json!({
                    "success": false,
                    "error": {
                        "code": "UPSTREAM_UNAVAILABLE",
                        "message": "Trend upstream unavailable"
                    }
                })))
        }
    }
}

pub fn trends_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/trends", web::get().to(get_trends));
}

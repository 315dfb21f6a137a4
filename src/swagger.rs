use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::user::get_profile,
        handlers::user::delete_account,
        handlers::subscription::select_plan,
        handlers::subscription::prepare_order,
        handlers::generate::generate_post,
        handlers::generate::generate_image,
        handlers::generate::generate_script,
        handlers::generate::deploy_agent,
        handlers::draft::list_drafts,
        handlers::draft::create_draft,
        handlers::draft::delete_draft,
        handlers::transaction::list_transactions,
        handlers::transaction::search_transactions,
        handlers::transaction::notarize,
        handlers::trends::get_trends,
        handlers::webhook::payments_webhook,
    ),
    components(schemas(
        SignUpRequest,
        LoginRequest,
        RefreshTokenRequest,
        UserResponse,
        UserStatistics,
        AuthResponse,
        SelectPlanRequest,
        PrepareOrderRequest,
        PrepareOrderResponse,
        GenerateRequest,
        GeneratedPost,
        GeneratedImagePrompt,
        GeneratedScript,
        DeployedAgent,
        ScriptLine,
        DraftContent,
        CreateDraftRequest,
        DraftResponse,
        NotarizeRequest,
        NotarizeResponse,
        TransactionResponse,
        ConfirmationStatus,
        Quota,
        UsageSnapshot,
        PaginationParams,
        crate::entities::PlanId,
        crate::entities::ContentCategory,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and token refresh"),
        (name = "user", description = "Profile and account lifecycle"),
        (name = "subscription", description = "Plan selection and paid upgrades"),
        (name = "generate", description = "Quota-gated content generation"),
        (name = "drafts", description = "Saved generation results"),
        (name = "transactions", description = "On-chain notarization log"),
        (name = "trends", description = "Public trend feed proxy"),
        (name = "webhook", description = "Payment provider callbacks"),
    ),
    info(
        title = "CurioGrid API",
        description = "Entitlement, usage ledger, and content backend for CurioGrid",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_config(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

use actix_web::{App, HttpServer, middleware::Logger, web};
use std::io::Write;
use std::sync::Arc;

use curiogrid_backend::config::Config;
use curiogrid_backend::database;
use curiogrid_backend::external::{ChainService, GeneratorService, TrendsService};
use curiogrid_backend::handlers;
use curiogrid_backend::middlewares::{AuthMiddleware, create_cors};
use curiogrid_backend::services::{
    AuthService, DraftService, NotaryService, SubscriptionService, UsageService, UserService,
};
use curiogrid_backend::swagger;
use curiogrid_backend::tasks;
use curiogrid_backend::utils::JwtService;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                serde_json::json!({
                    "ts": chrono::Utc::now().to_rfc3339(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                })
            )
        })
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = Config::from_toml()
        .map_err(|e| std::io::Error::other(format!("Failed to load config: {e}")))?;

    let pool = database::create_pool(&config.database)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    database::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;
    log::info!("Database ready");
    let pool = Arc::new(pool);

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let generator = GeneratorService::new(config.generator.clone());
    let chain = ChainService::new(config.chain.clone());
    let trends = TrendsService::new(config.trends.clone());

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone());
    let usage_service = UsageService::new(pool.clone());
    let subscription_service = SubscriptionService::new(pool.clone());
    let draft_service = DraftService::new(pool.clone());
    let notary_service = NotaryService::new(pool.clone(), chain);

    tasks::spawn_all(subscription_service.clone());

    let bind_addr = (config.server.host.clone(), config.server.port);
    let payments_config = config.payments.clone();

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(usage_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(draft_service.clone()))
            .app_data(web::Data::new(notary_service.clone()))
            .app_data(web::Data::new(generator.clone()))
            .app_data(web::Data::new(trends.clone()))
            .app_data(web::Data::new(payments_config.clone()))
            .configure(swagger::swagger_config)
            .configure(handlers::webhook::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth::auth_config)
                    .configure(handlers::user::user_config)
                    .configure(handlers::subscription::subscription_config)
                    .configure(handlers::generate::generate_config)
                    .configure(handlers::draft::draft_config)
                    .configure(handlers::transaction::transaction_config)
                    .configure(handlers::trends::trends_config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}

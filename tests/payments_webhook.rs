//! Wire contract of the payment IPN endpoint: the signature header and
//! HMAC checks come before any parsing, and once a body is verified every
//! failure is server-side so the provider keeps retrying.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use sea_orm::{DatabaseBackend, MockDatabase};

use curiogrid_backend::config::PaymentsConfig;
use curiogrid_backend::entities::users;
use curiogrid_backend::handlers::webhook::webhook_config;
use curiogrid_backend::services::SubscriptionService;
use curiogrid_backend::utils::sign_ipn_body;

const SECRET: &str = "ipn-test-secret";
const SIG_HEADER: &str = "x-curiopay-sig";

async fn post_webhook(
    db: MockDatabase,
    body: &'static str,
    signature: Option<String>,
) -> StatusCode {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(PaymentsConfig {
                ipn_secret: SECRET.to_string(),
            }))
            .app_data(web::Data::new(SubscriptionService::new(
                db.into_connection(),
            )))
            .configure(webhook_config),
    )
    .await;

    let mut req = test::TestRequest::post()
        .uri("/webhook/payments")
        .set_payload(body);
    if let Some(sig) = signature {
        req = req.insert_header((SIG_HEADER, sig));
    }

    test::call_service(&app, req.to_request()).await.status()
}

#[actix_web::test]
async fn missing_signature_header_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let status = post_webhook(db, r#"{"payment_status":"finished","order_id":"ord_1"}"#, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wrong_signature_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let body = r#"{"payment_status":"finished","order_id":"ord_1"}"#;
    let forged = sign_ipn_body("some-other-secret", body.as_bytes());
    let status = post_webhook(db, body, Some(forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn verified_but_unreadable_body_is_a_server_error() {
    // A correctly signed delivery that got truncated in transit must not
    // get a 4xx, which would stop the provider from redelivering.
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let body = "definitely-not-json";
    let sig = sign_ipn_body(SECRET, body.as_bytes());
    let status = post_webhook(db, body, Some(sig)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn non_final_status_is_acknowledged() {
    // No query or exec results are queued; any store access would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let body = r#"{"payment_status":"waiting","order_id":"ord_1"}"#;
    let sig = sign_ipn_body(SECRET, body.as_bytes());
    let status = post_webhook(db, body, Some(sig)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn finished_callback_for_unknown_order_is_acknowledged() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()]);
    let body = r#"{"payment_status":"finished","order_id":"ord_unknown"}"#;
    let sig = sign_ipn_body(SECRET, body.as_bytes());
    let status = post_webhook(db, body, Some(sig)).await;
    assert_eq!(status, StatusCode::OK);
}

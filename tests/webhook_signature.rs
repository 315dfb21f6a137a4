//! Contract tests for the payment IPN signature scheme: lowercase hex
//! HMAC-SHA-512 over the exact raw body bytes under the shared secret.

use curiogrid_backend::models::IpnPayload;
use curiogrid_backend::utils::{generate_order_id, sign_ipn_body, verify_ipn_signature};

const SECRET: &str = "ipn-test-secret";

fn finished_body(order_id: &str) -> Vec<u8> {
    format!(
        r#"{{"payment_status":"finished","order_id":"{order_id}","price_amount":12.5,"pay_currency":"usdt"}}"#
    )
    .into_bytes()
}

#[test]
fn provider_signed_body_is_accepted() {
    let body = finished_body("ord_0123456789abcdef0123456789abcdef");
    let sig = sign_ipn_body(SECRET, &body);
    assert!(verify_ipn_signature(SECRET, &body, &sig));
}

#[test]
fn signature_is_over_exact_bytes() {
    let body = finished_body("ord_0123456789abcdef0123456789abcdef");
    let sig = sign_ipn_body(SECRET, &body);

    // Even whitespace-only differences must invalidate the signature.
    let mut reformatted = body.clone();
    reformatted.insert(1, b' ');
    assert!(!verify_ipn_signature(SECRET, &reformatted, &sig));
}

#[test]
fn signature_from_another_secret_is_rejected() {
    let body = finished_body("ord_0123456789abcdef0123456789abcdef");
    let sig = sign_ipn_body("some-other-secret", &body);
    assert!(!verify_ipn_signature(SECRET, &body, &sig));
}

#[test]
fn garbage_signatures_are_rejected() {
    let body = finished_body("ord_0123456789abcdef0123456789abcdef");
    assert!(!verify_ipn_signature(SECRET, &body, ""));
    assert!(!verify_ipn_signature(SECRET, &body, "zzzz"));
    // Valid hex of the wrong length.
    assert!(!verify_ipn_signature(SECRET, &body, "deadbeef"));
}

#[test]
fn verified_body_parses_into_ipn_payload() {
    let body = finished_body("ord_0123456789abcdef0123456789abcdef");
    let payload: IpnPayload = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload.payment_status, "finished");
    assert_eq!(payload.order_id, "ord_0123456789abcdef0123456789abcdef");
    assert_eq!(payload.price_amount, Some(12.5));
    assert_eq!(payload.pay_currency.as_deref(), Some("usdt"));
}

#[test]
fn payload_tolerates_extra_provider_fields() {
    let body = br#"{"payment_status":"waiting","order_id":"ord_1","invoice_id":99,"outcome":{"amount":1}}"#;
    let payload: IpnPayload = serde_json::from_slice(body).unwrap();
    assert_eq!(payload.payment_status, "waiting");
    assert!(payload.price_amount.is_none());
}

#[test]
fn order_ids_are_unpredictable_and_well_formed() {
    let a = generate_order_id();
    let b = generate_order_id();
    assert!(a.starts_with("ord_"));
    assert_eq!(a.len(), 4 + 32);
    assert_ne!(a, b);
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::PlanId;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectPlanRequest {
    pub plan: PlanId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrepareOrderRequest {
    pub plan: PlanId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrepareOrderResponse {
    pub order_id: String,
    pub plan: PlanId,
}

/// Body of the payment provider's IPN callback, parsed only after the
/// HMAC signature over the raw body has been verified.
#[derive(Debug, Serialize, Deserialize)]
pub struct IpnPayload {
    pub payment_status: String,
    pub order_id: String,
    #[serde(default)]
    pub price_amount: Option<f64>,
    #[serde(default)]
    pub pay_currency: Option<String>,
}

//! Serverless function trait for the payment-order endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Request body for the payment-order function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrderRequest {
    /// Contribution amount in the community's currency.
    pub amount: f64,
    /// Display name of the contributor.
    pub contributor: String,
    /// Row ID of the pending contribution this order pays for.
    pub contribution_id: i64,
}

/// Response body from the payment-order function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrderResponse {
    /// Session ID to hand to the payment SDK's checkout.
    pub payment_session_id: String,
}

/// The hosted serverless-function surface this client consumes.
///
/// The contract is fire-one-request: hand the session ID to the payment
/// SDK and surface any error verbatim. No retry, no idempotency.
#[async_trait]
pub trait FunctionsApi: Send + Sync + std::fmt::Debug + 'static {
    /// Create a payment order for a pending contribution.
    async fn create_payment_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> AppResult<PaymentOrderResponse>;
}

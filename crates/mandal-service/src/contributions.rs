//! Contribution service: records plus the online payment flow.
//!
//! The online flow is fire-once: insert a pending record, ask the
//! payment-order function for a checkout session, hand the session ID
//! to the payment SDK. No retry, no idempotency; a failed order leaves
//! the pending record behind for reconciliation.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use mandal_core::traits::functions::PaymentOrderRequest;
use mandal_core::traits::{FunctionsApi, RowStore};
use mandal_core::{AppError, AppResult};
use mandal_entity::{Contribution, contribution};

/// Result of starting an online contribution: the stored record and the
/// checkout session to hand to the payment SDK.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHandoff {
    /// The pending contribution row as stored.
    pub contribution: Contribution,
    /// Session ID for the SDK's redirect checkout.
    pub payment_session_id: String,
}

/// Contribution records over the hosted store and payment function.
#[derive(Debug, Clone)]
pub struct ContributionService {
    rows: Arc<dyn RowStore>,
    functions: Arc<dyn FunctionsApi>,
}

impl ContributionService {
    /// A service over the given row store and function host.
    pub fn new(rows: Arc<dyn RowStore>, functions: Arc<dyn FunctionsApi>) -> Self {
        Self { rows, functions }
    }

    /// All contributions, newest first.
    pub async fn list(&self) -> AppResult<Vec<Contribution>> {
        let rows = self.rows.select(&Contribution::list_filter()).await?;
        rows.iter().map(|row| row.decode()).collect()
    }

    /// Record a contribution collected in person.
    pub async fn record_offline(&self, contributor: &str, amount: f64) -> AppResult<Contribution> {
        validate(contributor, amount)?;
        let row = self
            .rows
            .insert(
                contribution::TABLE,
                json!({
                    "contributor": contributor.trim(),
                    "amount": amount,
                    "method": "offline",
                    "status": "completed",
                }),
            )
            .await?;
        row.decode()
    }

    /// Start an online contribution.
    ///
    /// Inserts the pending record first; only then is the payment order
    /// created, so a gateway failure cannot lose the attempt entirely.
    /// Errors from either stage surface with the provider's message.
    pub async fn pay_online(&self, contributor: &str, amount: f64) -> AppResult<PaymentHandoff> {
        validate(contributor, amount)?;
        let row = self
            .rows
            .insert(
                contribution::TABLE,
                json!({
                    "contributor": contributor.trim(),
                    "amount": amount,
                    "method": "online",
                    "status": "pending",
                }),
            )
            .await?;
        let stored: Contribution = row.decode()?;

        let order = self
            .functions
            .create_payment_order(&PaymentOrderRequest {
                amount,
                contributor: stored.contributor.clone(),
                contribution_id: stored.id,
            })
            .await?;
        info!(
            contribution_id = stored.id,
            "Payment order created, handing off to checkout"
        );
        Ok(PaymentHandoff {
            contribution: stored,
            payment_session_id: order.payment_session_id,
        })
    }
}

fn validate(contributor: &str, amount: f64) -> AppResult<()> {
    if contributor.trim().is_empty() {
        return Err(AppError::validation("Contributor name is required"));
    }
    if !(amount > 0.0) {
        return Err(AppError::validation("Amount must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_entity::ContributionStatus;
    use mandal_provider::memory::{MemoryFunctionsApi, MemoryRowStore};

    fn service() -> (Arc<MemoryFunctionsApi>, ContributionService) {
        let rows = Arc::new(MemoryRowStore::new());
        let functions = Arc::new(MemoryFunctionsApi::new());
        let service = ContributionService::new(
            rows as Arc<dyn RowStore>,
            Arc::clone(&functions) as Arc<dyn FunctionsApi>,
        );
        (functions, service)
    }

    #[tokio::test]
    async fn test_pay_online_inserts_pending_then_orders() {
        let (functions, service) = service();
        functions.respond_with("cf_session_1");

        let handoff = service.pay_online("Asha", 501.0).await.unwrap();
        assert_eq!(handoff.payment_session_id, "cf_session_1");
        assert_eq!(handoff.contribution.status, ContributionStatus::Pending);

        let request = functions.last_request().unwrap();
        assert_eq!(request.contribution_id, handoff.contribution.id);
        assert_eq!(request.amount, 501.0);
    }

    #[tokio::test]
    async fn test_gateway_failure_surfaces_verbatim_and_keeps_record() {
        let (functions, service) = service();
        functions.fail_with("Cashfree sandbox credentials are not set");

        let err = service.pay_online("Asha", 501.0).await.unwrap_err();
        assert_eq!(err.message, "Cashfree sandbox credentials are not set");

        // The pending record stays behind for reconciliation.
        let list = service.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].status, ContributionStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected_locally() {
        let (functions, service) = service();
        let err = service.pay_online("Asha", 0.0).await.unwrap_err();
        assert_eq!(err.kind, mandal_core::ErrorKind::Validation);
        assert!(functions.last_request().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (_, service) = service();
        service.record_offline("First", 100.0).await.unwrap();
        service.record_offline("Second", 200.0).await.unwrap();
        let list = service.list().await.unwrap();
        assert_eq!(list[0].contributor, "Second");
    }
}

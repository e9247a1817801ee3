//! In-memory serverless functions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use mandal_core::traits::FunctionsApi;
use mandal_core::traits::functions::{PaymentOrderRequest, PaymentOrderResponse};
use mandal_core::{AppError, AppResult};

/// In-memory [`FunctionsApi`] with scriptable responses.
///
/// Without a script, every order succeeds with a derived session ID.
#[derive(Debug, Default)]
pub struct MemoryFunctionsApi {
    script: Mutex<VecDeque<Result<PaymentOrderResponse, String>>>,
    last_request: Mutex<Option<PaymentOrderRequest>>,
}

impl MemoryFunctionsApi {
    /// A function host that succeeds by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond_with(&self, payment_session_id: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(PaymentOrderResponse {
                payment_session_id: payment_session_id.to_string(),
            }));
    }

    /// Queue a failure with the given provider message.
    pub fn fail_with(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// The most recent request body, for assertions.
    pub fn last_request(&self) -> Option<PaymentOrderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl FunctionsApi for MemoryFunctionsApi {
    async fn create_payment_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> AppResult<PaymentOrderResponse> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(AppError::provider(message)),
            None => Ok(PaymentOrderResponse {
                payment_session_id: format!("session_{}", request.contribution_id),
            }),
        }
    }
}

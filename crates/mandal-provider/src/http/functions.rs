//! Serverless function adapter.

use async_trait::async_trait;
use reqwest::Method;

use mandal_core::config::payment::PaymentConfig;
use mandal_core::traits::FunctionsApi;
use mandal_core::traits::functions::{PaymentOrderRequest, PaymentOrderResponse};
use mandal_core::{AppError, AppResult};

use super::client::ProviderClient;

/// [`FunctionsApi`] implementation over the hosted functions endpoint.
#[derive(Debug)]
pub struct HttpFunctionsApi {
    client: ProviderClient,
    payment: PaymentConfig,
}

impl HttpFunctionsApi {
    /// Build the adapter over a shared provider client.
    pub fn new(client: ProviderClient, payment: PaymentConfig) -> Self {
        Self { client, payment }
    }
}

#[async_trait]
impl FunctionsApi for HttpFunctionsApi {
    async fn create_payment_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> AppResult<PaymentOrderResponse> {
        let url = self
            .client
            .endpoint(&format!("functions/v1/{}", self.payment.order_function));
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))
    }
}

//! Payment gateway configuration.

use serde::{Deserialize, Serialize};

/// Settings for the payment-order serverless function and checkout SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Name of the serverless function that creates payment orders.
    #[serde(default = "default_order_function")]
    pub order_function: String,
    /// Gateway mode: `"sandbox"` or `"production"`.
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            order_function: default_order_function(),
            mode: default_mode(),
        }
    }
}

fn default_order_function() -> String {
    "create-cashfree-order".to_string()
}

fn default_mode() -> String {
    "sandbox".to_string()
}

//! Authentication flow configuration.

use serde::{Deserialize, Serialize};

/// Settings for the authentication flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Federated identity provider used for the redirect flow.
    #[serde(default = "default_federated_provider")]
    pub federated_provider: String,
    /// URL the federated provider redirects back to after consent.
    #[serde(default = "default_redirect_to")]
    pub redirect_to: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            federated_provider: default_federated_provider(),
            redirect_to: default_redirect_to(),
        }
    }
}

fn default_federated_provider() -> String {
    "google".to_string()
}

fn default_redirect_to() -> String {
    "http://localhost:3000/dashboard".to_string()
}

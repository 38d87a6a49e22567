//! API Config

use std::time::Duration;

use clap::Args;

use crate::client::{
    ClientConfig,
    session::{SecretToken, Session},
};

/// Sales backend connection settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the sales backend
    #[arg(long, env = "TORQUE_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TORQUE_API_TIMEOUT_SECS", default_value_t = 30_u64)]
    pub api_timeout_secs: u64,

    /// Path of the stock listing
    #[arg(long, env = "TORQUE_STOCK_PATH", default_value = "/stock")]
    pub stock_path: String,

    /// Path of the counter-sales collection
    #[arg(long, env = "TORQUE_SALES_PATH", default_value = "/counter-sales")]
    pub sales_path: String,

    /// Bearer token for the sales backend
    #[arg(long, env = "TORQUE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Refresh token issued alongside the access token
    #[arg(long, env = "TORQUE_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,
}

impl ApiConfig {
    /// HTTP client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.api_timeout_secs),
            stock_path: self.stock_path.clone(),
            sales_path: self.sales_path.clone(),
        }
    }

    /// A session holding the configured tokens, or an anonymous one.
    #[must_use]
    pub fn session(&self) -> Session {
        let mut session = Session::anonymous();

        if let Some(access) = self.access_token.as_deref().filter(|token| !token.is_empty()) {
            session.login(
                SecretToken::new(access),
                self.refresh_token.as_deref().map(SecretToken::new),
                None,
            );
        }

        session
    }
}

use std::time::Duration;

use reqwest::Client;

use crate::core::PipError;

pub const USER_AGENT: &str = concat!("pipform/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<Client, PipError> {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PipError::Custom(format!("HTTP client build failed: {e}")))
}

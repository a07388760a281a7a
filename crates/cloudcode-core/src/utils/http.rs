//! Shared reqwest client construction.

use reqwest::Client;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const CONNECT_TIMEOUT_SECS: u64 = 20;

/// One client per process; `timeout_secs` bounds a whole request, streams included.
pub fn create_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_nodelay(true)
        .http2_keep_alive_interval(Duration::from_secs(25))
        .http2_keep_alive_timeout(Duration::from_secs(10))
        .http2_keep_alive_while_idle(true)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| AppError::Config(format!("HTTP client builder failed: {}", e)))
}

//! Dashboard HTTP Client - Retrying REST API Client
//!
//! Wraps reqwest with a concurrency limit and exponential-backoff
//! retries for the tipping dashboard's JSON endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the dashboard HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
  /// Base URL of the dashboard backend.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum concurrent requests.
  pub max_concurrent: usize,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for ApiClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://127.0.0.1:8000".to_string(),
      timeout: Duration::from_secs(10),
      max_concurrent: 4,
      max_retries: 3,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

/// HTTP client for the dashboard REST API.
pub struct ApiClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: ApiClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
}

impl ApiClient {
  /// Create a new dashboard client.
  pub fn new(config: ApiClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    Ok(Self {
      http,
      config,
      semaphore,
    })
  }

  /// Full URL for an API path.
  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Execute a GET request with retries.
  pub async fn get(&self, path: &str) -> Result<Response> {
    let request = self.http.get(self.url(path));
    self.execute_with_retry(request, path).await
  }

  /// GET a path and decode its JSON body.
  pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self
      .get(path)
      .await?
      .json::<T>()
      .await
      .with_context(|| format!("Failed to decode response from {path}"))
  }

  /// Execute request with concurrency limiting and retries.
  async fn execute_with_retry(&self, request: RequestBuilder, path: &str) -> Result<Response> {
    let _permit = self
      .semaphore
      .acquire()
      .await
      .context("Semaphore closed")?;

    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt - 1);
        debug!(attempt, delay_ms = delay.as_millis(), path, "Retrying request");
        sleep(delay).await;
      }

      let req = request
        .try_clone()
        .context("Failed to clone request")?;

      match req.send().await {
        Ok(response) => match response.status() {
          status if status.is_success() => return Ok(response),
          StatusCode::TOO_MANY_REQUESTS => {
            warn!(path, "Rate limited by dashboard API, backing off");
            last_error = Some(anyhow::anyhow!("Rate limited"));
          }
          status if status.is_server_error() => {
            warn!(status = %status, path, "Server error, retrying");
            last_error = Some(anyhow::anyhow!("Server error: {status}"));
          }
          status => {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("API error {status} on {path}: {body}"));
          }
        },
        Err(e) => {
          warn!(error = %e, attempt, path, "Request failed");
          last_error = Some(e.into());
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }

  /// Check if the API is reachable with a single request, no retries.
  pub async fn health_check(&self, path: &str) -> bool {
    let Ok(_permit) = self.semaphore.acquire().await else {
      return false;
    };
    match self.http.get(self.url(path)).send().await {
      Ok(response) => response.status().is_success(),
      Err(e) => {
        debug!(error = %e, path, "Health check failed");
        false
      }
    }
  }
}

//! Shared HTTP client for the back-office API.
//!
//! Reads are retried on transport failures (connect, timeout) with a fixed
//! backoff. Writes are sent once; a failed mutation is surfaced to the
//! caller and never replayed.

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::infrastructure::config::ApiConfig;

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    config: ApiConfig,
}

impl ApiClient {
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            config: config.clone(),
        }
    }

    /// Absolute URL for `path` under the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// GET and decode JSON, retrying transport failures.
    pub async fn get_with_retry<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut attempt = 0;
        let max_attempts = self.config.list_retry_attempts.saturating_add(1);

        loop {
            attempt += 1;
            let response = match self.request(Method::GET, &url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = Self::check_status(response).await?;
            match response.json::<T>().await {
                Ok(parsed) => {
                    debug!(url = %url, attempt, "GET succeeded");
                    return Ok(parsed);
                }
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    /// Send a JSON body once and return the successful response.
    pub async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.request(method, &url).json(body).send().await?;
        Self::check_status(response).await
    }

    /// Like [`Self::send_json`], but `404` yields `None` instead of an error.
    pub async fn send_json_if_found<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<Response>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.request(method, &url).json(body).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(response).await.map(Some)
    }

    /// Send a bodiless request once; `404` yields `None`.
    pub async fn send_if_found(&self, method: Method, path: &str) -> Result<Option<Response>> {
        let url = self.url(path);
        let response = self.request(method, &url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(response).await.map(Some)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Remote(format!(
            "{} {}",
            status,
            body.trim().chars().take(200).collect::<String>()
        )))
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        let delay = self.config.retry_backoff();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}


use crate::config::MonitorConfig;
use crate::errors::ScraperError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Instant;

/// Anything that can produce the raw lot page for one cycle.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&mut self) -> Result<String, ScraperError>;
}

pub struct ScraperClient {
    client: Client,
    url: String,
    query: (String, String),
    request_id: u64,
    stats: ScraperClientStats,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScraperClientStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
}

impl ScraperClient {
    /// Create a client for the configured endpoint. The timeout bounds the whole request.
    pub fn new(config: &MonitorConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .default_headers(Self::default_headers(&config.user_agent))
            .timeout(config.timeout)
            .pool_idle_timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            query: config.query.clone(),
            request_id: 0,
            stats: ScraperClientStats::default(),
        })
    }

    fn default_headers(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("lot-monitor"));
        headers.insert(USER_AGENT, value);
        headers
    }

    /// Issue one GET against the endpoint. No retries; the caller decides what a failure means.
    pub async fn fetch(&mut self) -> Result<String, ScraperError> {
        self.request_id += 1;
        debug!("Fetching {} with request ID: {}", self.url, self.request_id);

        let start_time = Instant::now();
        let result = self.send().await;

        match &result {
            Ok(body) => {
                self.record_success();
                debug!(
                    "Fetched {} bytes in {:?}",
                    body.len(),
                    start_time.elapsed()
                );
            }
            Err(e) => {
                self.record_failure();
                debug!("Request {} failed after {:?}: {}", self.request_id, start_time.elapsed(), e);
            }
        }
        self.log_stats();

        result
    }

    async fn send(&self) -> Result<String, ScraperError> {
        let (key, value) = &self.query;
        let response = self
            .client
            .get(&self.url)
            .query(&[(key, value)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::Status {
                status: response.status(),
                url: self.url.clone(),
            });
        }

        Ok(response.text().await?)
    }

    fn record_success(&mut self) {
        self.stats.total_requests += 1;
        self.stats.successful_requests += 1;
    }

    fn record_failure(&mut self) {
        self.stats.total_requests += 1;
        self.stats.failed_requests += 1;
    }

    pub fn stats(&self) -> ScraperClientStats {
        self.stats
    }

    fn log_stats(&self) {
        debug!(
            "Total Requests: {}, Successful: {}, Failed: {}",
            self.stats.total_requests, self.stats.successful_requests, self.stats.failed_requests
        );
    }
}

#[async_trait]
impl PageSource for ScraperClient {
    async fn fetch_page(&mut self) -> Result<String, ScraperError> {
        self.fetch().await
    }
}

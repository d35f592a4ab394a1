use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:61022";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the web gauge API. Cheap to clone; clones share one
/// connection pool.
#[derive(Clone, Debug)]
pub struct GaugeClient {
    client: Client,
    base_url: String,
}

impl GaugeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn value_url(&self, temperature: i64) -> String {
        format!("{}/api/Values/{}", self.base_url, temperature)
    }

    /// `GET {base}/api/Values/{temperature}`. Returns the response status;
    /// only connection level failures are errors.
    pub async fn push_value(&self, temperature: i64) -> Result<StatusCode, reqwest::Error> {
        let response = self.client.get(self.value_url(temperature)).send().await?;
        Ok(response.status())
    }
}

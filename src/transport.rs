use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::http_client::http_client;

/// The HTTP seam between the dispatcher and the backend. Implementations
/// return the raw body for any status; classifying it is the caller's job.
pub trait Transport {
    fn post_json(&self, path: &str, body: &Value) -> Result<String>;
    fn get(&self, path: &str) -> Result<String>;
}

pub struct HttpTransport {
    base_url: String,
    client: &'static Client,
}

impl HttpTransport {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client: http_client(cfg.timeout)?,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<String> {
        let url = self.url(path);
        // Application errors arrive as 4xx/5xx with a JSON body, so the status is not checked.
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        resp.text().context("failed reading body")
    }

    fn get(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        resp.text().context("failed reading body")
    }
}

//! reqwest-backed HTTP transport

use crate::config::ClientConfig;
use crate::ports::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::{ApiError, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

pub struct ReqwestTransport {
    http: ReqwestClient,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "Invalid server URL: {}. URL must start with http:// or https://",
                base_url
            )));
        }

        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} {} -> {}", request.method, request.path, status);

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let transport = ReqwestTransport::new(&ClientConfig::new("https://home.example/api/ ")).unwrap();
        assert_eq!(transport.base_url(), "https://home.example/api");
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let result = ReqwestTransport::new(&ClientConfig::new("home.example"));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}

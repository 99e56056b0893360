//! HTTP transport
//!
//! 薄封装 reqwest：自动附加 Bearer 令牌，网络错误线性退避重试一次，
//! API 错误从不重试。401 走 [`TokenStore::handle_unauthorized`]。

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::TokenStore;

/// 服务端错误响应体
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    code: String,
    detail: String,
}

/// HTTP client with token handling and bounded retry
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    retries: u32,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, tokens: Arc<TokenStore>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            retries: config.retries,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::DELETE, path, None).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let mut req = self.client.request(method.clone(), &url);
            if let Some(token) = self.tokens.access_token() {
                req = req.bearer_auth(token);
            }
            if let Some(body) = &body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(response) => return self.handle_response(response).await,
                Err(e) if attempt <= self.retries && is_transient(&e) => {
                    tracing::debug!(attempt, url = %url, error = %e, "Retrying after network error");
                    tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
                }
                Err(e) => return Err(ClientError::Network(e)),
            }
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.tokens.handle_unauthorized();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => ClientError::Api {
                    status: status.as_u16(),
                    code: body.code,
                    detail: body.detail,
                },
                Err(_) => ClientError::Api {
                    status: status.as_u16(),
                    code: String::new(),
                    detail: text,
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Connection-level failures worth one more attempt
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

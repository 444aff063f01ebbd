//! HTTP implementation of [`ConsoleApi`] on top of the hyper client.
//!
//! Every call is a single JSON request/response exchange bounded by the
//! configured request timeout. There are no retries: callers degrade
//! gracefully instead.

use crate::error::{ApiError, ApiResult};
use crate::wire::{AlertList, JsonTestResult, StreamList};
use crate::ConsoleApi;
use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use lcon_core::config::ServerConfig;
use lcon_core::{Alert, Stream, TrialRequest};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Console API client speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpConsoleApi {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    authorization: Option<HeaderValue>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpConsoleApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConsoleApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.authorization.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpConsoleApi {
    /// Build a client from the `[server]` config section.
    pub fn new(server: &ServerConfig) -> ApiResult<Self> {
        let mut api = Self::with_base_url(&server.base_url, server.request_timeout());
        if let Some(username) = &server.username {
            let password = server.password.as_deref().unwrap_or_default();
            api = api.with_basic_auth(username, password)?;
        }
        Ok(api)
    }

    /// Unauthenticated client for `base_url` (e.g. `http://127.0.0.1:9000/api`).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
            timeout,
        }
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> ApiResult<Self> {
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        let value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| ApiError::InvalidCredentials(e.to_string()))?;
        self.authorization = Some(value);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> ApiResult<T> {
        let body = serde_json::to_vec(body).map_err(ApiError::Encode)?;
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        let url = self.url(path);
        let request = self.build_request(&url, method.clone(), body)?;

        tracing::debug!(%method, %url, "console request");
        let (status, bytes) = tokio::time::timeout(self.timeout, self.exchange(&url, request))
            .await
            .map_err(|_| ApiError::Timeout {
                url: url.clone(),
                timeout: self.timeout,
            })??;

        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "console request rejected");
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
    }

    fn build_request(
        &self,
        url: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> ApiResult<Request<Full<Bytes>>> {
        let invalid = |message: String| ApiError::InvalidRequest {
            url: url.to_string(),
            message,
        };

        let uri: Uri = url
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| invalid(e.to_string()))?;
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACCEPT, "application/json");
        if let Some(auth) = &self.authorization {
            builder = builder.header(AUTHORIZATION, auth.clone());
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };

        builder.body(body).map_err(|e| invalid(e.to_string()))
    }

    async fn exchange(
        &self,
        url: &str,
        request: Request<Full<Bytes>>,
    ) -> ApiResult<(StatusCode, Bytes)> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|source| ApiError::Body {
                url: url.to_string(),
                source,
            })?
            .to_bytes();

        Ok((status, bytes))
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn test_json(&self, request: &TrialRequest) -> ApiResult<JsonTestResult> {
        self.post("/tools/json_tester", request).await
    }

    async fn list_streams(&self) -> ApiResult<Vec<Stream>> {
        let list: StreamList = self.get("/streams").await?;
        Ok(list.streams)
    }

    async fn list_alerts(&self, stream_id: &str, since: i64) -> ApiResult<Vec<Alert>> {
        let stream_id = urlencoding::encode(stream_id);
        let list: AlertList = self
            .get(&format!("/streams/{stream_id}/alerts?since={since}"))
            .await?;
        Ok(list.alerts)
    }

    async fn list_all_alerts(&self, since: i64) -> ApiResult<Vec<Alert>> {
        let list: AlertList = self.get(&format!("/streams/alerts?since={since}")).await?;
        Ok(list.alerts)
    }
}

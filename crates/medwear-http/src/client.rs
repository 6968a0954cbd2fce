//! # API Client
//!
//! Shared HTTP plumbing for the repositories: URL building, request ids,
//! status handling and server message extraction.
//!
//! ## Request Lifecycle
//! ```text
//! repository call
//!      │
//!      ▼
//! endpoint(&["products", id])  ──► base URL + escaped path segments
//!      │
//!      ▼
//! send (mutations carry X-Request-Id)
//!      │
//!      ├── 2xx ──► JSON body (empty body → null)
//!      ├── 404 ──► HttpError::NotFound (lookups turn this into None)
//!      └── else ─► HttpError::Server { status, message from {error|message} }
//! ```
//!
//! There is no retry: a failed request is reported immediately and the
//! caller leaves its state unchanged.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::HttpConfig;
use crate::error::{HttpError, HttpResult};
use crate::repository::{DealRepository, OrderRepository, ProductRepository, SaleRepository};

/// Header carrying the per-request id on mutations.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Handle to the store API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Builds a client with the configured timeouts and user agent.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Config`] for an invalid configuration
    /// - [`HttpError::InvalidUrl`] if the base URL cannot carry a path
    /// - [`HttpError::Transport`] if the TLS backend cannot initialize
    pub fn new(config: &HttpConfig) -> HttpResult<Self> {
        config.validate()?;

        let base = Url::parse(config.base_url.trim()).map_err(|e| HttpError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "cannot be a base URL".to_string(),
            });
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(ApiClient { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // =========================================================================
    // Repository Accessors
    // =========================================================================

    /// Returns the product repository.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let catalog = client.products().list().await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Returns the POS sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    /// Returns the storefront order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.clone())
    }

    /// Returns the deal repository.
    pub fn deals(&self) -> DealRepository {
        DealRepository::new(self.clone())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Base URL with `segments` appended; each segment is percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> HttpResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| HttpError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be a base URL".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// GET returning `None` on 404.
    pub(crate) async fn get_optional(
        &self,
        segments: &[&str],
        context: &str,
    ) -> HttpResult<Option<Value>> {
        match self.get(segments, context).await {
            Ok(body) => Ok(Some(body)),
            Err(HttpError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn get(&self, segments: &[&str], context: &str) -> HttpResult<Value> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response, context).await
    }

    /// POST/PUT a JSON body, tagged with a fresh request id.
    pub(crate) async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: &Value,
        context: &str,
    ) -> HttpResult<Value> {
        let url = self.endpoint(segments)?;
        let request_id = Uuid::new_v4();
        debug!(%url, %method, %request_id, "Sending");

        let response = self
            .with_request_id(self.http.request(method, url), request_id)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!(%request_id, error = %err, context, "Store API unreachable");
                HttpError::from(err)
            })?;

        read_json(response, context).await.map_err(|err| {
            if let HttpError::Server { status, message } = &err {
                error!(%request_id, status, message = ?message, context, "Store API rejected request");
            }
            err
        })
    }

    fn with_request_id(&self, request: RequestBuilder, request_id: Uuid) -> RequestBuilder {
        request.header(REQUEST_ID_HEADER, request_id.to_string())
    }
}

/// Maps the status and parses the body. An empty 2xx body is `null`.
async fn read_json(response: Response, context: &str) -> HttpResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::NOT_FOUND {
        return Err(HttpError::not_found(context));
    }
    if !status.is_success() {
        return Err(HttpError::Server {
            status: status.as_u16(),
            message: server_message(&body),
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| HttpError::decode(context, e))
}

/// Pulls `error` or `message` out of a JSON error body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

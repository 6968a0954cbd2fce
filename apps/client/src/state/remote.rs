//! # Remote State
//!
//! Wraps the store API client for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn load_catalog(remote: &RemoteState, ...) -> Result<_, ApiError> {
//!     let products = remote.inner().products().list().await?;
//!     ...
//! }
//! ```

use medwear_http::{ApiClient, HttpConfig, HttpResult};

/// Wrapper around [`ApiClient`].
///
/// The client holds a connection pool and is safe to share between
/// concurrent commands.
#[derive(Debug, Clone)]
pub struct RemoteState {
    client: ApiClient,
}

impl RemoteState {
    pub fn new(client: ApiClient) -> Self {
        RemoteState { client }
    }

    /// Builds the client from configuration.
    pub fn connect(config: &HttpConfig) -> HttpResult<Self> {
        Ok(RemoteState::new(ApiClient::new(config)?))
    }

    /// Returns a reference to the inner client.
    pub fn inner(&self) -> &ApiClient {
        &self.client
    }
}

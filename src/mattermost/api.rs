//! Authenticated access to the Mattermost REST API v4.

use super::{auth::*, error::MattermostError};
use crate::config::Options;
use reqwest::{header, Method};
use serde_json::Value;
use tracing::{debug, warn};

/// The path segment separating the server base URL from API endpoints.
const API_V4: &str = "api/v4";

/// The capability the message workflow needs from the Mattermost server.
///
/// [HttpApi] talks to a real server; tests substitute their own
/// implementation.
#[allow(async_fn_in_trait)]
pub trait Api {
    /// Issue a GET to the given endpoint, relative to the API root.
    async fn get(&self, endpoint: &str, opts: &Options) -> Result<Value, MattermostError>;

    /// Issue a POST with a raw JSON body to the given endpoint.
    async fn post(
        &self,
        endpoint: &str,
        payload: Vec<u8>,
        opts: &Options,
    ) -> Result<Value, MattermostError>;
}

/// An [Api] backed by `reqwest`. One request is one round-trip; nothing is
/// retried.
#[derive(Clone, Copy, Default)]
pub struct HttpApi;

impl Api for HttpApi {
    async fn get(&self, endpoint: &str, opts: &Options) -> Result<Value, MattermostError> {
        query(Method::GET, endpoint, None, opts).await
    }

    async fn post(
        &self,
        endpoint: &str,
        payload: Vec<u8>,
        opts: &Options,
    ) -> Result<Value, MattermostError> {
        query(Method::POST, endpoint, Some(payload), opts).await
    }
}

/// Join the server base URL and an endpoint around exactly one `/api/v4/`.
///
/// ```
/// assert_eq!(
///     forge_api_v4_url("http://h/mm/", "/users/me"),
///     "http://h/mm/api/v4/users/me"
/// );
/// ```
pub fn forge_api_v4_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        API_V4,
        endpoint.trim_start_matches('/')
    )
}

/// Build the `reqwest` client for a single invocation, honouring the
/// configured timeout and certificate policy.
fn build_client(opts: &Options) -> Result<reqwest::Client, MattermostError> {
    if opts.skip_tls_verify {
        warn!("TLS certificate validation is disabled");
    }

    let client = reqwest::Client::builder()
        .timeout(opts.connection_timeout)
        .danger_accept_invalid_certs(opts.skip_tls_verify)
        .build()?;

    Ok(client)
}

/// Perform a request and decode the JSON body of a successful response.
async fn query(
    method: Method,
    endpoint: &str,
    payload: Option<Vec<u8>>,
    opts: &Options,
) -> Result<Value, MattermostError> {
    if opts.base_url.is_empty() {
        return Err(MattermostError::MissingUrl);
    }
    if opts.access_token.0.is_empty() {
        return Err(MattermostError::MissingAccessToken);
    }

    let url = forge_api_v4_url(&opts.base_url, endpoint);
    debug!(%method, %url, "Querying Mattermost");

    let mut req = build_client(opts)?
        .request(method, &url)
        .header(header::AUTHORIZATION, to_auth_header_val(&opts.access_token))
        .header(header::ACCEPT, "application/json");

    if let Some(body) = payload {
        req = req
            .header(header::CONTENT_TYPE, "application/json; charset=utf8")
            .body(body);
    }

    let res = req.send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(MattermostError::Status { url, status });
    }

    let body = res.bytes().await?;
    serde_json::from_slice(&body).map_err(MattermostError::MalformedBody)
}

//! HTTP adapter for the judging service.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Action, Decision, Guest, GuestId, Verdict},
    protocol::{AuthorizeRequest, AuthorizeResponse, ErrorDetail, GuestResponse},
};
use tracing::debug;
use url::Url;

use crate::{ClientError, ClientResult, DecisionOracle, GuestSource};

const NEXT_GUEST_ROUTE: &str = "api/next-guest";
const AUTHORIZE_ROUTE: &str = "api/authorize";

/// Talks to the judging service; implements both [`GuestSource`] and
/// [`DecisionOracle`].
pub struct HttpBouncerClient {
    http: Client,
    base_url: Url,
}

impl HttpBouncerClient {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        let mut base_url =
            Url::parse(server_url).with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("server_url must start with http:// or https://");
        }
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(self)
    }

    fn endpoint(&self, route: &str) -> ClientResult<Url> {
        self.base_url
            .join(route)
            .map_err(|e| ClientError::transport(format!("invalid endpoint '{route}': {e}")))
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body)
            .map_err(|e| ClientError::Protocol(format!("malformed response body: {e}")));
    }

    let detail = serde_json::from_slice::<ErrorDetail>(&body)
        .ok()
        .and_then(|error| error.detail);
    match detail {
        Some(detail) => Err(ClientError::server(status.as_u16(), detail)),
        None => Err(ClientError::transport(format!(
            "request failed with status {status}"
        ))),
    }
}

#[async_trait]
impl GuestSource for HttpBouncerClient {
    async fn fetch_next(&self) -> ClientResult<Guest> {
        let response = self.http.get(self.endpoint(NEXT_GUEST_ROUTE)?).send().await?;
        let body: GuestResponse = decode_json(response).await?;
        let guest = Guest::try_from(body)?;
        debug!(guest_id = %guest.id, "fetched guest");
        Ok(guest)
    }
}

#[async_trait]
impl DecisionOracle for HttpBouncerClient {
    async fn authorize(&self, guest_id: &GuestId, action: Action) -> ClientResult<Verdict> {
        let response = self
            .http
            .post(self.endpoint(AUTHORIZE_ROUTE)?)
            .json(&AuthorizeRequest::from(Decision {
                guest_id: guest_id.clone(),
                action,
            }))
            .send()
            .await?;
        let body: AuthorizeResponse = decode_json(response).await?;
        debug!(
            guest_id = %guest_id,
            %action,
            correct = body.correct,
            allowed = ?body.allowed,
            "decision judged"
        );
        Ok(body.into())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

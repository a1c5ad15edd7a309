//! HTTP client for the rewriting endpoint.

use crate::domain::{RewriteService, ServiceError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
pub struct RewriteRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RewriteReply {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    detail: Option<String>,
}

/// Maps a raw HTTP answer to the rewritten text or a [`ServiceError`].
///
/// A success status must carry a `result` string. A failure status uses the
/// body's `detail` string when there is one; anything else (no body,
/// non-JSON, structured validation errors) gets the generic message.
pub fn interpret_response(status: u16, body: &str) -> Result<String, ServiceError> {
    if (200..300).contains(&status) {
        serde_json::from_str::<RewriteReply>(body)
            .map(|reply| reply.result)
            .map_err(|err| {
                warn!(status, error = %err, "success response without a result field");
                ServiceError::malformed()
            })
    } else {
        let detail = serde_json::from_str::<ErrorReply>(body)
            .ok()
            .and_then(|reply| reply.detail);
        Err(ServiceError::status(status, detail))
    }
}

/// [`RewriteService`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpRewriteService {
    client: Client,
    endpoint: String,
}

impl HttpRewriteService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RewriteService for HttpRewriteService {
    fn rewrite(&self, text: &str) -> Result<String, ServiceError> {
        debug!(endpoint = %self.endpoint, "posting rewrite request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RewriteRequest { text })
            .send()
            .map_err(|err| {
                warn!(error = %err, "rewrite request did not get a response");
                ServiceError::transport()
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| {
            warn!(status, error = %err, "failed to read rewrite response body");
            ServiceError::transport()
        })?;

        interpret_response(status, &body)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! REST key-value backend
//!
//! Serves both the REST cache tier and the managed KV tier, which speak the
//! same Redis-over-HTTP command protocol:
//!
//! - `GET  {base}/get/users` -> `{"result": "<json>" | null}`
//! - `POST {base}/set/users` with the JSON payload as body -> `{"result": "OK"}`
//! - failures -> `{"error": "..."}`, usually with a non-2xx status
//!
//! Every request carries `Authorization: Bearer <token>`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{decode_collection, encode_collection, CodeBackend, STORAGE_KEY};
use crate::config::RestCredentials;
use crate::error::{BackendError, Result};
use crate::store::AccessCode;

/// Response envelope of the REST command protocol
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

pub struct RestKvBackend {
    name: &'static str,
    client: Client,
    base_url: String,
    token: String,
    key: String,
}

impl RestKvBackend {
    /// Create a backend labelled `name` (used in logs)
    pub fn new(
        name: &'static str,
        credentials: RestCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name,
            client,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            token: credentials.token,
            key: STORAGE_KEY.to_string(),
        })
    }

    fn command_url(&self, command: &str) -> String {
        format!("{}/{}/{}", self.base_url, command, self.key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(body);
            return Err(BackendError::Http {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|e| BackendError::Protocol(format!("unreadable response: {e}")))?;
        if let Some(error) = envelope.error {
            return Err(BackendError::Protocol(error).into());
        }
        Ok(envelope.result)
    }
}

#[async_trait]
impl CodeBackend for RestKvBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> Result<Vec<AccessCode>> {
        let result = self.send(self.client.get(self.command_url("get"))).await?;
        match result {
            Value::Null => Ok(Vec::new()),
            Value::String(payload) => decode_collection(&payload),
            // Some clients store the array as native JSON rather than a string
            Value::Array(_) => serde_json::from_value(result)
                .map_err(|e| BackendError::Payload(e.to_string()).into()),
            other => Err(BackendError::Payload(format!("unexpected result: {other}")).into()),
        }
    }

    async fn write_all(&self, codes: &[AccessCode]) -> Result<()> {
        let payload = encode_collection(codes)?;
        let request = self.client.post(self.command_url("set")).body(payload);
        match self.send(request).await? {
            Value::String(ok) if ok == "OK" => {
                tracing::debug!(backend = self.name, count = codes.len(), "wrote access codes");
                Ok(())
            }
            other => Err(BackendError::Protocol(format!("set not acknowledged: {other}")).into()),
        }
    }
}

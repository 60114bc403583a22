// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Networked cache backend (Redis protocol)
//!
//! The collection is a JSON string stored under [`STORAGE_KEY`]. The
//! connection manager is created on first use and reused for the life of
//! the backend; a failed connect is not cached, so the next call retries.

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tokio::sync::OnceCell;

use super::{decode_collection, encode_collection, CodeBackend, STORAGE_KEY};
use crate::error::{AccessError, BackendError, Result};
use crate::store::AccessCode;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(2000);

pub struct RedisBackend {
    url: String,
    key: String,
    connection: OnceCell<ConnectionManager>,
}

impl RedisBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: STORAGE_KEY.to_string(),
            connection: OnceCell::new(),
        }
    }

    /// Whether a connection has been established and memoized
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let client = Client::open(self.url.as_str())?;
                let config = ConnectionManagerConfig::new().set_number_of_retries(1);
                let manager = tokio::time::timeout(
                    CONNECT_TIMEOUT,
                    client.get_connection_manager_with_config(config),
                )
                .await
                .map_err(|_| {
                    BackendError::Connection(format!(
                        "no response within {}ms",
                        CONNECT_TIMEOUT.as_millis()
                    ))
                })??;
                tracing::debug!("connected to networked cache");
                Ok::<_, AccessError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CodeBackend for RedisBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn fetch(&self) -> Result<Vec<AccessCode>> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn.get(self.key.as_str()).await?;
        match payload {
            Some(payload) => decode_collection(&payload),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, codes: &[AccessCode]) -> Result<()> {
        let payload = encode_collection(codes)?;
        let mut conn = self.connection().await?;
        let _: () = conn.set(self.key.as_str(), payload).await?;
        tracing::debug!(count = codes.len(), "wrote access codes to networked cache");
        Ok(())
    }
}

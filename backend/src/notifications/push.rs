//! Expo-compatible HTTP push client

use super::PushSender;
use crate::config::PushConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("push ticket rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    sound: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: Option<PushTicket>,
}

#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Sends one message per request; no batching and no retries
#[derive(Clone)]
pub struct ExpoPushClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<Secret<String>>,
}

impl ExpoPushClient {
    pub fn new(
        endpoint: impl Into<String>,
        access_token: Option<Secret<String>>,
        timeout: Duration,
    ) -> Result<Self, PushError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            access_token,
        })
    }

    pub fn from_config(config: &PushConfig) -> Result<Self, PushError> {
        let token = config.access_token.trim();
        let access_token = (!token.is_empty()).then(|| Secret::new(token.to_string()));
        Self::new(
            config.endpoint.clone(),
            access_token,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }
}

#[async_trait]
impl PushSender for ExpoPushClient {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError> {
        let message = PushMessage {
            to: token,
            title,
            body,
            sound: "default",
        };

        let mut request = self.http.post(&self.endpoint).json(&message);
        if let Some(access_token) = &self.access_token {
            request = request.bearer_auth(access_token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PushResponse = response.json().await?;
        match parsed.data {
            Some(ticket) if ticket.status == "ok" => {
                debug!(title, "Push notification accepted");
                Ok(())
            }
            Some(ticket) => Err(PushError::Rejected(
                ticket.message.unwrap_or(ticket.status),
            )),
            None => Err(PushError::Rejected("missing push ticket".to_string())),
        }
    }
}

//! Callback / quote requests
//!
//! A visitor leaves name, email and phone together with a free-text message
//! (normally the session summary). Requests are validated locally, then handed
//! to a [`QuoteSubmitter`]: an HTTP endpoint when one is configured, otherwise
//! a local JSON-lines outbox.

use crate::config::PlannerConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{8,15}[0-9]$").expect("phone pattern compiles")
});

/// Validation failures for a [`QuoteRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
    #[error("message is too long ({len} characters, limit {limit})")]
    MessageTooLong { len: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

impl QuoteRequest {
    pub const MESSAGE_LIMIT: usize = 4000;

    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            message: message.into(),
            service_id: None,
        }
    }

    pub fn for_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Trimmed copy, or the first validation failure
    pub fn validate(&self) -> Result<Self, QuoteError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(QuoteError::MissingName);
        }

        let email = self.email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(QuoteError::InvalidEmail(email.to_string()));
        }

        let phone = self.phone.trim();
        if !PHONE_RE.is_match(phone) {
            return Err(QuoteError::InvalidPhone(phone.to_string()));
        }

        let message = self.message.trim();
        let len = message.chars().count();
        if len > Self::MESSAGE_LIMIT {
            return Err(QuoteError::MessageTooLong {
                len,
                limit: Self::MESSAGE_LIMIT,
            });
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
            service_id: self.service_id.clone(),
        })
    }
}

/// Acknowledgement of a handed-off request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    /// Endpoint URL or outbox path
    pub destination: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    id: Uuid,
    submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    request: &'a QuoteRequest,
}

#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt>;
}

/// POSTs requests as JSON
pub struct HttpQuoteSubmitter {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpQuoteSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("project-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_custom_client(endpoint, http_client))
    }

    pub fn with_custom_client(endpoint: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
        }
    }
}

#[async_trait]
impl QuoteSubmitter for HttpQuoteSubmitter {
    async fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt> {
        let request = request.validate()?;
        let envelope = Envelope {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            request: &request,
        };

        log::info!("Submitting quote request {} to {}", envelope.id, self.endpoint);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        log::debug!("Quote request status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Quote submission failed ({}): {}", status, error_text);
        }

        Ok(SubmissionReceipt {
            id: envelope.id,
            submitted_at: envelope.submitted_at,
            destination: self.endpoint.clone(),
        })
    }
}

/// Appends requests to a local JSON-lines file
pub struct OutboxQuoteSubmitter {
    path: PathBuf,
}

impl OutboxQuoteSubmitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuoteSubmitter for OutboxQuoteSubmitter {
    async fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt> {
        let request = request.validate()?;
        let envelope = Envelope {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            request: &request,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create outbox directory: {:?}", parent))?;
        }

        let line = serde_json::to_string(&envelope).context("Failed to serialize quote request")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open outbox: {:?}", self.path))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write outbox: {:?}", self.path))?;

        log::info!("Quote request {} queued in {:?}", envelope.id, self.path);

        Ok(SubmissionReceipt {
            id: envelope.id,
            submitted_at: envelope.submitted_at,
            destination: self.path.display().to_string(),
        })
    }
}

/// HTTP when an endpoint is configured, otherwise the outbox
pub fn submitter_from_config(config: &PlannerConfig) -> Result<Box<dyn QuoteSubmitter>> {
    match &config.contact.endpoint {
        Some(endpoint) => Ok(Box::new(HttpQuoteSubmitter::new(endpoint.clone())?)),
        None => Ok(Box::new(OutboxQuoteSubmitter::new(config.outbox_path()?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest::new(
            "  Asha Rao ",
            "asha@example.com",
            "+91 98765 43210",
            "Online Store: 4 optional modules, ₹48,500",
        )
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let validated = request().validate().unwrap();
        assert_eq!(validated.name, "Asha Rao");
    }

    #[test]
    fn test_validation_failures() {
        let mut r = request();
        r.name = "   ".to_string();
        assert_eq!(r.validate(), Err(QuoteError::MissingName));

        let mut r = request();
        r.email = "asha@example".to_string();
        assert!(matches!(r.validate(), Err(QuoteError::InvalidEmail(_))));

        let mut r = request();
        r.phone = "12ab".to_string();
        assert!(matches!(r.validate(), Err(QuoteError::InvalidPhone(_))));

        let mut r = request();
        r.message = "x".repeat(QuoteRequest::MESSAGE_LIMIT + 1);
        assert!(matches!(r.validate(), Err(QuoteError::MessageTooLong { .. })));
    }

    #[tokio::test]
    async fn test_outbox_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox").join("quotes.jsonl");
        let submitter = OutboxQuoteSubmitter::new(&path);

        let first = submitter
            .submit(&request().for_service("online-store"))
            .await
            .unwrap();
        let second = submitter.submit(&request()).await.unwrap();
        assert_ne!(first.id, second.id);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "Asha Rao");
        assert_eq!(lines[0]["serviceId"], "online-store");
        assert_eq!(lines[0]["id"], first.id.to_string());
        assert!(lines[1].get("serviceId").is_none());
    }

    #[tokio::test]
    async fn test_outbox_rejects_invalid_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.jsonl");
        let submitter = OutboxQuoteSubmitter::new(&path);

        let mut r = request();
        r.email = "nope".to_string();
        let err = submitter.submit(&r).await.unwrap_err();
        assert!(err.downcast_ref::<QuoteError>().is_some());
        assert!(!path.exists());
    }

    #[test]
    fn test_submitter_falls_back_to_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlannerConfig::default();
        config.contact.outbox_path = Some(dir.path().join("out.jsonl"));
        assert!(submitter_from_config(&config).is_ok());
    }
}

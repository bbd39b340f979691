//! Application upload with a hard deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::Method;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{PattaError, PattaResult};
use crate::http::SecureClient;
use crate::observability::metrics;
use crate::page::PageHost;
use crate::resilience::with_deadline;
use crate::security::Session;
use crate::upload::SubmissionPayload;

/// Default upload deadline.
pub const UPLOAD_DEADLINE: Duration = Duration::from_secs(120);

/// Sends one application per call; never retries.
#[derive(Clone)]
pub struct Uploader {
    client: SecureClient,
    deadline: Duration,
}

impl Uploader {
    pub fn new(client: SecureClient, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    /// Build the client and uploader from configuration.
    pub fn from_config(config: &ClientConfig, session: Arc<Session>, host: Arc<dyn PageHost>) -> PattaResult<Self> {
        let client = SecureClient::new(config, session, host)?;
        Ok(Self::new(client, Duration::from_millis(config.upload.deadline_ms)))
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn client(&self) -> &SecureClient {
        &self.client
    }

    /// POST `payload` as multipart to `target` and return the JSON answer.
    ///
    /// Nothing touches the network unless all five documents are present and
    /// non-empty. When the deadline passes the request future is dropped, which
    /// closes the connection mid-transfer.
    pub async fn upload(&self, target: &str, payload: SubmissionPayload) -> PattaResult<serde_json::Value> {
        if let Some(field) = payload.first_missing() {
            metrics::record_upload("missing_document");
            tracing::warn!(field = %field, "Upload refused, required document missing");
            return Err(PattaError::MissingDocument(field));
        }

        let url = self.client.resolve(target)?;
        let attempt = Uuid::new_v4();
        let total_bytes = payload.document_bytes();
        let form = payload.into_form()?;
        let request = self
            .client
            .prepare(Method::POST, url.clone(), HeaderMap::new())
            .multipart(form);

        tracing::info!(
            attempt = %attempt,
            url = %url,
            total_bytes,
            deadline_ms = self.deadline.as_millis() as u64,
            "Uploading application"
        );

        let started = Instant::now();
        let outcome = with_deadline(self.deadline, async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (status, body) = match outcome {
            Err(_) => {
                metrics::record_upload("timeout");
                tracing::error!(attempt = %attempt, elapsed_ms, "Upload deadline exceeded, transfer aborted");
                return Err(PattaError::UploadTimeout(self.deadline));
            }
            Ok(Err(e)) => {
                metrics::record_upload("transport_error");
                tracing::error!(attempt = %attempt, error = %e, "Upload transport failure");
                return Err(e.into());
            }
            Ok(Ok(answer)) => answer,
        };

        if !status.is_success() {
            metrics::record_upload("failed");
            tracing::error!(attempt = %attempt, status = status.as_u16(), elapsed_ms, "Upload rejected");
            return Err(PattaError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_upload("ok");
        tracing::info!(attempt = %attempt, elapsed_ms, "Upload accepted");
        Ok(serde_json::from_str(&body)?)
    }
}

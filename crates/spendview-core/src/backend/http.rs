//! `reqwest`-based backend talking to the presign/summary API and storage.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use super::{BackendError, ExpenseBackend, PresignedPost, TransferReceipt, FILE_FIELD};
use crate::config::Settings;
use crate::pipeline::UploadFile;

/// HTTP implementation of [`ExpenseBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    presign_url: String,
    summary_url: String,
}

impl HttpBackend {
    /// Build a client from the endpoint and timeout settings
    pub fn new(settings: &Settings) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            presign_url: settings.endpoints.presign_url.clone(),
            summary_url: settings.endpoints.summary_url.clone(),
        })
    }

    /// Read a JSON body from a successful response
    async fn json_body(response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::malformed(format!("invalid JSON: {e}")))
    }
}

impl ExpenseBackend for HttpBackend {
    async fn presign(&self) -> Result<PresignedPost, BackendError> {
        debug!("POST {}", self.presign_url);
        let response = self.client.post(&self.presign_url).send().await?;
        let post = PresignedPost::from_json(Self::json_body(response).await?)?;
        debug!(
            "Presign issued for {} ({} fields)",
            post.url,
            post.fields.len()
        );
        Ok(post)
    }

    async fn transfer(
        &self,
        post: &PresignedPost,
        file: &UploadFile,
    ) -> Result<TransferReceipt, BackendError> {
        let mut form = Form::new();
        for (name, value) in &post.fields {
            form = form.text(name.clone(), value.clone());
        }
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())?;
        form = form.part(FILE_FIELD, part);

        debug!("POST {} ({} bytes)", post.url, file.size());
        let response = self.client.post(&post.url).multipart(form).send().await?;
        let receipt = TransferReceipt {
            status: response.status().as_u16(),
        };
        debug!("Storage answered {}", receipt.status);
        Ok(receipt)
    }

    async fn fetch_summary(&self) -> Result<Value, BackendError> {
        debug!("GET {}", self.summary_url);
        let response = self.client.get(&self.summary_url).send().await?;
        Self::json_body(response).await
    }
}

//! Remote collaborators: the presign/summary API and blob storage.

mod http;

use std::future::Future;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::pipeline::UploadFile;

pub use http::HttpBackend;

/// Multipart field name carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Error type for backend and storage calls
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// The body did not have the expected shape
    #[error("malformed response: {message}")]
    Malformed { message: String },
}

impl BackendError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// One-time upload descriptor issued by the presign endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    /// Multipart POST target
    pub url: String,
    /// Form fields required by storage, in the order the backend sent them
    pub fields: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct RawPresignedPost {
    url: String,
    fields: Map<String, Value>,
}

impl PresignedPost {
    /// Parse `{ "url": ..., "fields": { ... } }`, keeping field order
    pub fn from_json(body: Value) -> Result<Self, BackendError> {
        let raw: RawPresignedPost = serde_json::from_value(body)
            .map_err(|e| BackendError::malformed(format!("presign body: {e}")))?;

        let fields = raw
            .fields
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name, s)),
                other => Err(BackendError::malformed(format!(
                    "presign field {name} is not a string: {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            url: raw.url,
            fields,
        })
    }
}

/// What storage answered to a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    /// HTTP status code returned by storage
    pub status: u16,
}

impl TransferReceipt {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The three remote calls the dashboard depends on
pub trait ExpenseBackend: Send + Sync {
    /// Request a one-time upload credential (POST, no body)
    fn presign(&self) -> impl Future<Output = Result<PresignedPost, BackendError>> + Send;

    /// Multipart POST of `file` to the credential's URL
    fn transfer(
        &self,
        post: &PresignedPost,
        file: &UploadFile,
    ) -> impl Future<Output = Result<TransferReceipt, BackendError>> + Send;

    /// Fetch the raw summary body (category -> amount)
    fn fetch_summary(&self) -> impl Future<Output = Result<Value, BackendError>> + Send;
}

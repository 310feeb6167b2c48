//! Subcommand execution against a built [`Dashboard`].

use anyhow::{bail, Context, Result};
use spendview_core::backend::ExpenseBackend;
use spendview_core::chart::ChartSurface;
use spendview_core::pipeline::{UiPort, UploadFile, UploadOutcome};
use spendview_core::Dashboard;
use tracing::{info, warn};

use crate::config::Command;

/// Run one subcommand.
///
/// Summary fetch failures are only logged; the chart stays as it was.
pub async fn run<B, S, U>(dashboard: &Dashboard<B, S, U>, command: Command) -> Result<()>
where
    B: ExpenseBackend,
    S: ChartSurface,
    U: UiPort,
{
    match command {
        Command::Show { .. } => {
            if let Err(e) = dashboard.start().await {
                warn!("No chart drawn: {}", e);
            }
        }
        Command::Upload { file, .. } => {
            let file = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match dashboard.start_upload(Some(file)).await? {
                UploadOutcome::Completed { refreshed: true } => {
                    info!("Totals now {}", dashboard.totals().total());
                }
                UploadOutcome::Completed { refreshed: false } => {
                    warn!("Receipt stored, but the totals could not be refreshed yet");
                }
                UploadOutcome::Ignored => bail!("Another upload is already running"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{ConsoleUi, TerminalSurface};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use spendview_core::backend::{BackendError, PresignedPost, TransferReceipt};
    use spendview_core::{CategoryTotals, DashboardBuilder, Settings};

    /// Backend whose summary either answers `{"Food": 10}` or fails with a status
    struct StubBackend {
        summary_status: Option<u16>,
    }

    impl ExpenseBackend for StubBackend {
        async fn presign(&self) -> Result<PresignedPost, BackendError> {
            Ok(PresignedPost {
                url: "https://s3.example/bucket".to_string(),
                fields: vec![("key".to_string(), "abc".to_string())],
            })
        }

        async fn transfer(
            &self,
            _post: &PresignedPost,
            _file: &UploadFile,
        ) -> Result<TransferReceipt, BackendError> {
            Ok(TransferReceipt { status: 204 })
        }

        async fn fetch_summary(&self) -> Result<Value, BackendError> {
            match self.summary_status {
                Some(status) => Err(BackendError::Status { status }),
                None => Ok(json!({ "Food": 10 })),
            }
        }
    }

    type TestDashboard = Dashboard<StubBackend, TerminalSurface<Vec<u8>>, ConsoleUi<Vec<u8>>>;

    fn dashboard(summary_status: Option<u16>) -> TestDashboard {
        let mut settings = Settings::default();
        settings.upload.settle_delay_ms = 0;
        DashboardBuilder::new(
            StubBackend { summary_status },
            TerminalSurface::new(Vec::new()),
            ConsoleUi::new(Vec::new()),
        )
        .with_settings(settings)
        .build()
    }

    fn receipt_file() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        std::fs::write(file.path(), b"jpeg").unwrap();
        file
    }

    #[tokio::test]
    async fn test_show_draws_chart() {
        let dash = dashboard(None);

        run(&dash, Command::Show { variant: None }).await.unwrap();

        assert_eq!(dash.totals(), CategoryTotals::new(10.0, 0.0, 0.0, 0.0));
        assert!(dash.renderer().lock().surface().live().is_some());
    }

    #[tokio::test]
    async fn test_show_with_failing_summary_succeeds() {
        let dash = dashboard(Some(503));

        run(&dash, Command::Show { variant: None }).await.unwrap();

        assert_eq!(dash.totals(), CategoryTotals::default());
        assert!(dash.renderer().lock().surface().live().is_none());
    }

    #[tokio::test]
    async fn test_upload_with_failing_refresh_succeeds() {
        let dash = dashboard(Some(500));
        let file = receipt_file();

        let result = run(
            &dash,
            Command::Upload {
                file: file.path().to_path_buf(),
                variant: None,
            },
        )
        .await;

        assert!(result.is_ok());
        assert!(!dash.is_busy());
    }

    #[tokio::test]
    async fn test_upload_refreshes_totals() {
        let dash = dashboard(None);
        let file = receipt_file();

        run(
            &dash,
            Command::Upload {
                file: file.path().to_path_buf(),
                variant: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(dash.totals(), CategoryTotals::new(10.0, 0.0, 0.0, 0.0));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_error() {
        let dash = dashboard(None);
        let dir = tempfile::tempdir().unwrap();

        let err = run(
            &dash,
            Command::Upload {
                file: dir.path().join("missing.jpg"),
                variant: None,
            },
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("missing.jpg"));
    }
}

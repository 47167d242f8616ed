use super::document::ReportDocument;
use super::gateway::{PdfRenderer, PrintGateway, RenderError};
use super::options::PdfOptions;
use crate::assessment::{lock_session, SectionState, SharedSession};
use crate::config::ExportConfig;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Message shown to the reviewer whenever an export fails.
pub const EXPORT_FAILURE_MESSAGE: &str = "Fehler beim Generieren des PDFs.";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    Busy,
    #[error("report rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Busy => "Ein Export läuft bereits.",
            ExportError::Render(_) | ExportError::Io(_) => EXPORT_FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedReport {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl ExportedReport {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Runs the print and PDF paths against a session: expand every section,
/// wait for the layout to settle, hand the document off, then restore the
/// reviewer's sections. Only one export runs at a time.
#[derive(Debug)]
pub struct ExportCoordinator {
    renderer: Arc<dyn PdfRenderer>,
    printer: Arc<dyn PrintGateway>,
    print_settle: Duration,
    pdf_settle: Duration,
    busy: AtomicBool,
}

impl ExportCoordinator {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        printer: Arc<dyn PrintGateway>,
        print_settle: Duration,
        pdf_settle: Duration,
    ) -> Self {
        Self {
            renderer,
            printer,
            print_settle,
            pdf_settle,
            busy: AtomicBool::new(false),
        }
    }

    pub fn from_config(
        renderer: Arc<dyn PdfRenderer>,
        printer: Arc<dyn PrintGateway>,
        config: &ExportConfig,
    ) -> Self {
        Self::new(renderer, printer, config.print_settle, config.pdf_settle)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn export_print(&self, session: &SharedSession) -> Result<(), ExportError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let mode = ExportModeGuard::enter(session);
        info!(restore_to = ?mode.saved, "print export started");

        tokio::time::sleep(self.print_settle).await;
        let document = snapshot(session, Local::now().date_naive());

        // The spooler never reports whether the job was printed or cancelled,
        // so sections are restored as soon as the hand-off returns.
        match self.printer.print(&document).await {
            Ok(()) => {
                info!("print export finished");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "print export failed");
                Err(err.into())
            }
        }
    }

    pub async fn export_pdf(
        &self,
        session: &SharedSession,
        generated_on: NaiveDate,
    ) -> Result<ExportedReport, ExportError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let mode = ExportModeGuard::enter(session);
        info!(restore_to = ?mode.saved, "pdf export started");

        tokio::time::sleep(self.pdf_settle).await;
        let document = snapshot(session, generated_on);
        let options = PdfOptions::for_date(generated_on);

        match self.renderer.render(&document, &options).await {
            Ok(content) => {
                info!(filename = %options.filename, bytes = content.len(), "pdf export finished");
                Ok(ExportedReport {
                    filename: options.filename,
                    content,
                })
            }
            Err(err) => {
                error!(error = %err, "pdf export failed");
                Err(err.into())
            }
        }
    }
}

fn snapshot(session: &SharedSession, generated_on: NaiveDate) -> ReportDocument {
    lock_session(session).document(generated_on)
}

/// Holds the busy flag for the lifetime of one export.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ExportError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Expands every section on creation and restores the saved state when
/// dropped, whether the export succeeded, failed or was cancelled.
struct ExportModeGuard {
    session: SharedSession,
    saved: SectionState,
}

impl ExportModeGuard {
    fn enter(session: &SharedSession) -> Self {
        let saved = lock_session(session).enter_export_mode();
        Self {
            session: Arc::clone(session),
            saved,
        }
    }
}

impl Drop for ExportModeGuard {
    fn drop(&mut self) {
        let restored = lock_session(&self.session).exit_export_mode();
        debug!(?restored, "export mode left");
    }
}

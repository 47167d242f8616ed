use super::document::ReportDocument;
use super::options::PdfOptions;
use crate::config::ExportConfig;
use async_trait::async_trait;
use chrono::Local;
use std::fmt::Debug;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pipe to '{program}' failed: {source}")]
    Pipe {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' did not finish within {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("'{0}' produced no output")]
    EmptyOutput(String),
    #[error("{0}")]
    Backend(String),
}

/// Converts a rendered report into paginated PDF bytes.
#[async_trait]
pub trait PdfRenderer: Debug + Send + Sync {
    async fn render(
        &self,
        document: &ReportDocument,
        options: &PdfOptions,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Hands a rendered report to the platform print flow. Whether the job was
/// printed or cancelled is not reported back.
#[async_trait]
pub trait PrintGateway: Debug + Send + Sync {
    async fn print(&self, document: &ReportDocument) -> Result<(), RenderError>;
}

/// Pipes the report HTML through a `wkhtmltopdf` process.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    program: String,
    timeout: Duration,
}

impl WkhtmltopdfRenderer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.wkhtmltopdf_path.clone(), config.render_timeout)
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(
        &self,
        document: &ReportDocument,
        options: &PdfOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let mut args = converter_args(options);
        // read HTML from stdin, write PDF to stdout
        args.push("-".to_string());
        args.push("-".to_string());

        let bytes = pipe_through(
            &self.program,
            &args,
            document.html.as_bytes().to_vec(),
            self.timeout,
        )
        .await?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput(self.program.clone()));
        }

        debug!(bytes = bytes.len(), filename = %options.filename, "pdf rendered");
        Ok(bytes)
    }
}

/// Renders the report to PDF and submits it to the print spooler.
#[derive(Debug, Clone)]
pub struct SpoolerPrinter {
    renderer: Arc<dyn PdfRenderer>,
    command: String,
    timeout: Duration,
}

impl SpoolerPrinter {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        command: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(renderer: Arc<dyn PdfRenderer>, config: &ExportConfig) -> Self {
        Self::new(renderer, config.print_command.clone(), config.render_timeout)
    }
}

#[async_trait]
impl PrintGateway for SpoolerPrinter {
    async fn print(&self, document: &ReportDocument) -> Result<(), RenderError> {
        let options = PdfOptions::for_date(Local::now().date_naive());
        let pdf = self.renderer.render(document, &options).await?;
        let args = vec!["-t".to_string(), options.filename.clone()];
        pipe_through(&self.command, &args, pdf, self.timeout).await?;
        debug!(command = %self.command, "print job submitted");
        Ok(())
    }
}

pub(crate) fn converter_args(options: &PdfOptions) -> Vec<String> {
    let margins = options.margins;
    vec![
        "--quiet".to_string(),
        "--encoding".to_string(),
        "utf-8".to_string(),
        "--page-size".to_string(),
        options.page_format.label().to_string(),
        "--orientation".to_string(),
        options.orientation.label().to_string(),
        "--margin-top".to_string(),
        format!("{}mm", margins.top),
        "--margin-left".to_string(),
        format!("{}mm", margins.left),
        "--margin-bottom".to_string(),
        format!("{}mm", margins.bottom),
        "--margin-right".to_string(),
        format!("{}mm", margins.right),
        "--image-quality".to_string(),
        options.image_quality_percent().to_string(),
        "--dpi".to_string(),
        options.dpi().to_string(),
        "--title".to_string(),
        options.filename.trim_end_matches(".pdf").to_string(),
    ]
}

/// Runs `program`, feeds `input` on stdin and collects stdout. The child is
/// killed if it outlives `timeout`.
async fn pipe_through(
    program: &str,
    args: &[String],
    input: Vec<u8>,
    timeout: Duration,
) -> Result<Vec<u8>, RenderError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RenderError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let pipe_error = |source: std::io::Error| RenderError::Pipe {
        program: program.to_string(),
        source,
    };
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| pipe_error(std::io::Error::other("stdin unavailable")))?;

    let feed = async move {
        stdin.write_all(&input).await?;
        stdin.shutdown().await
    };
    let run = async { tokio::join!(feed, child.wait_with_output()) };

    let (fed, output) = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| RenderError::Timeout {
            program: program.to_string(),
            timeout,
        })?;
    let output = output.map_err(pipe_error)?;

    if !output.status.success() {
        return Err(RenderError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    fed.map_err(pipe_error)?;

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn options() -> PdfOptions {
        PdfOptions::for_date(NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date"))
    }

    #[test]
    fn converter_args_carry_page_setup() {
        let args = converter_args(&options());
        let joined = args.join(" ");
        assert!(joined.contains("--page-size A4"));
        assert!(joined.contains("--orientation Portrait"));
        assert!(joined.contains("--margin-bottom 15mm"));
        assert!(joined.contains("--margin-top 10mm"));
        assert!(joined.contains("--image-quality 98"));
        assert!(joined.contains("--dpi 192"));
        assert!(joined.contains("--title AI-Data-Impact-Report-2024-01-31"));
    }

    #[tokio::test]
    async fn missing_converter_is_a_spawn_error() {
        let renderer = WkhtmltopdfRenderer::new(
            "/nonexistent/impact-analyst-wkhtmltopdf",
            Duration::from_secs(5),
        );
        let document = ReportDocument {
            title: "t".to_string(),
            html: "<p>x</p>".to_string(),
            expanded_sections: Vec::new(),
        };
        let err = renderer.render(&document, &options()).await.unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipe_through_returns_stdout() {
        let output = pipe_through("cat", &[], b"%PDF-1.4".to_vec(), Duration::from_secs(5))
            .await
            .expect("cat echoes input");
        assert_eq!(output, b"%PDF-1.4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_reported() {
        let err = pipe_through("false", &[], Vec::new(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Failed { .. }));
    }
}

//! Print and PDF export of the assessment report.

mod coordinator;
pub mod document;
mod gateway;
mod options;

pub use coordinator::{ExportCoordinator, ExportError, ExportedReport, EXPORT_FAILURE_MESSAGE};
pub use document::{render_report, ReportDocument, REPORT_TITLE};
pub use gateway::{PdfRenderer, PrintGateway, RenderError, SpoolerPrinter, WkhtmltopdfRenderer};
pub use options::{
    report_filename, Orientation, PageBreakMode, PageFormat, PageMargins, PdfOptions,
};

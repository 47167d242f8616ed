use chrono::NaiveDate;
use serde::Serialize;

pub const REPORT_FILENAME_PREFIX: &str = "AI-Data-Impact-Report";

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageMargins {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A4,
}

impl PageFormat {
    pub const fn label(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
}

impl Orientation {
    pub const fn label(self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageBreakMode {
    AvoidAll,
    Css,
    Legacy,
}

/// Configuration handed to the PDF collaborator for one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfOptions {
    pub margins: PageMargins,
    pub filename: String,
    pub image_quality: f32,
    pub capture_scale: f32,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub page_break_modes: Vec<PageBreakMode>,
}

impl PdfOptions {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            margins: PageMargins {
                top: 10.0,
                left: 10.0,
                bottom: 15.0,
                right: 10.0,
            },
            filename: report_filename(date),
            image_quality: 0.98,
            capture_scale: 2.0,
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            page_break_modes: vec![
                PageBreakMode::AvoidAll,
                PageBreakMode::Css,
                PageBreakMode::Legacy,
            ],
        }
    }

    /// Image quality as the 0-100 integer most converters expect.
    pub fn image_quality_percent(&self) -> u8 {
        (self.image_quality * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Rasterization resolution for the capture scale, relative to 96 dpi.
    pub fn dpi(&self) -> u32 {
        (96.0 * self.capture_scale).round() as u32
    }
}

pub fn report_filename(date: NaiveDate) -> String {
    format!("{REPORT_FILENAME_PREFIX}-{}.pdf", date.format("%Y-%m-%d"))
}

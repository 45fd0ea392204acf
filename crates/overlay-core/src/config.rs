//! Client configuration
//!
//! Defaults match the production deployment. A host page may inline a JSON
//! object to override any field, and the `pdf` query parameter replaces the
//! reference document URL.

use crate::error::{OverlayError, Result};
use crate::viewport::{ZoomBounds, MAX_SCALE, MIN_SCALE};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PDF_URL: &str = "/static/pdf/reference_template.pdf";
pub const DEFAULT_PDFJS_WORKER: &str =
    "https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.worker.min.js";

/// Query parameter that overrides [`ClientConfig::pdf_url`]
pub const PDF_QUERY_PARAM: &str = "pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Reference PDF shown under the overlay
    pub pdf_url: String,
    /// PDF.js worker script
    pub pdfjs_worker_src: String,
    /// Prefix for server routes, empty for same-origin
    pub api_base: String,
    /// Company id sent with interactive single exports
    pub company_id: String,
    pub zoom: ZoomBounds,
    pub messages: BusyMessages,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pdf_url: DEFAULT_PDF_URL.to_string(),
            pdfjs_worker_src: DEFAULT_PDFJS_WORKER.to_string(),
            api_base: String::new(),
            company_id: "interactive".to_string(),
            zoom: ZoomBounds::default(),
            messages: BusyMessages::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a (possibly partial) JSON configuration; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| OverlayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the reference PDF URL when the query supplies a non-empty value
    pub fn with_pdf_override(mut self, pdf: Option<&str>) -> Self {
        if let Some(url) = pdf.map(str::trim).filter(|u| !u.is_empty()) {
            self.pdf_url = url.to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pdf_url.trim().is_empty() {
            return Err(OverlayError::Config("pdf_url must not be empty".to_string()));
        }
        let z = &self.zoom;
        if !(MIN_SCALE <= z.min && z.min <= z.max && z.max <= MAX_SCALE) {
            return Err(OverlayError::Config(format!(
                "zoom bounds [{}, {}] must lie within [{}, {}]",
                z.min, z.max, MIN_SCALE, MAX_SCALE
            )));
        }
        if z.step <= 0.0 {
            return Err(OverlayError::Config("zoom step must be positive".to_string()));
        }
        Ok(())
    }
}

/// Labels shown on the busy overlay while a request is running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusyMessages {
    pub extract: String,
    pub export: String,
    pub batch: String,
}

impl Default for BusyMessages {
    fn default() -> Self {
        Self {
            extract: "Processing documents\u{2026}".to_string(),
            export: "Exporting\u{2026}".to_string(),
            batch: "Processing CSV\u{2026}".to_string(),
        }
    }
}

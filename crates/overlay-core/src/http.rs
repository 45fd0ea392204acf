//! Endpoint table and response helpers shared by every server call

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref CONTENT_DISPOSITION_FILENAME: Regex =
        Regex::new(r#"(?i)filename="?([^"]+)"?"#).unwrap();
}

/// Default download name when `/api/export` sends no usable header
pub const EXPORT_FALLBACK_FILENAME: &str = "output.bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Server routes used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    OverlayMap,
    Extract,
    TemplateExport,
    Download,
    Export,
    Batch,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::OverlayMap => "/overlay-map",
            Endpoint::Extract => "/extract",
            Endpoint::TemplateExport => "/api/export",
            Endpoint::Download => "/download",
            Endpoint::Export => "/export",
            Endpoint::Batch => "/batch",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::OverlayMap => Method::Get,
            _ => Method::Post,
        }
    }

    /// Message shown when the server gives no reason of its own
    pub fn failure_message(&self) -> &'static str {
        match self {
            Endpoint::OverlayMap => "Failed to load overlay map",
            Endpoint::Extract => "Extract failed",
            Endpoint::TemplateExport | Endpoint::Export => "Export failed",
            Endpoint::Download => "Download failed",
            Endpoint::Batch => "Batch failed",
        }
    }

    /// Join the route onto an optional base URL
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Message of a JSON `{"error": "..."}` body, or `fallback` when there is none
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Filename from a `Content-Disposition` header value
pub fn filename_from_content_disposition(header: Option<&str>) -> Option<String> {
    let header = header?;
    CONTENT_DISPOSITION_FILENAME
        .captures(header)
        .map(|caps| caps[1].to_string())
}

/// Default output name derived from the uploaded template's extension
pub fn fallback_filename(template_name: &str) -> &'static str {
    if template_name.to_lowercase().ends_with(".pdf") {
        "output.pdf"
    } else {
        "output.docx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_table() {
        assert_eq!(Endpoint::OverlayMap.method(), Method::Get);
        assert_eq!(Endpoint::OverlayMap.path(), "/overlay-map");
        assert_eq!(Endpoint::TemplateExport.path(), "/api/export");
        assert_eq!(Endpoint::Batch.method().as_str(), "POST");
        assert_eq!(Endpoint::Extract.url("https://host/"), "https://host/extract");
        assert_eq!(Endpoint::Download.url(""), "/download");
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message(r#"{"error":"Upload the .docx as field 'file'"}"#, "Extract failed"),
            "Upload the .docx as field 'file'"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("<html>500</html>", "Batch failed"), "Batch failed");
        assert_eq!(error_message(r#"{"detail":"x"}"#, "Batch failed"), "Batch failed");
        assert_eq!(error_message(r#"{"error":""}"#, "Batch failed"), "Batch failed");
        assert_eq!(error_message("", "Download failed"), "Download failed");
    }

    #[test]
    fn test_filename_quoted_and_bare() {
        assert_eq!(
            filename_from_content_disposition(Some(r#"attachment; filename="filled.docx""#)),
            Some("filled.docx".to_string())
        );
        assert_eq!(
            filename_from_content_disposition(Some("attachment; FILENAME=report.pdf")),
            Some("report.pdf".to_string())
        );
        assert_eq!(filename_from_content_disposition(Some("inline")), None);
        assert_eq!(filename_from_content_disposition(None), None);
    }

    #[test]
    fn test_fallback_filename_by_extension() {
        assert_eq!(fallback_filename("Template.PDF"), "output.pdf");
        assert_eq!(fallback_filename("template.docx"), "output.docx");
        assert_eq!(fallback_filename("template"), "output.docx");
    }
}

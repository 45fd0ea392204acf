//! Fetch wrappers for the server endpoints

use crate::error::{js_message, JsResultExt};
use overlay_core::http::{
    error_message, fallback_filename, filename_from_content_disposition, Endpoint,
    EXPORT_FALLBACK_FILENAME,
};
use overlay_core::{
    BatchResponse, ContentPayload, ExportLinks, ExportRequest, ExtractResponse, OverlayError,
    OverlayLayoutMap, Result, SelectionSnapshot,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, HtmlAnchorElement, Request, RequestInit, Response, Url};

pub const MISSING_TEMPLATE_FOR_EXPORT: &str = "Please upload a Template Document first.";
pub const MISSING_TEMPLATE_FOR_DOWNLOAD: &str =
    "Upload a Template Document in the first blade, then try again.";

/// A generated document waiting to be saved
pub struct DownloadedFile {
    pub blob: Blob,
    pub filename: String,
}

impl DownloadedFile {
    /// Save through a temporary object URL and a synthetic anchor click
    pub fn save(&self) -> Result<()> {
        let document = crate::dom::document().or_overlay()?;
        let url = Url::create_object_url_with_blob(&self.blob).or_overlay()?;

        let clicked = (|| -> std::result::Result<(), JsValue> {
            let a = document
                .create_element("a")?
                .dyn_into::<HtmlAnchorElement>()?;
            a.set_href(&url);
            a.set_download(&self.filename);
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("No document body"))?;
            body.append_child(&a)?;
            a.click();
            body.remove_child(&a)?;
            Ok(())
        })();

        Url::revoke_object_url(&url).or_overlay()?;
        clicked.or_overlay()
    }
}

/// Client for the document server
#[derive(Debug, Clone, Default)]
pub struct ServerClient {
    base: String,
}

impl ServerClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// `GET /overlay-map`; any failure is a resource-load error
    pub async fn fetch_overlay_map(&self) -> Result<OverlayLayoutMap> {
        let endpoint = Endpoint::OverlayMap;
        let response = self
            .send(endpoint, None)
            .await
            .map_err(|e| OverlayError::resource_load("overlay map", e.to_string()))?;
        let text = read_text(&response).await?;
        if !response.ok() {
            return Err(OverlayError::resource_load(
                "overlay map",
                format!("{} ({})", endpoint.failure_message(), response.status()),
            ));
        }
        OverlayLayoutMap::from_json(&text)
            .map_err(|e| OverlayError::resource_load("overlay map", e.to_string()))
    }

    /// `POST /extract` with the regulatory document as `file`
    pub async fn extract(&self, file: &File) -> Result<ExtractResponse> {
        let form = FormData::new().or_overlay()?;
        form.append_with_blob("file", file).or_overlay()?;
        self.json(Endpoint::Extract, Some(form.into())).await
    }

    /// `POST /api/export`: template plus the human-readable content lines
    pub async fn export_with_template(
        &self,
        snapshot: &SelectionSnapshot,
        template: Option<&File>,
    ) -> Result<DownloadedFile> {
        let template =
            template.ok_or_else(|| OverlayError::MissingFile(MISSING_TEMPLATE_FOR_EXPORT.into()))?;
        let payload = serde_json::to_string(&ContentPayload::from_snapshot(snapshot))?;
        self.download_blob(
            Endpoint::TemplateExport,
            template,
            &payload,
            EXPORT_FALLBACK_FILENAME,
        )
        .await
    }

    /// `POST /download`: template plus the full selection snapshot
    pub async fn download(
        &self,
        snapshot: &SelectionSnapshot,
        template: Option<&File>,
    ) -> Result<DownloadedFile> {
        let template = template
            .ok_or_else(|| OverlayError::MissingFile(MISSING_TEMPLATE_FOR_DOWNLOAD.into()))?;
        let payload = serde_json::to_string(snapshot)?;
        let fallback = fallback_filename(&template.name());
        self.download_blob(Endpoint::Download, template, &payload, fallback)
            .await
    }

    /// `POST /export` with a JSON body
    pub async fn export_single(
        &self,
        snapshot: &SelectionSnapshot,
        company_id: &str,
    ) -> Result<ExportLinks> {
        let body = serde_json::to_string(&ExportRequest::new(snapshot, company_id))?;
        self.json(Endpoint::Export, Some(JsValue::from_str(&body)))
            .await
    }

    /// `POST /batch` with the CSV as `file`
    pub async fn process_csv(&self, file: &File) -> Result<BatchResponse> {
        let form = FormData::new().or_overlay()?;
        form.append_with_blob("file", file).or_overlay()?;
        self.json(Endpoint::Batch, Some(form.into())).await
    }

    async fn download_blob(
        &self,
        endpoint: Endpoint,
        template: &File,
        snapshot_json: &str,
        fallback: &str,
    ) -> Result<DownloadedFile> {
        let form = FormData::new().or_overlay()?;
        form.append_with_blob("template_file", template)
            .or_overlay()?;
        form.append_with_str("snapshot", snapshot_json)
            .or_overlay()?;

        let response = self.send(endpoint, Some(form.into())).await?;
        if !response.ok() {
            return Err(server_error(endpoint, &response).await);
        }

        let disposition = response
            .headers()
            .get("Content-Disposition")
            .or_overlay()?;
        let filename = filename_from_content_disposition(disposition.as_deref())
            .unwrap_or_else(|| fallback.to_string());

        let blob = JsFuture::from(response.blob().or_overlay()?)
            .await
            .or_overlay()?
            .dyn_into::<Blob>()
            .or_overlay()?;
        Ok(DownloadedFile { blob, filename })
    }

    async fn json<T: DeserializeOwned>(&self, endpoint: Endpoint, body: Option<JsValue>) -> Result<T> {
        let response = self.send(endpoint, body).await?;
        if !response.ok() {
            return Err(server_error(endpoint, &response).await);
        }
        let text = read_text(&response).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn send(&self, endpoint: Endpoint, body: Option<JsValue>) -> Result<Response> {
        let window = crate::dom::window().or_overlay()?;
        let url = endpoint.url(&self.base);

        let opts = RequestInit::new();
        opts.set_method(endpoint.method().as_str());
        let is_json = body.as_ref().map(|b| b.is_string()).unwrap_or(false);
        if let Some(body) = &body {
            opts.set_body(body);
        }

        let request = Request::new_with_str_and_init(&url, &opts).or_overlay()?;
        if is_json {
            request
                .headers()
                .set("Content-Type", "application/json")
                .or_overlay()?;
        }

        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| OverlayError::Server {
                status: 0,
                message: format!("{}: {}", endpoint.failure_message(), js_message(&e)),
            })?;
        response.dyn_into::<Response>().or_overlay()
    }
}

async fn read_text(response: &Response) -> Result<String> {
    let text = JsFuture::from(response.text().or_overlay()?)
        .await
        .or_overlay()?;
    Ok(text.as_string().unwrap_or_default())
}

/// Turn a non-2xx response into an error carrying the body's message
async fn server_error(endpoint: Endpoint, response: &Response) -> OverlayError {
    let body = read_text(response).await.unwrap_or_default();
    OverlayError::Server {
        status: response.status(),
        message: error_message(&body, endpoint.failure_message()),
    }
}

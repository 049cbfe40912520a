//! Raster and paginated exports through html2canvas and jsPDF.
//!
//! Both libraries are optional page scripts. [`support`] reports which are
//! present; the core refuses capture exports whose library is missing.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlElement};

use trellis_core::{CaptureRequest, CaptureSupport, ExportKind, PageLayout};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(target: &HtmlElement, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = jspdf, js_name = jsPDF)]
    type JsPdf;

    #[wasm_bindgen(catch, constructor, js_namespace = jspdf)]
    fn new(options: &JsValue) -> Result<JsPdf, JsValue>;

    #[wasm_bindgen(catch, method, js_name = addImage)]
    fn add_image(
        this: &JsPdf,
        data_url: &str,
        format: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method)]
    fn save(this: &JsPdf, filename: &str) -> Result<(), JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanvasOptions {
    width: f64,
    height: f64,
    scale: f64,
    #[serde(rename = "useCORS")]
    use_cors: bool,
    allow_taint: bool,
}

#[derive(Serialize)]
struct PdfOptions {
    orientation: &'static str,
    unit: &'static str,
    format: [f64; 2],
}

/// JPEG quality for images embedded in the PDF.
const PDF_IMAGE_QUALITY: f64 = 0.9;

/// Which capture libraries the page has loaded.
pub fn support() -> CaptureSupport {
    let has = |name: &str| {
        web_sys::window()
            .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str(name)).unwrap_or(false))
            .unwrap_or(false)
    };
    let raster = has("html2canvas");
    CaptureSupport {
        raster,
        paginated: raster && has("jspdf"),
    }
}

/// Capture `target` and save the result. Errors come back as display text
/// for the session error log.
pub async fn capture(
    kind: ExportKind,
    request: CaptureRequest,
    page: Option<PageLayout>,
    target: HtmlElement,
) -> Result<(), String> {
    run(kind, request, page, &target)
        .await
        .map_err(|e| crate::dom::js_error_message(&e))
}

async fn run(
    kind: ExportKind,
    request: CaptureRequest,
    page: Option<PageLayout>,
    target: &HtmlElement,
) -> Result<(), JsValue> {
    let options = CanvasOptions {
        width: request.width,
        height: request.height,
        scale: request.scale,
        use_cors: true,
        allow_taint: true,
    };
    let promise = html2canvas(target, &serde_wasm_bindgen::to_value(&options)?)?;
    let canvas: HtmlCanvasElement = JsFuture::from(promise).await?.dyn_into()?;
    tracing::debug!(%kind, width = canvas.width(), height = canvas.height(), "captured preview");

    match kind {
        ExportKind::Raster => {
            let data_url = canvas.to_data_url_with_type("image/png")?;
            crate::dom::download_url(kind.filename(), &data_url)
        }
        ExportKind::Paginated => {
            let page = page.ok_or_else(|| JsValue::from_str("no page layout"))?;
            let data_url = canvas.to_data_url_with_type_and_encoder_options(
                "image/jpeg",
                &JsValue::from_f64(PDF_IMAGE_QUALITY),
            )?;
            let options = PdfOptions {
                orientation: page.orientation.code(),
                unit: "px",
                format: [page.width, page.height],
            };
            let pdf = JsPdf::new(&serde_wasm_bindgen::to_value(&options)?)?;
            pdf.add_image(&data_url, "JPEG", 0.0, 0.0, page.width, page.height)?;
            pdf.save(kind.filename())
        }
        ExportKind::File => Err(JsValue::from_str("file export needs no capture")),
    }
}

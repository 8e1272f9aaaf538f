/// Storage API client for MailClip
///
/// Plain HTTP/JSON against the backend collection. Every call is a single
/// round trip; failures are returned as strings for the caller to surface.
/// No retry, no timeout policy.
use crate::email_data::{CapturedEmail, EmailDraft};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Backend base URL, matching the extension's host permission
pub const API_BASE: &str = "http://localhost:8000";

/// GET /emails
pub async fn fetch_emails() -> Result<Vec<CapturedEmail>, String> {
    let response = request("GET", &format!("{}/emails", API_BASE), None).await?;
    serde_wasm_bindgen::from_value(response).map_err(|e| format!("Failed to parse emails: {:?}", e))
}

/// POST /capture — the backend rejects duplicates by message_id
pub async fn post_capture(draft: &EmailDraft) -> Result<CapturedEmail, String> {
    let body =
        serde_json::to_string(draft).map_err(|e| format!("Failed to serialize draft: {}", e))?;
    let response = request("POST", &format!("{}/capture", API_BASE), Some(body)).await?;
    serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse capture response: {:?}", e))
}

/// PUT /emails/{id} — annotations are the only mutable field
pub async fn update_annotations(id: i64, annotations: &str) -> Result<(), String> {
    let body = serde_json::json!({ "annotations": annotations }).to_string();
    request("PUT", &format!("{}/emails/{}", API_BASE, id), Some(body)).await?;
    Ok(())
}

/// DELETE /emails/{id}
pub async fn delete_email(id: i64) -> Result<(), String> {
    request("DELETE", &format!("{}/emails/{}", API_BASE, id), None).await?;
    Ok(())
}

/// Map a capture failure onto the message shown on the page
pub fn capture_failure_message(error: &str) -> String {
    if error.contains("already captured") {
        "📧 This email was already captured!".to_string()
    } else if error.contains("NetworkError") || error.contains("Failed to fetch") {
        format!(
            "Failed to capture email. Cannot connect to backend. Is it running on {}?",
            API_BASE
        )
    } else {
        format!("Failed to capture email. {}", error)
    }
}

async fn request(method: &str, url: &str, body: Option<String>) -> Result<JsValue, String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to build request: {:?}", e))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| format!("Failed to set headers: {:?}", e))?;
    }

    let window = web_sys::window().ok_or_else(|| "No window available".to_string())?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{:?}", e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|e| format!("Unexpected fetch result: {:?}", e))?;

    if response.ok() {
        let json = response
            .json()
            .map_err(|e| format!("Failed to read response: {:?}", e))?;
        JsFuture::from(json)
            .await
            .map_err(|e| format!("Failed to decode response: {:?}", e))
    } else {
        let text = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        Err(format!("HTTP {}: {}", response.status(), text))
    }
}

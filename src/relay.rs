/// Background relay for MailClip
///
/// The content script cannot call the backend directly (cross-origin), so the
/// background script's JS glue forwards each runtime message here. One request
/// in, one response out; nothing is queued or retried.
use crate::api;
use crate::email_data::{CAPTURE_EMAIL, RelayRequest, RelayResponse};
use wasm_bindgen::prelude::*;

/// Entry point called by the background glue for every runtime message.
/// Always resolves to a `{ success, data | error }` envelope.
#[wasm_bindgen]
pub async fn handle_runtime_message(payload: JsValue) -> JsValue {
    let response = match serde_wasm_bindgen::from_value::<RelayRequest>(payload) {
        Ok(request) => dispatch(request).await,
        Err(e) => RelayResponse::err(format!("Malformed relay request: {:?}", e)),
    };

    serde_wasm_bindgen::to_value(&response).unwrap_or(JsValue::NULL)
}

async fn dispatch(request: RelayRequest) -> RelayResponse {
    if request.kind != CAPTURE_EMAIL {
        return reject_unknown(&request.kind);
    }

    log::info!("Relaying capture for message {}", request.email.message_id);

    match api::post_capture(&request.email).await {
        Ok(stored) => {
            log::info!("Capture stored with id {}", stored.id);
            RelayResponse::ok(stored)
        }
        Err(e) => {
            log::warn!("Capture failed: {}", e);
            RelayResponse::err(e)
        }
    }
}

fn reject_unknown(kind: &str) -> RelayResponse {
    RelayResponse::err(format!("Unknown message kind: {}", kind))
}

/// MailClip - Browser extension for capturing webmail messages
/// Built with Rust + WASM + Yew

mod api;
mod content;
mod email_data;
mod extract;
mod message_id;
mod operations;
mod relay;
mod tracker;
pub mod ui;

pub use relay::handle_runtime_message;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export identifier derivation for JavaScript access
#[wasm_bindgen]
pub fn derive_message_id(url: &str, subject: &str, sender: &str, timestamp: &str) -> String {
    message_id::derive_message_id(url, subject, sender, timestamp)
}

// Start the Yew app for the dashboard page
#[wasm_bindgen]
pub fn start_dashboard() {
    yew::Renderer::<ui::dashboard::Dashboard>::new().render();
}

// Start the tracker inside the webmail page
#[wasm_bindgen]
pub fn start_content_script() {
    content::start();
}

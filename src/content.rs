/// Content script for MailClip
///
/// Runs inside the webmail page: watches the main content region for view
/// changes, keeps exactly one capture button injected, and drives the capture
/// flow through the background relay.
use crate::api::capture_failure_message;
use crate::email_data::{RelayRequest, RelayResponse};
use crate::extract::{
    self, BodyCandidate, CANDIDATE_SELECTOR, CHROME_SELECTOR, Candidate, MAIN_CONTENT_SELECTOR,
};
use crate::message_id;
use crate::tracker::{
    MUTATION_DEBOUNCE_MS, REINJECT_DELAY_MS, STARTUP_POLL_INTERVAL_MS, TrackerState,
    URL_POLL_INTERVAL_MS,
};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, Window};

// Import JS bridge functions
#[wasm_bindgen(module = "/runtime.js")]
extern "C" {
    /// browser.runtime.sendMessage wrapper provided by the extension glue
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(payload: JsValue) -> Result<JsValue, JsValue>;
}

const CAPTURE_BUTTON_CLASS: &str = "mailclip-capture-btn";
const NOTIFICATION_CLASS: &str = "mailclip-notification";
const BUTTON_LABEL: &str = "📎 Capture to MailClip";

/// The opened-message container in the webmail markup
const MESSAGE_CONTAINER_SELECTOR: &str = ".adn";
/// Places to anchor the capture button, most specific first
const ACTION_BAR_SELECTORS: &[&str] = &[
    ".iH > div",
    "[role=\"toolbar\"]",
    ".adn > div:first-child",
    ".h7",
];

const NOTIFICATION_TIMEOUT_MS: i32 = 5000;

const BUTTON_STYLE: &str = "background: linear-gradient(135deg, #1a73e8, #1557b0); color: white; \
     border: none; padding: 8px 16px; border-radius: 20px; font-size: 13px; font-weight: 500; \
     cursor: pointer; margin-left: 8px; z-index: 1000; position: relative;";

const NOTIFICATION_STYLE: &str = "position: fixed; top: 20px; right: 20px; padding: 12px 16px; \
     border-radius: 8px; color: white; font-size: 14px; z-index: 10000; \
     box-shadow: 0 2px 8px rgba(0, 0, 0, 0.25);";

#[derive(Clone, Copy, PartialEq)]
enum NoticeKind {
    Success,
    Error,
}

/// One instance per page session
pub struct ContentScript {
    state: RefCell<TrackerState>,
    pending_debounce: RefCell<Option<i32>>,
    last_url: RefCell<String>,
}

/// Wire up the content script. Called once from the wasm entry point.
pub fn start() {
    let script = Rc::new(ContentScript {
        state: RefCell::new(TrackerState::new()),
        pending_debounce: RefCell::new(None),
        last_url: RefCell::new(current_url()),
    });

    wait_for_webmail(script);
}

/// Poll until the webmail main region exists, then install the machinery
fn wait_for_webmail(script: Rc<ContentScript>) {
    if webmail_ready() {
        on_webmail_ready(&script);
        return;
    }

    let handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
    let callback = Closure::<dyn FnMut()>::new({
        let script = script.clone();
        let handle = handle.clone();
        move || {
            if webmail_ready() {
                if let Some(id) = handle.borrow_mut().take() {
                    window().clear_interval_with_handle(id);
                }
                on_webmail_ready(&script);
            }
        }
    });

    match window().set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        STARTUP_POLL_INTERVAL_MS,
    ) {
        Ok(id) => *handle.borrow_mut() = Some(id),
        Err(e) => log::error!("Failed to start readiness poll: {:?}", e),
    }
    callback.forget();
}

fn on_webmail_ready(script: &Rc<ContentScript>) {
    log::info!("Webmail UI detected, starting tracker");
    setup_observer(script);
    setup_url_change_listener(script);
    attempt_injection(script, false);
}

/// MutationObserver over the main region, childList + subtree only
fn setup_observer(script: &Rc<ContentScript>) {
    let Some(target) = query(MAIN_CONTENT_SELECTOR) else {
        return;
    };

    let callback = Closure::<dyn FnMut()>::new({
        let script = script.clone();
        move || on_mutation(&script)
    });

    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(e) => {
            log::error!("Failed to create mutation observer: {:?}", e);
            return;
        }
    };
    callback.forget();

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);

    if let Err(e) = observer.observe_with_options(&target, &init) {
        log::error!("Failed to observe main region: {:?}", e);
    }
}

fn on_mutation(script: &Rc<ContentScript>) {
    if script.state.borrow().is_injecting() {
        return;
    }

    let view_id = message_id::view_identifier(&current_url(), quick_subject().as_deref());
    let changed = script.state.borrow_mut().note_view(&view_id);
    if !changed {
        return;
    }

    // New message in view: drop stale affordances, then re-inject after the
    // DOM churn settles
    remove_capture_buttons();
    schedule_injection(script, MUTATION_DEBOUNCE_MS, true);
}

/// Webmail navigates with pushState, so watch the URL by polling and via
/// popstate
fn setup_url_change_listener(script: &Rc<ContentScript>) {
    let poll = Closure::<dyn FnMut()>::new({
        let script = script.clone();
        move || {
            let url = current_url();
            if *script.last_url.borrow() == url {
                return;
            }
            *script.last_url.borrow_mut() = url;
            on_navigation(&script);
        }
    });
    if let Err(e) = window().set_interval_with_callback_and_timeout_and_arguments_0(
        poll.as_ref().unchecked_ref(),
        URL_POLL_INTERVAL_MS,
    ) {
        log::error!("Failed to start URL poll: {:?}", e);
    }
    poll.forget();

    let on_popstate = Closure::<dyn FnMut()>::new({
        let script = script.clone();
        move || on_navigation(&script)
    });
    if let Err(e) = window()
        .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
    {
        log::error!("Failed to listen for popstate: {:?}", e);
    }
    on_popstate.forget();
}

fn on_navigation(script: &Rc<ContentScript>) {
    remove_capture_buttons();
    script.state.borrow_mut().reset_view();
    schedule_injection(script, REINJECT_DELAY_MS, false);
}

/// Debounced injection: a newer schedule supersedes a pending one
fn schedule_injection(script: &Rc<ContentScript>, delay_ms: i32, throttled: bool) {
    if let Some(id) = script.pending_debounce.borrow_mut().take() {
        window().clear_timeout_with_handle(id);
    }

    let callback = Closure::once({
        let script = script.clone();
        move || {
            *script.pending_debounce.borrow_mut() = None;
            attempt_injection(&script, throttled);
        }
    });

    match window().set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        delay_ms,
    ) {
        Ok(id) => *script.pending_debounce.borrow_mut() = Some(id),
        Err(e) => log::error!("Failed to schedule injection: {:?}", e),
    }
    callback.forget();
}

fn attempt_injection(script: &Rc<ContentScript>, throttled: bool) {
    let now = js_sys::Date::now();
    let claimed = if throttled {
        script.state.borrow_mut().try_begin_injection(now)
    } else {
        script.state.borrow_mut().begin_injection(now)
    };
    if !claimed {
        return;
    }

    inject_capture_button();
    script.state.borrow_mut().finish_injection();
}

/// Place the capture button next to the opened message's actions.
/// A guard lookup keeps it at one button even under racing mutations.
fn inject_capture_button() {
    if query(MAIN_CONTENT_SELECTOR).is_none() {
        return;
    }
    let Some(container) = query(MESSAGE_CONTAINER_SELECTOR) else {
        // List view, nothing opened
        return;
    };

    remove_capture_buttons();

    let Some(button) = build_capture_button() else {
        return;
    };

    let anchor = ACTION_BAR_SELECTORS
        .iter()
        .find_map(|selector| container.query_selector(selector).ok().flatten());

    let target = anchor.unwrap_or_else(|| container.clone());
    if target
        .query_selector(&format!(".{}", CAPTURE_BUTTON_CLASS))
        .ok()
        .flatten()
        .is_some()
    {
        return;
    }

    let result = if anchor_is_container(&target, &container) {
        target.prepend_with_node_1(&button)
    } else {
        target.append_child(&button).map(|_| ())
    };
    if let Err(e) = result {
        log::warn!("Failed to insert capture button: {:?}", e);
    }
}

fn anchor_is_container(target: &Element, container: &Element) -> bool {
    target.is_same_node(Some(container.as_ref()))
}

fn build_capture_button() -> Option<Element> {
    let button = document().create_element("button").ok()?;
    button.set_class_name(CAPTURE_BUTTON_CLASS);
    button.set_id(&format!("{}-{}", CAPTURE_BUTTON_CLASS, Uuid::new_v4()));
    button.set_text_content(Some(BUTTON_LABEL));
    let _ = button.set_attribute("style", BUTTON_STYLE);

    let on_click = Closure::<dyn FnMut()>::new(move || {
        spawn_local(async {
            capture_current_email().await;
        });
    });
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .ok()?;
    on_click.forget();

    Some(button)
}

fn remove_capture_buttons() {
    let Ok(buttons) = document().query_selector_all(&format!(".{}", CAPTURE_BUTTON_CLASS)) else {
        return;
    };
    for i in 0..buttons.length() {
        if let Some(node) = buttons.item(i) {
            if let Some(element) = node.dyn_ref::<Element>() {
                element.remove();
            }
        }
    }
}

// --- Capture flow ---

async fn capture_current_email() {
    let Some(draft) = extract_from_page() else {
        show_notification("No email data found", NoticeKind::Error);
        return;
    };

    log::info!(
        "Capturing message {} ({})",
        draft.message_id,
        draft.subject
    );

    let request = RelayRequest::capture(draft);
    let payload = match serde_wasm_bindgen::to_value(&request) {
        Ok(payload) => payload,
        Err(e) => {
            show_notification(
                &capture_failure_message(&format!("{:?}", e)),
                NoticeKind::Error,
            );
            return;
        }
    };

    match sendRuntimeMessage(payload).await {
        Ok(raw) => match serde_wasm_bindgen::from_value::<RelayResponse>(raw) {
            Ok(response) if response.success => {
                show_notification(
                    "✅ Email captured successfully! Check your dashboard.",
                    NoticeKind::Success,
                );
            }
            Ok(response) => {
                let error = response.error.unwrap_or_else(|| "Unknown error".to_string());
                show_notification(&capture_failure_message(&error), NoticeKind::Error);
            }
            Err(e) => {
                show_notification(
                    &capture_failure_message(&format!("{:?}", e)),
                    NoticeKind::Error,
                );
            }
        },
        Err(e) => {
            show_notification(
                &capture_failure_message(&format!("{:?}", e)),
                NoticeKind::Error,
            );
        }
    }
}

/// Harvest candidates from the live DOM and build the capture request
fn extract_from_page() -> Option<crate::email_data::EmailDraft> {
    let main = query(MAIN_CONTENT_SELECTOR)?;

    let mut fields = extract::classify(&harvest_candidates(&main));
    if fields.body.is_none() {
        fields.body = extract::pick_fallback_body(&harvest_body_candidates(&main));
    }

    let now_iso: String = js_sys::Date::new_0().to_iso_string().into();
    extract::build_draft(fields, &current_url(), &now_iso)
}

fn harvest_candidates(main: &Element) -> Vec<Candidate> {
    let Ok(nodes) = main.query_selector_all(CANDIDATE_SELECTOR) else {
        return Vec::new();
    };

    let mut candidates = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else { continue };
        let Some(element) = node.dyn_ref::<Element>() else {
            continue;
        };
        let text = element.text_content().unwrap_or_default();
        candidates.push(Candidate::new(
            &element.tag_name(),
            &element.class_name(),
            &text,
        ));
    }
    candidates
}

fn harvest_body_candidates(main: &Element) -> Vec<BodyCandidate> {
    let Ok(nodes) = main.query_selector_all("*") else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else { continue };
        let Some(element) = node.dyn_ref::<Element>() else {
            continue;
        };
        let text = element.text_content().unwrap_or_default();
        if text.trim().is_empty() {
            continue;
        }
        candidates.push(BodyCandidate {
            text,
            child_count: element.child_element_count(),
            in_chrome: element.closest(CHROME_SELECTOR).ok().flatten().is_some(),
        });
    }
    candidates
}

/// First plausible heading, used only for view-change detection
fn quick_subject() -> Option<String> {
    let main = query(MAIN_CONTENT_SELECTOR)?;
    let headings = main.query_selector_all("h2").ok()?;
    for i in 0..headings.length() {
        let text = headings.item(i)?.text_content().unwrap_or_default();
        let text = text.trim();
        let len = text.chars().count();
        if len > 0 && len < 200 {
            return Some(text.to_string());
        }
    }
    None
}

// --- Notifications ---

fn show_notification(message: &str, kind: NoticeKind) {
    remove_notifications();

    let Ok(notice) = document().create_element("div") else {
        return;
    };
    notice.set_class_name(NOTIFICATION_CLASS);

    let background = match kind {
        NoticeKind::Success => "#188038",
        NoticeKind::Error => "#d93025",
    };
    let icon = match kind {
        NoticeKind::Success => "✅",
        NoticeKind::Error => "❌",
    };
    let _ = notice.set_attribute(
        "style",
        &format!("{} background: {};", NOTIFICATION_STYLE, background),
    );
    notice.set_text_content(Some(&format!("{} {}", icon, message)));

    if let Some(body) = document().body() {
        let _ = body.append_child(&notice);
    }

    let dismiss = Closure::once(move || {
        notice.remove();
    });
    if window()
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.as_ref().unchecked_ref(),
            NOTIFICATION_TIMEOUT_MS,
        )
        .is_err()
    {
        log::warn!("Failed to schedule notification dismissal");
    }
    dismiss.forget();
}

fn remove_notifications() {
    let Ok(notices) = document().query_selector_all(&format!(".{}", NOTIFICATION_CLASS)) else {
        return;
    };
    for i in 0..notices.length() {
        if let Some(node) = notices.item(i) {
            if let Some(element) = node.dyn_ref::<Element>() {
                element.remove();
            }
        }
    }
}

// --- Platform helpers ---

fn window() -> Window {
    web_sys::window().expect("content script runs in a window")
}

fn document() -> Document {
    window().document().expect("window has a document")
}

fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok().flatten()
}

fn webmail_ready() -> bool {
    query(MAIN_CONTENT_SELECTOR).is_some()
}

fn current_url() -> String {
    window().location().href().unwrap_or_default()
}

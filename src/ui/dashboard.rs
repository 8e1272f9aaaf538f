/// Dashboard page: captured emails with search, sort, annotation and delete

use crate::api;
use crate::email_data::CapturedEmail;
use crate::operations::{SortKey, SortOrder, collection_stats, filter_emails, sort_emails};
use crate::ui::components::{AnnotationsNote, EmptyState, StatCard};
use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

const BODY_PREVIEW_CHARS: usize = 240;

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let state = use_state(|| ViewState::Loading);
    let emails = use_state(Vec::<CapturedEmail>::new);
    let search_query = use_state(String::new);
    let sort_key = use_state(|| SortKey::CapturedAt);
    let sort_order = use_state(|| SortOrder::Descending);
    let editing = use_state(|| None::<CapturedEmail>);
    let edit_annotations = use_state(String::new);

    // Load the collection on mount
    {
        let state = state.clone();
        let emails = emails.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match api::fetch_emails().await {
                    Ok(fetched) => {
                        emails.set(fetched);
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to load emails: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Search handler
    let on_search_input = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search_query.set(input.value());
            }
        })
    };

    // Sort column handler
    let on_sort_change = {
        let sort_key = sort_key.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                sort_key.set(SortKey::parse(&select.value()));
            }
        })
    };

    // Sort direction toggle
    let on_toggle_order = {
        let sort_order = sort_order.clone();
        Callback::from(move |_| {
            sort_order.set(sort_order.toggled());
        })
    };

    // Open the edit modal for one email
    let on_open_edit = {
        let editing = editing.clone();
        let edit_annotations = edit_annotations.clone();

        Callback::from(move |email: CapturedEmail| {
            edit_annotations.set(email.annotations.clone());
            editing.set(Some(email));
        })
    };

    // Close the modal without saving
    let on_cancel_edit = {
        let editing = editing.clone();
        Callback::from(move |_| {
            editing.set(None);
        })
    };

    // Annotations textarea input
    let on_edit_input = {
        let edit_annotations = edit_annotations.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                edit_annotations.set(textarea.value());
            }
        })
    };

    // Save annotations: local state only updates after the server accepted
    let on_save_edit = {
        let editing = editing.clone();
        let edit_annotations = edit_annotations.clone();
        let emails = emails.clone();
        let state = state.clone();

        Callback::from(move |_| {
            let Some(email) = (*editing).clone() else {
                return;
            };
            let annotations = (*edit_annotations).clone();
            let editing = editing.clone();
            let emails = emails.clone();
            let state = state.clone();

            spawn_local(async move {
                match api::update_annotations(email.id, &annotations).await {
                    Ok(()) => {
                        let updated: Vec<CapturedEmail> = emails
                            .iter()
                            .map(|e| {
                                if e.id == email.id {
                                    let mut e = e.clone();
                                    e.annotations = annotations.clone();
                                    e
                                } else {
                                    e.clone()
                                }
                            })
                            .collect();
                        emails.set(updated);
                        editing.set(None);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to save annotations: {}", e)));
                    }
                }
            });
        })
    };

    // Delete with explicit confirmation
    let on_delete = {
        let emails = emails.clone();
        let state = state.clone();

        Callback::from(move |id: i64| {
            if !confirm_delete() {
                return;
            }

            let emails = emails.clone();
            let state = state.clone();
            spawn_local(async move {
                match api::delete_email(id).await {
                    Ok(()) => {
                        let remaining: Vec<CapturedEmail> =
                            emails.iter().filter(|e| e.id != id).cloned().collect();
                        emails.set(remaining);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to delete email: {}", e)));
                    }
                }
            });
        })
    };

    // Open the source message in the webmail UI
    let on_open_source = {
        Callback::from(move |url: String| {
            if let Some(window) = web_sys::window() {
                let _ = window.open_with_url_and_target(&url, "_blank");
            }
        })
    };

    let visible = sort_emails(
        &filter_emails(&emails, &search_query),
        *sort_key,
        *sort_order,
    );
    let (total, annotated, latest) = collection_stats(&emails);

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"📎 MailClip"}</h1>
                <p class="subtitle">{"View and manage your captured emails"}</p>
            </div>

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading emails..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            if !matches!(*state, ViewState::Loading) {
                // Stats row
                <div style="display: flex; gap: 12px; margin: 16px 0;">
                    <StatCard value={total.to_string()} label={"Total Emails"} />
                    <StatCard value={annotated.to_string()} label={"With Annotations"} />
                    <StatCard
                        value={latest.as_deref().map(format_capture_time).unwrap_or_else(|| "N/A".to_string())}
                        label={"Latest Capture"}
                    />
                </div>

                // Search and sort controls
                <div class="search-container" style="display: flex; gap: 8px;">
                    <input
                        type="text"
                        placeholder="Search emails by subject, sender, or content..."
                        value={(*search_query).clone()}
                        oninput={on_search_input}
                        class="search-input"
                        style="flex: 1;"
                    />
                    <select onchange={on_sort_change} class="sort-select">
                        <option value="captured_at" selected={*sort_key == SortKey::CapturedAt}>{"Date Captured"}</option>
                        <option value="subject" selected={*sort_key == SortKey::Subject}>{"Subject"}</option>
                        <option value="sender" selected={*sort_key == SortKey::Sender}>{"Sender"}</option>
                        <option value="timestamp" selected={*sort_key == SortKey::Timestamp}>{"Email Date"}</option>
                    </select>
                    <Button onclick={on_toggle_order} variant={ButtonVariant::Secondary}>
                        {if *sort_order == SortOrder::Ascending { "↑ Asc" } else { "↓ Desc" }}
                    </Button>
                </div>

                // Email list
                if visible.is_empty() {
                    if search_query.is_empty() {
                        <EmptyState
                            title={"No emails found"}
                            hint={"Start capturing emails from your webmail to see them here"}
                        />
                    } else {
                        <EmptyState
                            title={"No emails found"}
                            hint={"Try adjusting your search terms"}
                        />
                    }
                } else {
                    <div class="email-list">
                        {for visible.iter().map(|email| html! {
                            <EmailCard
                                key={email.id}
                                email={email.clone()}
                                on_edit={on_open_edit.clone()}
                                on_delete={on_delete.clone()}
                                on_open={on_open_source.clone()}
                            />
                        })}
                    </div>
                }
            }

            // Edit modal: annotations are the only writable field
            if let Some(email) = (*editing).clone() {
                <EditModal
                    email={email}
                    annotations={(*edit_annotations).clone()}
                    on_input={on_edit_input.clone()}
                    on_save={on_save_edit.clone()}
                    on_cancel={on_cancel_edit.clone()}
                />
            }
        </div>
    }
}

// Email card component
#[derive(Properties, PartialEq)]
struct EmailCardProps {
    email: CapturedEmail,
    on_edit: Callback<CapturedEmail>,
    on_delete: Callback<i64>,
    on_open: Callback<String>,
}

#[function_component(EmailCard)]
fn email_card(props: &EmailCardProps) -> Html {
    let email = &props.email;

    html! {
        <div class="email-card" style="background: white; border-radius: 8px; padding: 16px; margin-bottom: 12px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);">
            <div class="email-header">
                <div class="email-subject" style="font-weight: 600; font-size: 16px;">
                    {"📧 "}{&email.subject}
                </div>
                <div class="email-meta" style="display: flex; gap: 16px; color: #5f6368; font-size: 13px; margin-top: 4px;">
                    <span>{"👤 "}{&email.sender}</span>
                    <span>{"📅 "}{&email.timestamp}</span>
                    <span>{format!("Captured: {}", format_capture_time(&email.captured_at))}</span>
                </div>
            </div>

            <div class="email-body" style="margin: 12px 0; color: #3c4043; font-size: 14px;">
                {preview(&email.body, BODY_PREVIEW_CHARS)}
            </div>

            if !email.annotations.is_empty() {
                <AnnotationsNote text={email.annotations.clone()} />
            }

            <div class="email-actions" style="display: flex; gap: 8px;">
                <Button
                    onclick={props.on_edit.reform({
                        let email = email.clone();
                        move |_| email.clone()
                    })}
                >
                    {"✏️ Edit"}
                </Button>
                <Button
                    onclick={props.on_open.reform({
                        let url = email.url.clone();
                        move |_| url.clone()
                    })}
                    variant={ButtonVariant::Secondary}
                >
                    {"🔗 Open Source"}
                </Button>
                <Button
                    onclick={props.on_delete.reform({
                        let id = email.id;
                        move |_| id
                    })}
                    variant={ButtonVariant::Danger}
                >
                    {"🗑️ Delete"}
                </Button>
            </div>
        </div>
    }
}

// Annotations edit modal
#[derive(Properties, PartialEq)]
struct EditModalProps {
    email: CapturedEmail,
    annotations: String,
    on_input: Callback<InputEvent>,
    on_save: Callback<()>,
    on_cancel: Callback<()>,
}

#[function_component(EditModal)]
fn edit_modal(props: &EditModalProps) -> Html {
    let email = &props.email;

    let on_backdrop_click = props.on_cancel.reform(|_: MouseEvent| ());
    let stop_propagation = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div
            class="modal"
            style="position: fixed; inset: 0; background: rgba(0, 0, 0, 0.5); display: flex; align-items: center; justify-content: center; z-index: 10000;"
            onclick={on_backdrop_click}
        >
            <div
                class="modal-content"
                style="background: white; border-radius: 8px; padding: 20px; width: 560px; max-width: 90vw; max-height: 85vh; overflow-y: auto;"
                onclick={stop_propagation}
            >
                <div class="modal-header" style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px;">
                    <h2 style="font-size: 18px;">{format!("Edit Email: {}", email.subject)}</h2>
                    <Button onclick={props.on_cancel.reform(|_| ())} variant={ButtonVariant::Secondary}>
                        {"✗"}
                    </Button>
                </div>

                <div class="form-group">
                    <label class="form-label">{"Subject"}</label>
                    <input type="text" class="form-input" value={email.subject.clone()} readonly={true} />
                </div>

                <div class="form-group">
                    <label class="form-label">{"Sender"}</label>
                    <input type="text" class="form-input" value={email.sender.clone()} readonly={true} />
                </div>

                <div class="form-group">
                    <label class="form-label">{"Email Body"}</label>
                    <textarea class="form-textarea" value={email.body.clone()} readonly={true} rows="6" />
                </div>

                <div class="form-group">
                    <label class="form-label">{"Annotations"}</label>
                    <textarea
                        class="form-textarea"
                        value={props.annotations.clone()}
                        oninput={props.on_input.clone()}
                        placeholder="Add your notes, tags, or annotations here..."
                        rows="4"
                    />
                </div>

                <div style="display: flex; gap: 8px; justify-content: flex-end; margin-top: 12px;">
                    <Button onclick={props.on_cancel.reform(|_| ())} variant={ButtonVariant::Secondary}>
                        {"Cancel"}
                    </Button>
                    <Button onclick={props.on_save.reform(|_| ())}>
                        {"Save Annotations"}
                    </Button>
                </div>
            </div>
        </div>
    }
}

// Helper functions

fn confirm_delete() -> bool {
    web_sys::window()
        .and_then(|window| {
            window
                .confirm_with_message("Are you sure you want to delete this email?")
                .ok()
        })
        .unwrap_or(false)
}

/// Render an ISO timestamp as local "YYYY-MM-DD HH:MM"
fn format_capture_time(iso: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    if date.get_time().is_nan() {
        return iso.to_string();
    }
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes()
    )
}

/// Character-bounded body preview for the card view
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated.trim_end())
}

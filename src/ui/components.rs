/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub value: String,
    pub label: String,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div style="flex: 1; background: white; border-radius: 8px; padding: 16px; text-align: center; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);">
            <div style="font-size: 22px; font-weight: 600; color: #1a73e8;">
                {&props.value}
            </div>
            <div style="font-size: 13px; color: #5f6368; margin-top: 4px;">
                {&props.label}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub title: String,
    #[prop_or_default]
    pub hint: Option<String>,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div style="text-align: center; padding: 48px 16px; color: #5f6368;">
            <h3 style="margin-bottom: 8px;">{&props.title}</h3>
            if let Some(hint) = &props.hint {
                <p style="font-size: 14px;">{hint}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AnnotationsNoteProps {
    pub text: String,
}

#[function_component(AnnotationsNote)]
pub fn annotations_note(props: &AnnotationsNoteProps) -> Html {
    html! {
        <div style="background: #f8f9fa; padding: 12px; border-radius: 6px; margin-bottom: 12px; border-left: 4px solid #1a73e8;">
            <strong>{"Annotations: "}</strong>
            {&props.text}
        </div>
    }
}

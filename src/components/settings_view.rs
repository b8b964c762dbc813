use crate::state::AppState;
use dioxus::prelude::*;

/// Read-only view of the selected interface and its stored IPv4 values.
#[component]
pub fn SettingsView(state: Signal<AppState>) -> Element {
    let text = state.read().settings_text.clone();

    rsx! {
        div { class: "section",
            div { class: "section-title", "Current Settings" }
            if text.is_empty() {
                div { class: "placeholder", "Select an adapter to show its IPv4 settings" }
            } else {
                pre { class: "settings-text", "{text}" }
            }
        }
    }
}

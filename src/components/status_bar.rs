use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn StatusBar(state: Signal<AppState>) -> Element {
    let backup_path = state.read().config.backup_path().display().to_string();
    let message = state.read().message.clone();

    rsx! {
        div { class: "status-bar",
            if let Some(msg) = message {
                div {
                    class: if msg.is_error { "message error" } else { "message success" },
                    "{msg.text}"
                }
            }

            div { class: "status-section",
                div { class: "status-label", "Backup file:" }
                div { class: "status-value", "{backup_path}" }
            }
        }
    }
}

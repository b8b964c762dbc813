use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn ActionButtons(
    state: Signal<AppState>,
    on_backup: EventHandler<()>,
    on_restore: EventHandler<()>,
) -> Element {
    let is_loading = state.read().is_loading;
    let enabled = state.read().actions_enabled();

    rsx! {
        div { class: "button-group",
            button {
                class: "secondary",
                disabled: !enabled,
                onclick: move |_| on_backup.call(()),
                "Backup"
            }
            button {
                class: "primary",
                disabled: !enabled,
                onclick: move |_| on_restore.call(()),
                if is_loading { "Restoring..." } else { "Restore" }
            }
        }
    }
}

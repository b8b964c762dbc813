use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn NetworkSelector(state: Signal<AppState>, on_change: EventHandler<Option<usize>>) -> Element {
    let interfaces = state.read().interfaces.clone();
    let selected_index = state.read().selected_interface_index;
    let selected_value = selected_index.map(|i| i.to_string()).unwrap_or_default();

    rsx! {
        div { class: "section",
            div { class: "section-title", "Network Interface" }
            div { class: "form-group",
                label { r#for: "interface-select", "Select Network Adapter" }
                select {
                    id: "interface-select",
                    value: "{selected_value}",
                    onchange: move |evt| {
                        on_change.call(evt.value().parse::<usize>().ok());
                    },
                    option {
                        value: "",
                        selected: selected_index.is_none(),
                        "-- none --"
                    }
                    for (index, interface) in interfaces.iter().enumerate() {
                        option {
                            value: "{index}",
                            selected: selected_index == Some(index),
                            "{interface.display_name()}"
                        }
                    }
                }
            }
        }
    }
}

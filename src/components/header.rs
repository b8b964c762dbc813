use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::md_action_icons::MdSettingsBackupRestore;

#[component]
pub fn Header() -> Element {
    rsx! {
        div { class: "header",
            Icon {
                width: 28,
                height: 28,
                icon: MdSettingsBackupRestore
            }
            h1 { "Windows IPv4 Backup" }
        }
    }
}

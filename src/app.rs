use crate::components::*;
use crate::ipv4::{
    Ipv4Manager, Netsh, WindowsRegistry, list_default_interfaces, load_config, save_config,
    write_error_log,
};
use crate::state::{AppState, Message};
use dioxus::prelude::*;
use std::error::Error;

#[allow(non_snake_case)]
pub fn App() -> Element {
    let mut state = use_signal(AppState::new);

    use_effect(move || {
        spawn(async move {
            initialize_app(state).await;
        });
    });

    let on_interface_change = move |index: Option<usize>| {
        spawn(async move {
            change_interface(state, index).await;
        });
    };

    let on_backup = move |_| {
        spawn(async move {
            backup_settings(state).await;
        });
    };

    let on_restore = move |_| {
        spawn(async move {
            restore_settings(state).await;
        });
    };

    rsx! {
        style { {include_str!("../assets/main.css")} }
        div { class: "app-container",
            Header {}
            div { class: "content",
                NetworkSelector {
                    state: state,
                    on_change: on_interface_change
                }
                SettingsView { state: state }
                ActionButtons {
                    state: state,
                    on_backup: on_backup,
                    on_restore: on_restore
                }
            }
            StatusBar { state: state }
        }
    }
}

fn manager() -> Ipv4Manager<WindowsRegistry, Netsh> {
    Ipv4Manager::new(WindowsRegistry, Netsh)
}

/// Shows a failed operation in the status bar and records it in the error log.
fn report_error(mut state: Signal<AppState>, context: &str, error: &dyn Error) {
    tracing::error!("{}: {}", context, error);

    let log_path = state.read().config.error_log_path();
    if let Err(e) = write_error_log(&log_path, error) {
        tracing::error!("Failed to write {}: {}", log_path.display(), e);
    }

    state
        .write()
        .set_message(Message::error(format!("{}: {}", context, error)));
}

async fn initialize_app(mut state: Signal<AppState>) {
    state.write().clear_message();

    match load_config() {
        Ok(config) => {
            state.write().config = config;
        }
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            state
                .write()
                .set_message(Message::error(format!("Failed to load config: {}", e)));
        }
    }

    let exclude_pattern = state.read().config.exclude_pattern.clone();
    match list_default_interfaces(exclude_pattern.as_deref()) {
        Ok(interfaces) => {
            if interfaces.is_empty() {
                state
                    .write()
                    .set_message(Message::error("No network interfaces found"));
                return;
            }
            let remembered = {
                let mut write_state = state.write();
                write_state.interfaces = interfaces;
                write_state.remembered_interface_index()
            };
            if remembered.is_some() {
                state.write().select_interface(remembered);
                refresh_settings(state).await;
            }
        }
        Err(e) => report_error(state, "Failed to get network interfaces", &e),
    }
}

async fn change_interface(mut state: Signal<AppState>, index: Option<usize>) {
    let config = {
        let mut write_state = state.write();
        write_state.clear_message();
        if !write_state.select_interface(index) {
            return;
        }
        write_state.config.clone()
    };

    if let Err(e) = save_config(&config) {
        tracing::warn!("Failed to save config: {}", e);
    }

    refresh_settings(state).await;
}

async fn refresh_settings(mut state: Signal<AppState>) {
    let interface = state.read().selected_interface().cloned();
    let Some(interface) = interface else {
        state.write().settings_text.clear();
        return;
    };

    match manager().describe(&interface) {
        Ok(text) => {
            state.write().settings_text = text;
        }
        Err(e) => {
            state.write().settings_text.clear();
            report_error(state, "Failed to read current settings", &e);
        }
    }
}

async fn backup_settings(mut state: Signal<AppState>) {
    let (interface, path) = {
        let mut write_state = state.write();
        write_state.clear_message();
        let Some(interface) = write_state.selected_interface().cloned() else {
            return;
        };
        (interface, write_state.config.backup_path())
    };

    match manager().backup(&interface, &path) {
        Ok(()) => {
            state.write().set_message(Message::success(format!(
                "Backed up {} to {}",
                interface.name,
                path.display()
            )));
        }
        Err(e) => report_error(state, "Backup failed", &e),
    }
}

async fn restore_settings(mut state: Signal<AppState>) {
    let (interface, path) = {
        let mut write_state = state.write();
        write_state.clear_message();
        let Some(interface) = write_state.selected_interface().cloned() else {
            return;
        };
        write_state.set_loading(true);
        (interface, write_state.config.backup_path())
    };

    let result = manager().restore(&interface, &path).await;

    state.write().set_loading(false);

    match result {
        Ok(()) => {
            state.write().set_message(Message::success(format!(
                "Restored {} from {}",
                interface.name,
                path.display()
            )));
            refresh_settings(state).await;
        }
        Err(e) => report_error(state, "Restore failed", &e),
    }
}

mod action_buttons;
mod header;
mod network_selector;
mod settings_view;
mod status_bar;

pub use action_buttons::ActionButtons;
pub use header::Header;
pub use network_selector::NetworkSelector;
pub use settings_view::SettingsView;
pub use status_bar::StatusBar;

use crate::ipv4::{AppConfig, InterfaceDescriptor};

#[derive(Clone, Debug)]
pub struct AppState {
    pub interfaces: Vec<InterfaceDescriptor>,
    pub selected_interface_index: Option<usize>,
    pub settings_text: String,
    pub config: AppConfig,
    pub message: Option<Message>,
    pub is_loading: bool,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            interfaces: Vec::new(),
            selected_interface_index: None,
            settings_text: String::new(),
            config: AppConfig::new(),
            message: None,
            is_loading: false,
        }
    }

    pub fn selected_interface(&self) -> Option<&InterfaceDescriptor> {
        self.selected_interface_index
            .and_then(|index| self.interfaces.get(index))
    }

    /// Selects an interface, or clears the selection when `index` is out of range.
    /// Returns true when the selection changed.
    pub fn select_interface(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.interfaces.len());
        if index == self.selected_interface_index {
            return false;
        }
        self.selected_interface_index = index;
        self.settings_text.clear();
        self.config.last_interface = self.selected_interface().map(|i| i.id.clone());
        true
    }

    /// Index of the interface that was selected when the app last ran.
    pub fn remembered_interface_index(&self) -> Option<usize> {
        let id = self.config.last_interface.as_deref()?;
        self.interfaces
            .iter()
            .position(|i| i.id.eq_ignore_ascii_case(id))
    }

    pub fn actions_enabled(&self) -> bool {
        self.selected_interface().is_some() && !self.is_loading
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub mod backup_file;
pub mod config;
pub mod error_log;
pub mod manager;
pub mod network;
pub mod registry;
pub mod toggle;
pub mod types;

pub use config::{AppConfig, load_config, save_config};
pub use error_log::write_error_log;
pub use manager::Ipv4Manager;
pub use network::list_default_interfaces;
pub use registry::WindowsRegistry;
pub use toggle::Netsh;
pub use types::InterfaceDescriptor;

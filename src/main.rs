mod app;
mod components;
mod ipv4;
mod state;

use dioxus::desktop::tao::dpi::LogicalSize;
use dioxus::desktop::{Config, WindowBuilder};
use tracing_subscriber::EnvFilter;

const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 620;
const MIN_WIDTH: u32 = 480;
const MIN_HEIGHT: u32 = 480;

fn main() {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Windows IPv4 Backup starting");

    let window_builder = WindowBuilder::new()
        .with_title("Windows IPv4 Backup")
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64))
        .with_min_inner_size(LogicalSize::new(MIN_WIDTH as f64, MIN_HEIGHT as f64));

    dioxus::LaunchBuilder::new()
        .with_cfg(
            Config::new()
                .with_menu(None)
                .with_window(window_builder),
        )
        .launch(app::App);
}

//! EPAGAL Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod error;
mod labels;
mod map;
mod models;
mod page_state;
mod session;
mod store;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

const APP_NAME: &str = "epagal-ui";

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::default();
    match rolling_logger::init_logger(APP_NAME, config.log_capacity, &config.log_level) {
        Ok(()) => {
            let _ = rolling_logger::info(&format!("{} {} -> {}", APP_NAME, env!("CARGO_PKG_VERSION"), config.api_base_url));
        }
        Err(e) => web_sys::console::error_1(&format!("logger: {}", e).into()),
    }

    mount_to_body(App);
}

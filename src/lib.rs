#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod file_set;
pub mod filter;
pub mod marker;
pub mod monitor;
pub mod path_utils;
pub mod router;
pub mod session;
pub mod settings;
pub mod toggle;

#[cfg(test)]
pub mod test_utils;

use config::{ENV_LANG, ENV_LOG};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub fn init_locale() {
    let locale = std::env::var(ENV_LANG).unwrap_or_else(|_| "en".to_string());
    rust_i18n::set_locale(&locale);
}

/// Logs go to stderr so they never land in the middle of a prompt.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

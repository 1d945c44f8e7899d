#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

use alldisable::error::AppError;
use alldisable::{cli, init_locale, init_logging};

fn main() {
    init_locale();
    init_logging();

    if let Err(e) = cli::run() {
        let message = e
            .downcast_ref::<AppError>()
            .map(AppError::display_localized)
            .unwrap_or_else(|| e.to_string());
        eprintln!("{}", t!("messages.error", error = message));
        std::process::exit(1);
    }
}

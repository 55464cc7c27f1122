use tracing::warn;

/// Locales with translation files under `locales/`
pub const SUPPORTED_LOCALES: &[&str] = &["en", "fi"];

/// Switch the locale used for user-facing messages.
///
/// Unknown locales fall back to English.
pub fn set_locale(locale: &str) {
    let locale = locale.split(['-', '_']).next().unwrap_or(locale);
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!("Unsupported locale {}, falling back to en", locale);
        rust_i18n::set_locale("en");
    }
}

/// Translated text for a message key in the current locale
pub fn translate(key: &str) -> String {
    t!(key).to_string()
}

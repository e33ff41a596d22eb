//! Internationalization (i18n) module for CreoTools.
//!
//! Uses a simple key→string HashMap loaded at runtime from embedded translation data.
//! The `t!("key")` macro looks up the current language, falling back to English.
//! Language can be switched at runtime via `set_language()`.

use std::collections::HashMap;
use std::sync::Mutex;

/// Global translation state.
static I18N: Mutex<Option<I18nState>> = Mutex::new(None);

struct I18nState {
    current_lang: String,
    /// lang_code → (key → translated_string)
    translations: HashMap<String, HashMap<String, String>>,
}

/// Supported languages: (code, native_name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English")];

/// Initialize the i18n system with embedded translations.
/// Call once at startup.
pub fn init() {
    let mut translations: HashMap<String, HashMap<String, String>> = HashMap::new();

    translations.insert(
        "en".to_string(),
        parse_translations(include_str!("../locales/en.txt")),
    );

    let state = I18nState {
        current_lang: "en".to_string(),
        translations,
    };
    *I18N.lock().unwrap() = Some(state);
}

/// Set the active language. If `code` is not a known language, falls back to "en".
pub fn set_language(code: &str) {
    if let Ok(mut guard) = I18N.lock()
        && let Some(ref mut state) = *guard
    {
        if state.translations.contains_key(code) {
            state.current_lang = code.to_string();
        } else {
            state.current_lang = "en".to_string();
        }
    }
}

/// Get the current language code.
pub fn current_language() -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(ref state) = *guard
    {
        return state.current_lang.clone();
    }
    "en".to_string()
}

/// Look up a translation key. Returns the translated string if found,
/// or falls back to English, or returns the key itself as last resort.
pub fn translate(key: &str) -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(ref state) = *guard
    {
        if let Some(map) = state.translations.get(&state.current_lang)
            && let Some(val) = map.get(key)
        {
            return val.clone();
        }
        if state.current_lang != "en"
            && let Some(map) = state.translations.get("en")
            && let Some(val) = map.get(key)
        {
            return val.clone();
        }
    }
    // Last resort: return the key itself
    key.to_string()
}

fn parse_translations(data: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            map.insert(key.trim().to_string(), val.trim().to_string());
        }
    }
    map
}

/// Translation macro. Usage: `t!("chat.send")` or `t!("toolbar.zoom_pct", pct = 65)`
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn unknown_keys_fall_back_to_themselves() {
        super::init();
        assert_eq!(super::translate("no.such.key"), "no.such.key");
    }
}

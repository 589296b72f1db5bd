//! Preferred interface languages.

/// Languages offered at registration, by native name.
pub const LANGUAGES: [&str; 11] = [
    "English",
    "isiZulu",
    "isiXhosa",
    "Sesotho",
    "Setswana",
    "Sepedi",
    "siSwati",
    "Tshivenda",
    "Xitsonga",
    "isiNdebele",
    "Afrikaans",
];

/// Returns the supported language matching `name`, or English.
#[must_use]
pub fn resolve_language(name: &str) -> &'static str {
    LANGUAGES
        .iter()
        .copied()
        .find(|lang| lang.eq_ignore_ascii_case(name.trim()))
        .unwrap_or(LANGUAGES[0])
}

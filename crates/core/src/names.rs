//! Translation between display names and provider identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

/// `(display name, provider identifier)` pairs that don't follow the usual
/// camel-case convention.
const ALIASES: &[(&str, &str)] = &[("Wukong", "MonkeyKing")];

/// Identifier to request from a provider for a roster name.
pub fn request_id(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(display, _)| display.eq_ignore_ascii_case(name))
        .map(|(_, internal)| *internal)
        .unwrap_or(name)
}

/// Human-facing name for a provider identifier.
///
/// Aliases win; otherwise a space is inserted at every lower-to-upper case
/// boundary (`MissFortune` becomes `Miss Fortune`).
pub fn display_name(internal: &str) -> String {
    static CASE_BOUNDARY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("invalid case boundary regex"));

    if let Some((display, _)) = ALIASES
        .iter()
        .find(|(_, alias)| alias.eq_ignore_ascii_case(internal))
    {
        return (*display).to_string();
    }

    CASE_BOUNDARY
        .replace_all(internal, "$1 $2")
        .trim()
        .to_string()
}

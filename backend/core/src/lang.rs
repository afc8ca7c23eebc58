//! The fixed set of translation target languages.
//!
//! Each entry doubles as a command registration: `/<code>` is a translate
//! command. Codes outside this table are never treated as directives, so
//! arbitrary two-letter commands typed in chat cannot misfire.

/// A supported translation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Two-letter ISO 639-1 code, lowercase.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
}

/// All languages the bot can translate into, sorted by code.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "de", name: "German" },
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "it", name: "Italian" },
    Language { code: "pa", name: "Punjabi" },
    Language { code: "ru", name: "Russian" },
];

/// Look up a language by its two-letter code, case-insensitively.
pub fn language_by_code(code: &str) -> Option<&'static Language> {
    let code = code.to_lowercase();
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

/// Display name for a code, falling back to the code itself.
pub fn language_name(code: &str) -> &str {
    match language_by_code(code) {
        Some(lang) => lang.name,
        None => code,
    }
}

//! Supported translation languages.
//!
//! The set is fixed at build time and shared by the CLI validation layer and
//! the `languages` subcommand. Matching is case-insensitive; the canonical
//! spelling is what gets embedded in translation prompts.

/// Languages the translation prompt builder knows how to name, alphabetical.
pub const SUPPORTED_LANGUAGES: [&str; 50] = [
    "Arabic",
    "Bengali",
    "Bulgarian",
    "Catalan",
    "Chinese (Simplified)",
    "Chinese (Traditional)",
    "Croatian",
    "Czech",
    "Danish",
    "Dutch",
    "English",
    "Estonian",
    "Finnish",
    "French",
    "German",
    "Greek",
    "Hebrew",
    "Hindi",
    "Hungarian",
    "Icelandic",
    "Indonesian",
    "Irish",
    "Italian",
    "Japanese",
    "Kazakh",
    "Korean",
    "Latvian",
    "Lithuanian",
    "Malay",
    "Maltese",
    "Norwegian",
    "Persian (Farsi)",
    "Polish",
    "Portuguese",
    "Romanian",
    "Russian",
    "Serbian",
    "Slovak",
    "Slovenian",
    "Spanish",
    "Swedish",
    "Tagalog",
    "Tamil",
    "Thai",
    "Turkish",
    "Ukrainian",
    "Urdu",
    "Vietnamese",
    "Welsh",
    "Yiddish",
];

/// Resolve a user-supplied language name to its canonical spelling.
pub fn canonical(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|lang| lang.eq_ignore_ascii_case(name))
}

/// Whether a source-language argument asks for model-side detection.
pub fn is_auto(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("auto") || name.eq_ignore_ascii_case("auto-detect")
}

//! On-device language detection.
//!
//! The detector is restricted to the bot's supported-language set, which
//! keeps classification sharp for short chat messages: a message is only
//! ever attributed to a language the bot can actually translate.

use lingobot_core::{LanguageDetector, SUPPORTED_LANGUAGES};
use whatlang::{Detector, Lang};

pub struct WhatlangDetector {
    detector: Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        let allowlist: Vec<Lang> = SUPPORTED_LANGUAGES
            .iter()
            .filter_map(|l| lang_for_code(l.code))
            .collect();
        Self { detector: Detector::with_allowlist(allowlist) }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let lang = self.detector.detect_lang(text)?;
        code_for_lang(lang).map(str::to_string)
    }
}

fn lang_for_code(code: &str) -> Option<Lang> {
    match code {
        "de" => Some(Lang::Deu),
        "en" => Some(Lang::Eng),
        "es" => Some(Lang::Spa),
        "fr" => Some(Lang::Fra),
        "hi" => Some(Lang::Hin),
        "it" => Some(Lang::Ita),
        "pa" => Some(Lang::Pan),
        "ru" => Some(Lang::Rus),
        _ => None,
    }
}

fn code_for_lang(lang: Lang) -> Option<&'static str> {
    match lang {
        Lang::Deu => Some("de"),
        Lang::Eng => Some("en"),
        Lang::Spa => Some("es"),
        Lang::Fra => Some("fr"),
        Lang::Hin => Some("hi"),
        Lang::Ita => Some("it"),
        Lang::Pan => Some("pa"),
        Lang::Rus => Some("ru"),
        _ => None,
    }
}

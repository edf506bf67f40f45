use serde::Serialize;

pub const SOURCE_LANGUAGE: &str = "English";

pub const LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("French", "fr"),
    ("Spanish", "es"),
    ("German", "de"),
    ("Italian", "it"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Chinese (Simplified)", "zh-cn"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Arabic", "ar"),
    ("Hindi", "hi"),
    ("Dutch", "nl"),
];

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

pub fn language_code(name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

pub fn all() -> Vec<Language> {
    LANGUAGES
        .iter()
        .map(|&(name, code)| Language { name, code })
        .collect()
}

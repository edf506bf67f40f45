#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    LanguagesList,
    ParseText,
    RebuildText,
    TranslateText,
    TranslateAndSave,
    SettingsLoad,
    SettingsSave,
    SettingsAdd,
    SettingsRemove,
    SettingsSelectAll,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "languages.list" => Command::LanguagesList,
            "parse_text" => Command::ParseText,
            "rebuild_text" => Command::RebuildText,
            "translate_text" => Command::TranslateText,
            "translate_and_save" => Command::TranslateAndSave,
            "settings.load" => Command::SettingsLoad,
            "settings.save" => Command::SettingsSave,
            "settings.add" => Command::SettingsAdd,
            "settings.remove" => Command::SettingsRemove,
            "settings.select_all" => Command::SettingsSelectAll,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::language::{self, SOURCE_LANGUAGE};
use crate::model::target::{LanguageCombination, OutputTarget};

const SETTINGS_FILE: &str = "localizer_settings.json";

pub fn default_settings_path() -> PathBuf {
    if let Ok(local) = std::env::var("LOCALAPPDATA") {
        return PathBuf::from(local).join("Localizer").join("settings.json");
    }
    working_dir().join(SETTINGS_FILE)
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub language_combinations: Vec<LanguageCombination>,
}

impl Default for Settings {
    /// One English target in the working directory.
    fn default() -> Self {
        let path = working_dir().join("english.properties");
        Settings {
            language_combinations: vec![LanguageCombination::new(
                SOURCE_LANGUAGE,
                path.to_string_lossy().to_string(),
            )],
        }
    }
}

impl Settings {
    pub fn add_combination(&mut self, combination: LanguageCombination) -> Result<(), CoreError> {
        if combination.language.trim().is_empty() {
            return Err(CoreError::Validation("Please select a language.".into()));
        }
        if combination.output_path.trim().is_empty() {
            return Err(CoreError::Validation("Please select an output file.".into()));
        }
        if language::language_code(&combination.language).is_none() {
            return Err(CoreError::UnknownLanguage(combination.language));
        }
        if self
            .language_combinations
            .iter()
            .any(|c| c.same_pair(&combination))
        {
            return Err(CoreError::Validation(
                "This combination already exists.".into(),
            ));
        }

        self.language_combinations.push(combination);
        Ok(())
    }

    pub fn remove_combination(&mut self, index: usize) -> Option<LanguageCombination> {
        if index < self.language_combinations.len() {
            Some(self.language_combinations.remove(index))
        } else {
            None
        }
    }

    pub fn set_all_enabled(&mut self, enabled: bool) {
        for c in self.language_combinations.iter_mut() {
            c.enabled = enabled;
        }
    }

    pub fn targets(&self) -> Result<Vec<OutputTarget>, CoreError> {
        self.language_combinations
            .iter()
            .map(LanguageCombination::resolve)
            .collect()
    }
}

/// Missing file yields the defaults; a malformed one is an error.
pub fn load(path: &Path) -> Result<Settings, CoreError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let data = fs::read_to_string(path)
        .map_err(|e| CoreError::Settings(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str::<Settings>(&data)
        .map_err(|e| CoreError::Settings(format!("invalid {}: {e}", path.display())))
}

pub fn save(path: &Path, settings: &Settings) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CoreError::Settings(format!("failed to serialize settings: {e}")))?;

    write_atomic(path, json.as_bytes()).map_err(|e| CoreError::io(path, e))?;

    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "settings".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn default_has_enabled_english_target() {
        let s = Settings::default();
        assert_eq!(s.language_combinations.len(), 1);
        let c = &s.language_combinations[0];
        assert_eq!(c.language, "English");
        assert!(c.enabled);
        assert!(c.output_path.ends_with("english.properties"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let s = load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn save_then_load_keeps_order_and_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");

        let mut s = Settings {
            language_combinations: Vec::new(),
        };
        s.add_combination(LanguageCombination::new("French", "fr.properties"))
            .unwrap();
        s.add_combination(LanguageCombination::new("Japanese", "ja.properties"))
            .unwrap();
        s.language_combinations[1].enabled = false;

        save(&path, &s).unwrap();
        assert!(!dir.path().join("cfg").join("settings.json.tmp").exists());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"language_combinations\""));
        assert_eq!(load(&path).unwrap(), s);
    }

    #[test]
    fn parses_sidecar_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "language_combinations": [
                { "language": "German", "output_path": "de.properties", "enabled": false },
                { "language": "Dutch", "output_path": "nl.properties" }
            ] }"#,
        )
        .unwrap();

        let targets = load(&path).unwrap().targets().unwrap();
        assert_eq!(targets[0].language_code, "de");
        assert!(!targets[0].enabled);
        assert_eq!(targets[1].language_code, "nl");
        assert!(targets[1].enabled);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(CoreError::Settings(_))));
    }

    #[test]
    fn add_rejects_duplicates_and_unknown_languages() {
        let mut s = Settings::default();
        let english = s.language_combinations[0].clone();

        let err = s.add_combination(english).unwrap_err();
        assert_eq!(err.to_string(), "This combination already exists.");

        let err = s
            .add_combination(LanguageCombination::new("Elvish", "x.properties"))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownLanguage(_)));

        let err = s
            .add_combination(LanguageCombination::new("French", " "))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select an output file.");
    }

    #[test]
    fn remove_and_toggle() {
        let mut s = Settings::default();
        s.add_combination(LanguageCombination::new("Korean", "ko.properties"))
            .unwrap();

        s.set_all_enabled(false);
        assert!(s.language_combinations.iter().all(|c| !c.enabled));

        assert!(s.remove_combination(5).is_none());
        let removed = s.remove_combination(0).unwrap();
        assert_eq!(removed.language, "English");
        assert_eq!(s.language_combinations.len(), 1);
    }
}

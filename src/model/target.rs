use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::language;

fn default_enabled() -> bool {
    true
}

/// Persisted form of a target, as stored in the settings sidecar.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageCombination {
    #[serde(alias = "language_name")]
    pub language: String,

    pub output_path: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl LanguageCombination {
    pub fn new(language: impl Into<String>, output_path: impl Into<String>) -> Self {
        LanguageCombination {
            language: language.into(),
            output_path: output_path.into(),
            enabled: true,
        }
    }

    pub fn same_pair(&self, other: &LanguageCombination) -> bool {
        self.language == other.language && self.output_path == other.output_path
    }

    pub fn resolve(&self) -> Result<OutputTarget, CoreError> {
        let code = language::language_code(&self.language)
            .ok_or_else(|| CoreError::UnknownLanguage(self.language.clone()))?;

        Ok(OutputTarget {
            language_name: self.language.clone(),
            language_code: code.to_string(),
            output_path: self.output_path.clone(),
            enabled: self.enabled,
        })
    }
}

/// A (language, output file) pair with its language code resolved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub language_name: String,
    pub language_code: String,
    pub output_path: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl OutputTarget {
    pub fn new(
        language_name: impl Into<String>,
        language_code: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        OutputTarget {
            language_name: language_name.into(),
            language_code: language_code.into(),
            output_path: output_path.into(),
            enabled: true,
        }
    }

    pub fn label(&self) -> String {
        format!("{} → {}", self.language_name, self.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_language() {
        let target = LanguageCombination::new("Chinese (Simplified)", "zh.properties")
            .resolve()
            .unwrap();
        assert_eq!(target.language_code, "zh-cn");
        assert!(target.enabled);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = LanguageCombination::new("Klingon", "tlh.properties")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownLanguage(name) if name == "Klingon"));
    }

    #[test]
    fn enabled_defaults_to_true_when_missing() {
        let c: LanguageCombination =
            serde_json::from_str(r#"{ "language": "French", "output_path": "fr.properties" }"#)
                .unwrap();
        assert!(c.enabled);
    }
}

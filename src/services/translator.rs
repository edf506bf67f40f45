use serde_json::Value;

use crate::error::TranslationError;
use crate::services::{ai, google};

/// Maps a value into the target language. One call per entry, no retries.
pub trait Translator {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        (**self).translate(text, target_code)
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        (**self).translate(text, target_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            provider: "google".to_string(),
            api_key: String::new(),
            model: String::new(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_payload(payload: &Value) -> Self {
        let get = |k: &str| payload.get(k).and_then(|v| v.as_str()).unwrap_or("").trim();

        let provider = match get("provider") {
            "" => "google",
            p => p,
        };

        TranslatorConfig {
            provider: provider.to_string(),
            api_key: get("api_key").to_string(),
            model: get("model").to_string(),
        }
    }
}

pub fn build(cfg: &TranslatorConfig) -> Result<Box<dyn Translator>, String> {
    match cfg.provider.as_str() {
        "google" => Ok(Box::new(google::GoogleTranslator::new()?)),
        "openai" | "deepseek" => {
            if cfg.api_key.is_empty() {
                return Err("payload.api_key is required".into());
            }
            if cfg.model.is_empty() {
                return Err("payload.model is required".into());
            }
            Ok(Box::new(ai::ChatTranslator::new(
                &cfg.provider,
                &cfg.api_key,
                &cfg.model,
            )?))
        }
        _ => Err("Unsupported provider".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_defaults_to_google() {
        let cfg = TranslatorConfig::from_payload(&json!({}));
        assert_eq!(cfg, TranslatorConfig::default());
    }

    #[test]
    fn chat_provider_requires_key_and_model() {
        let cfg = TranslatorConfig::from_payload(&json!({ "provider": "openai" }));
        assert_eq!(build(&cfg).err().unwrap(), "payload.api_key is required");

        let cfg = TranslatorConfig::from_payload(&json!({ "provider": "openai", "api_key": "k" }));
        assert_eq!(build(&cfg).err().unwrap(), "payload.model is required");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = TranslatorConfig::from_payload(&json!({ "provider": "babelfish" }));
        assert_eq!(build(&cfg).err().unwrap(), "Unsupported provider");
    }
}

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::TranslationError;
use crate::model::language::LANGUAGES;
use crate::services::translator::Translator;

const TIMEOUT_SECS: u64 = 60;

fn endpoint_for(provider: &str) -> Result<&'static str, String> {
    match provider {
        "openai" => Ok("https://api.openai.com/v1/chat/completions"),
        "deepseek" => Ok("https://api.deepseek.com/v1/chat/completions"),
        _ => Err("Unsupported provider".into()),
    }
}

/// Chat-completions backed adapter (OpenAI-compatible providers).
pub struct ChatTranslator {
    client: Client,
    endpoint: &'static str,
    api_key: String,
    model: String,
}

impl ChatTranslator {
    pub fn new(provider: &str, api_key: &str, model: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| e.to_string())?;

        Ok(ChatTranslator {
            client,
            endpoint: endpoint_for(provider)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

impl Translator for ChatTranslator {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You are a professional software localization translator." },
                { "role": "user", "content": build_prompt(text, target_code) }
            ],
            "temperature": 0.3
        });

        let resp = self
            .client
            .post(self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();

        // Read as text first so a non-JSON error body is not lost.
        let text = resp.text()?;

        if !status.is_success() {
            return Err(TranslationError::new(extract_error_message(status, &text)));
        }

        extract_content(&text)
    }
}

fn extract_content(body: &str) -> Result<String, TranslationError> {
    let json: Value =
        serde_json::from_str(body).map_err(|_| TranslationError::new("Invalid JSON from AI"))?;

    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|t| t.trim().to_string())
        .ok_or_else(|| {
            TranslationError::new("Invalid AI response: missing choices[0].message.content")
        })
}

pub(crate) fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    // { "error": { "message": "..." } } or { "message": "..." }
    if let Ok(v) = serde_json::from_str::<Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    let trimmed = body_text.trim();
    let snippet = if trimmed.chars().count() > 400 {
        let cut: String = trimmed.chars().take(400).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    };

    format!("HTTP {}: {}", status.as_u16(), snippet)
}

fn build_prompt(text: &str, target_code: &str) -> String {
    let language = LANGUAGES
        .iter()
        .find(|(_, code)| *code == target_code)
        .map(|(name, _)| *name)
        .unwrap_or(target_code);

    let mut p = String::new();
    p.push_str(&format!("Translate the following UI text to {language}.\n"));
    p.push_str("Reply with the translation only. Keep placeholders such as {0} or %s unchanged.\n");
    p.push_str("Text:\n");
    p.push_str(text.trim());
    p
}

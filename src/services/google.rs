use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::TranslationError;
use crate::services::ai::extract_error_message;
use crate::services::translator::Translator;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const TIMEOUT_SECS: u64 = 60;

/// Public web endpoint of Google Translate; source language is auto-detected.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new() -> Result<Self, String> {
        Self::with_endpoint(ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| e.to_string())?;

        Ok(GoogleTranslator {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let resp = self
            .client
            .get(self.endpoint.as_str())
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            return Err(TranslationError::new(extract_error_message(status, &body)));
        }

        parse_response(&body)
    }
}

// Shape: [[["translated chunk", "source chunk", ...], ...], null, "detected", ...]
fn parse_response(body: &str) -> Result<String, TranslationError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|_| TranslationError::new("Invalid JSON from translation service"))?;

    let segments = json
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslationError::new("Invalid response: missing translation segments"))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslationError::new("Empty translation returned"));
    }

    Ok(translated)
}

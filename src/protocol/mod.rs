use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::model::language::{self, SOURCE_LANGUAGE};
use crate::model::record::Record;
use crate::model::target::{LanguageCombination, OutputTarget};
use crate::parsers::properties;
use crate::services::pipeline::{self, RunRequest};
use crate::services::progress::StatusEvent;
use crate::services::settings::{self, Settings};
use crate::services::translator::{self, TranslatorConfig};
use crate::services::{batch, encoding, writer};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn str_field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn event(id: &Value, e: &StatusEvent) -> String {
    json!({
        "id": id,
        "status": "event",
        "payload": e
    })
    .to_string()
}

fn settings_path(payload: &Value) -> PathBuf {
    match str_field(payload, "settings_path").trim() {
        "" => settings::default_settings_path(),
        p => PathBuf::from(p),
    }
}

fn source_language(payload: &Value) -> &str {
    match str_field(payload, "source_language").trim() {
        "" => SOURCE_LANGUAGE,
        s => s,
    }
}

/// `payload.input_path` wins over `payload.text`.
fn input_text(payload: &Value) -> Result<String, String> {
    let path = str_field(payload, "input_path").trim();
    if !path.is_empty() {
        return encoding::read_text(Path::new(path)).map_err(|e| e.to_string());
    }
    Ok(str_field(payload, "text").to_string())
}

/// Enabled combinations from `payload.targets`, otherwise from the settings file.
/// Disabled ones are never resolved.
fn targets_from_payload(payload: &Value) -> Result<Vec<OutputTarget>, String> {
    let combinations: Vec<LanguageCombination> = match payload.get("targets") {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone())
            .map_err(|e| format!("invalid payload.targets: {e}"))?,
        _ => {
            settings::load(&settings_path(payload))
                .map_err(|e| e.to_string())?
                .language_combinations
        }
    };

    combinations
        .iter()
        .filter(|c| c.enabled)
        .map(LanguageCombination::resolve)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())
}

fn records_from_payload(payload: &Value) -> Result<Vec<Record>, String> {
    let arr = payload
        .get("records")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "payload.records must be an array".to_string())?;

    let mut records: Vec<Record> = Vec::with_capacity(arr.len());

    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<Record>(v) {
            Ok(r) => records.push(r),
            Err(e) => return Err(format!("invalid record at index {}: {}", i, e)),
        }
    }

    Ok(records)
}

fn settings_response(id: Value, path: &Path, s: &Settings) -> String {
    ok(
        id,
        json!({
            "path": path.to_string_lossy(),
            "settings": s
        }),
    )
}

/// Handles one request line. Streaming commands push event lines through `events`
/// before the returned response line.
pub fn handle(input: &str, events: &mut dyn FnMut(String)) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    tracing::debug!(cmd = cmd_str, "request");

    match Command::from(cmd_str) {
        Command::Ping => ok(id, json!({ "message": "localizer-core alive" })),

        Command::LanguagesList => ok(
            id,
            json!({
                "languages": language::all(),
                "source_language": SOURCE_LANGUAGE
            }),
        ),

        Command::ParseText => {
            let text = match input_text(payload) {
                Ok(t) => t,
                Err(e) => return err(id, e),
            };
            let parsed = properties::parse(&text);
            ok(
                id,
                json!({ "records": parsed.records, "warnings": parsed.warnings }),
            )
        }

        Command::RebuildText => {
            let records = match records_from_payload(payload) {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };
            let lines: Vec<String> = records.iter().map(Record::to_line).collect();
            ok(id, json!({ "text": writer::render(&lines) }))
        }

        Command::TranslateText => translate_text(id, payload, events),

        Command::TranslateAndSave => translate_and_save(id, payload, events),

        Command::SettingsLoad => {
            let path = settings_path(payload);
            match settings::load(&path) {
                Ok(s) => settings_response(id, &path, &s),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::SettingsSave => {
            let settings_val = payload.get("settings").cloned().unwrap_or(Value::Null);
            if settings_val.is_null() {
                return err(id, "payload.settings is required");
            }

            let s: Settings = match serde_json::from_value(settings_val) {
                Ok(v) => v,
                Err(e) => return err(id, format!("invalid payload.settings: {e}")),
            };

            let path = settings_path(payload);
            match settings::save(&path, &s) {
                Ok(()) => settings_response(id, &path, &s),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::SettingsAdd => {
            let language = str_field(payload, "language").trim();
            let output_path = str_field(payload, "output_path").trim();

            update_settings(id, payload, |s| {
                s.add_combination(LanguageCombination::new(language, output_path))
                    .map_err(|e| e.to_string())
            })
        }

        Command::SettingsRemove => {
            let index = match payload
                .get("index")
                .and_then(|v| v.as_u64())
                .and_then(|i| usize::try_from(i).ok())
            {
                Some(i) => i,
                None => return err(id, "payload.index is required"),
            };

            update_settings(id, payload, |s| {
                s.remove_combination(index);
                Ok(())
            })
        }

        Command::SettingsSelectAll => {
            let enabled = payload
                .get("enabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);

            update_settings(id, payload, |s| {
                s.set_all_enabled(enabled);
                Ok(())
            })
        }

        Command::DetectEncoding => {
            let path_str = str_field(payload, "path");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            let path = PathBuf::from(path_str);
            match encoding::decode_file(&path) {
                Ok(decoded) => ok(
                    id,
                    json!({
                        "encoding": decoded.encoding,
                        "bom": decoded.bom,
                        "had_errors": decoded.had_errors
                    }),
                ),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}

fn update_settings<F>(id: Value, payload: &Value, change: F) -> String
where
    F: FnOnce(&mut Settings) -> Result<(), String>,
{
    let path = settings_path(payload);

    let mut s = match settings::load(&path) {
        Ok(s) => s,
        Err(e) => return err(id, e.to_string()),
    };

    if let Err(e) = change(&mut s) {
        return err(id, e);
    }

    match settings::save(&path, &s) {
        Ok(()) => settings_response(id, &path, &s),
        Err(e) => err(id, e.to_string()),
    }
}

/// Single target, returned as content instead of written.
fn translate_text(id: Value, payload: &Value, events: &mut dyn FnMut(String)) -> String {
    let language = str_field(payload, "language").trim();
    if language.is_empty() {
        return err(id, "payload.language is required");
    }

    let target = match LanguageCombination::new(language, "").resolve() {
        Ok(t) => t,
        Err(e) => return err(id, e.to_string()),
    };

    let text = match input_text(payload) {
        Ok(t) => t,
        Err(e) => return err(id, e),
    };

    let translator = match translator::build(&TranslatorConfig::from_payload(payload)) {
        Ok(t) => t,
        Err(e) => return err(id, e),
    };

    let parsed = properties::parse(&text);

    let mut observer = |e: StatusEvent| events(event(&id, &e));
    let out = batch::translate_batch(
        &parsed.records,
        &target,
        source_language(payload),
        &*translator,
        &mut observer,
    );

    ok(
        id,
        json!({
            "text": writer::render(&out.lines),
            "succeeded": out.succeeded,
            "fallbacks": out.fallbacks,
            "warnings": parsed.warnings
        }),
    )
}

fn translate_and_save(id: Value, payload: &Value, events: &mut dyn FnMut(String)) -> String {
    let text = match input_text(payload) {
        Ok(t) => t,
        Err(e) => return err(id, e),
    };

    let targets = match targets_from_payload(payload) {
        Ok(t) => t,
        Err(e) => return err(id, e),
    };

    let translator = match translator::build(&TranslatorConfig::from_payload(payload)) {
        Ok(t) => t,
        Err(e) => return err(id, e),
    };

    let req = RunRequest {
        text: &text,
        targets: &targets,
        source_language: source_language(payload),
    };

    let mut observer = |e: StatusEvent| events(event(&id, &e));
    match pipeline::run(req, &*translator, &mut observer) {
        Ok(summary) => ok(id, json!({ "summary": summary })),
        Err(e) => err(id, e.to_string()),
    }
}

use std::path::Path;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::target::OutputTarget;
use crate::parsers::properties;
use crate::services::batch;
use crate::services::progress::{Phase, Severity, StatusEvent, StatusObserver};
use crate::services::translator::Translator;
use crate::services::writer;

pub struct RunRequest<'a> {
    pub text: &'a str,
    pub targets: &'a [OutputTarget],
    pub source_language: &'a str,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub language: String,
    pub output_path: String,
    pub translated: usize,
    pub fallbacks: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub files: usize,
    pub fallbacks: usize,
    pub warnings: usize,
    pub targets: Vec<TargetReport>,
    pub message: String,
}

pub fn run<T, O>(
    req: RunRequest<'_>,
    translator: &T,
    observer: &mut O,
) -> Result<RunSummary, CoreError>
where
    T: Translator + ?Sized,
    O: StatusObserver + ?Sized,
{
    if req.text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Please enter localization keys to translate.".into(),
        ));
    }

    let selected: Vec<&OutputTarget> = req.targets.iter().filter(|t| t.enabled).collect();
    if selected.is_empty() {
        return Err(CoreError::Validation(
            "Please select at least one output/language combination.".into(),
        ));
    }

    let parsed = properties::parse(req.text);

    for w in &parsed.warnings {
        observer.notify(StatusEvent::new(
            Phase::ParseWarning,
            w.line_number,
            0,
            w.message(),
            Severity::Warning,
        ));
    }

    let entries = parsed.entry_count();
    if entries == 0 {
        return Err(CoreError::Validation(
            "No valid entries found to translate".into(),
        ));
    }

    let total_targets = selected.len();
    let mut reports: Vec<TargetReport> = Vec::with_capacity(total_targets);

    tracing::info!(entries, targets = total_targets, "translation run started");

    for (idx, target) in selected.into_iter().enumerate() {
        let n = idx + 1;

        observer.notify(StatusEvent::new(
            Phase::TargetStarted,
            n,
            total_targets,
            format!(
                "Processing {} ({}/{})...",
                target.language_name, n, total_targets
            ),
            Severity::Info,
        ));
        tracing::info!(output = %target.label(), "processing target");

        let out = batch::translate_batch(
            &parsed.records,
            target,
            req.source_language,
            translator,
            observer,
        );

        if let Err(e) = writer::write(&out.lines, Path::new(&target.output_path)) {
            tracing::error!("{e}");
            observer.notify(StatusEvent::new(
                Phase::Fatal,
                n,
                total_targets,
                format!("Error: {e}"),
                Severity::Error,
            ));
            return Err(e);
        }

        observer.notify(StatusEvent::new(
            Phase::TargetCompleted,
            n,
            total_targets,
            format!("Saved {}", target.label()),
            if out.fallbacks > 0 {
                Severity::Warning
            } else {
                Severity::Info
            },
        ));

        reports.push(TargetReport {
            language: target.language_name.clone(),
            output_path: target.output_path.clone(),
            translated: out.succeeded,
            fallbacks: out.fallbacks,
        });
    }

    let message = format!(
        "Successfully translated and saved {} entries to {} files!",
        entries, total_targets
    );

    observer.notify(StatusEvent::new(
        Phase::RunCompleted,
        total_targets,
        total_targets,
        message.clone(),
        Severity::Info,
    ));
    tracing::info!("{message}");

    Ok(RunSummary {
        entries,
        files: total_targets,
        fallbacks: reports.iter().map(|r| r.fallbacks).sum(),
        warnings: parsed.warnings.len(),
        targets: reports,
        message,
    })
}

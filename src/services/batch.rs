use serde::Serialize;

use crate::model::record::{entry_line, Record};
use crate::model::target::OutputTarget;
use crate::services::progress::{Phase, Severity, StatusEvent, StatusObserver};
use crate::services::translator::Translator;

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct BatchOutput {
    /// One line per input record, in input order.
    pub lines: Vec<String>,
    pub succeeded: usize,
    pub fallbacks: usize,
}

pub fn translate_batch<T, O>(
    records: &[Record],
    target: &OutputTarget,
    source_language: &str,
    translator: &T,
    observer: &mut O,
) -> BatchOutput
where
    T: Translator + ?Sized,
    O: StatusObserver + ?Sized,
{
    let total = records.iter().filter(|r| r.is_entry()).count();
    let passthrough = target.language_name == source_language;

    let mut out = BatchOutput {
        lines: Vec::with_capacity(records.len()),
        ..BatchOutput::default()
    };
    let mut current = 0usize;

    for record in records {
        let (key, value) = match record {
            Record::Comment { raw_line } => {
                out.lines.push(raw_line.clone());
                continue;
            }
            Record::Blank => {
                out.lines.push(String::new());
                continue;
            }
            Record::Entry { key, value } => (key, value),
        };

        current += 1;

        if passthrough {
            out.lines.push(entry_line(key, value));
            out.succeeded += 1;
        } else {
            match translator.translate(value, &target.language_code) {
                Ok(translated) => {
                    tracing::debug!(key = %key, lang = %target.language_code, "translated");
                    out.lines.push(entry_line(key, &translated));
                    out.succeeded += 1;
                }
                Err(e) => {
                    let message = format!(
                        "Failed to translate '{}' for {}: {}",
                        key, target.language_name, e
                    );
                    tracing::warn!("{message}");
                    observer.notify(StatusEvent::new(
                        Phase::EntryFailed,
                        current,
                        total,
                        message,
                        Severity::Error,
                    ));
                    out.lines.push(entry_line(key, value));
                    out.fallbacks += 1;
                }
            }
        }

        observer.notify(StatusEvent::new(
            Phase::EntryProgress,
            current,
            total,
            format!(
                "Processing {}... ({}/{})",
                target.language_name, current, total
            ),
            Severity::Info,
        ));
    }

    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::TranslationError;
    use crate::parsers::properties::parse;
    use crate::services::progress::{CollectingObserver, NoopObserver};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Dictionary-backed translator; values missing from the map fail.
    pub(crate) struct MapTranslator {
        map: HashMap<String, String>,
        pub(crate) calls: Cell<usize>,
    }

    impl MapTranslator {
        pub(crate) fn new(pairs: &[(&str, &str)]) -> Self {
            MapTranslator {
                map: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Translator for MapTranslator {
        fn translate(&self, text: &str, _target_code: &str) -> Result<String, TranslationError> {
            self.calls.set(self.calls.get() + 1);
            self.map
                .get(text)
                .cloned()
                .ok_or_else(|| TranslationError::new(format!("no translation for {text}")))
        }
    }

    fn french() -> OutputTarget {
        OutputTarget::new("French", "fr", "out.properties")
    }

    #[test]
    fn substitutes_values_and_passes_structure_through() {
        let parsed = parse("a.b=Hello\n# note\n\nc.d=World");
        let t = MapTranslator::new(&[("Hello", "Bonjour"), ("World", "Monde")]);
        let mut obs = CollectingObserver::default();

        let out = translate_batch(&parsed.records, &french(), "English", &t, &mut obs);

        assert_eq!(out.lines, vec!["a.b=Bonjour", "# note", "", "c.d=Monde"]);
        assert_eq!(out.succeeded, 2);
        assert_eq!(out.fallbacks, 0);
        assert_eq!(obs.of_phase(Phase::EntryProgress).len(), 2);
    }

    #[test]
    fn failure_falls_back_to_original_value() {
        let parsed = parse("a.b=Hello\n# note\n\nc.d=World");
        let t = MapTranslator::new(&[("Hello", "Bonjour")]);
        let mut obs = CollectingObserver::default();

        let out = translate_batch(&parsed.records, &french(), "English", &t, &mut obs);

        assert_eq!(out.lines, vec!["a.b=Bonjour", "# note", "", "c.d=World"]);
        assert_eq!(out.fallbacks, 1);

        let failures = obs.of_phase(Phase::EntryFailed);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].current, 2);
        assert_eq!(failures[0].severity, Severity::Error);
        assert!(failures[0].message.contains("'c.d' for French"));
    }

    #[test]
    fn source_language_never_calls_the_adapter() {
        let parsed = parse("x=Okay\ny=Cancel");
        let t = MapTranslator::new(&[]);
        let english = OutputTarget::new("English", "en", "en.properties");

        let out = translate_batch(&parsed.records, &english, "English", &t, &mut NoopObserver);

        assert_eq!(out.lines, vec!["x=Okay", "y=Cancel"]);
        assert_eq!(t.calls.get(), 0);
    }

    #[test]
    fn progress_counts_entries_not_records() {
        let parsed = parse("# c\na=Hello\n\nb=Hello");
        let t = MapTranslator::new(&[("Hello", "Hallo")]);
        let mut obs = CollectingObserver::default();
        let german = OutputTarget::new("German", "de", "de.properties");

        translate_batch(&parsed.records, &german, "English", &t, &mut obs);

        let progress: Vec<_> = obs
            .of_phase(Phase::EntryProgress)
            .iter()
            .map(|e| (e.current, e.total))
            .collect();
        assert_eq!(progress, vec![(1, 2), (2, 2)]);
        assert_eq!(obs.events[1].message, "Processing German... (2/2)");
    }
}

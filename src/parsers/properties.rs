use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::record::{ParseWarning, Record};

// First `=` splits; key must have at least one character before it.
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<key>[^=]+)=(?P<value>.*)$").expect("valid entry pattern"));

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub records: Vec<Record>,
    pub warnings: Vec<ParseWarning>,
}

impl Parsed {
    pub fn entry_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_entry()).count()
    }
}

pub fn parse(text: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for (i, line) in text.lines().enumerate() {
        let ln = i + 1;

        // Only CR is dropped; comments keep their indentation.
        let line_clean = line.trim_end_matches('\r');
        let logical = line_clean.trim();

        if logical.is_empty() {
            parsed.records.push(Record::Blank);
            continue;
        }

        if logical.starts_with('#') {
            parsed.records.push(Record::comment(line_clean));
            continue;
        }

        match ENTRY_RE.captures(logical) {
            Some(caps) => {
                let key = caps.name("key").map(|m| m.as_str().trim()).unwrap_or("");
                let value = caps.name("value").map(|m| m.as_str().trim()).unwrap_or("");
                parsed.records.push(Record::entry(key, value));
            }
            None => {
                let warning = ParseWarning {
                    line_number: ln,
                    content: logical.to_string(),
                };
                tracing::warn!("{}", warning.message());
                parsed.warnings.push(warning);
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::writer;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_each_line() {
        let parsed = parse("a.b=Hello\n# note\n\nc.d=World");
        assert_eq!(
            parsed.records,
            vec![
                Record::entry("a.b", "Hello"),
                Record::comment("# note"),
                Record::Blank,
                Record::entry("c.d", "World"),
            ]
        );
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.entry_count(), 2);
    }

    #[test]
    fn trims_key_and_value_but_splits_on_first_equals() {
        let parsed = parse("  app.title =  a = b  ");
        assert_eq!(parsed.records, vec![Record::entry("app.title", "a = b")]);
    }

    #[test]
    fn empty_value_is_still_an_entry() {
        let parsed = parse("empty=");
        assert_eq!(parsed.records, vec![Record::entry("empty", "")]);
    }

    #[test]
    fn comment_keeps_original_indentation() {
        let parsed = parse("   # indented\r\nk=v\r\n");
        assert_eq!(
            parsed.records,
            vec![Record::comment("   # indented"), Record::entry("k", "v")]
        );
    }

    #[test]
    fn whitespace_only_line_is_blank() {
        let parsed = parse("a=1\n   \t\nb=2");
        assert_eq!(parsed.records[1], Record::Blank);
    }

    #[test]
    fn invalid_lines_are_skipped_with_line_numbers() {
        let parsed = parse("a=1\nfoo\n=nokey\nb=2");
        assert_eq!(
            parsed.records,
            vec![Record::entry("a", "1"), Record::entry("b", "2")]
        );
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning {
                    line_number: 2,
                    content: "foo".to_string()
                },
                ParseWarning {
                    line_number: 3,
                    content: "=nokey".to_string()
                },
            ]
        );
        assert_eq!(
            parsed.warnings[0].message(),
            "Warning: Invalid format on line 2: foo"
        );
    }

    #[test]
    fn trailing_newline_adds_no_blank_record() {
        assert_eq!(parse("a=1\n").records, vec![Record::entry("a", "1")]);
        assert_eq!(
            parse("a=1\n\n").records,
            vec![Record::entry("a", "1"), Record::Blank]
        );
    }

    #[test]
    fn reparsing_rendered_output_is_stable() {
        let text = "\n# header\nx.y = one\n\n  # two\nz=three=3\n\n";
        let first = parse(text);
        let lines: Vec<String> = first.records.iter().map(Record::to_line).collect();
        let second = parse(&writer::render(&lines));
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn empty_input_renders_and_reparses_to_nothing() {
        let first = parse("");
        assert!(first.records.is_empty());

        let lines: Vec<String> = first.records.iter().map(Record::to_line).collect();
        assert_eq!(writer::render(&lines), "");
        assert_eq!(parse(&writer::render(&lines)).records, first.records);
    }
}

use serde::{Deserialize, Serialize};

/// One physical input line, classified.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Comment { raw_line: String },
    Blank,
    Entry { key: String, value: String },
}

impl Record {
    pub fn entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Record::Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn comment(raw_line: impl Into<String>) -> Self {
        Record::Comment {
            raw_line: raw_line.into(),
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Record::Entry { .. })
    }

    /// Output form of the record with its stored value.
    pub fn to_line(&self) -> String {
        match self {
            Record::Comment { raw_line } => raw_line.clone(),
            Record::Blank => String::new(),
            Record::Entry { key, value } => entry_line(key, value),
        }
    }
}

pub fn entry_line(key: &str, value: &str) -> String {
    format!("{key}={value}")
}

/// A line the parser skipped.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line_number: usize,
    pub content: String,
}

impl ParseWarning {
    pub fn message(&self) -> String {
        format!(
            "Warning: Invalid format on line {}: {}",
            self.line_number, self.content
        )
    }
}

use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::CoreError;

/// A file decoded to text, with the charset that was used.
#[derive(Debug, Serialize)]
pub struct Decoded {
    #[serde(skip)]
    pub text: String,
    pub encoding: &'static str,
    pub bom: bool,
    pub had_errors: bool,
}

/// Decodes with the file's BOM when present, else UTF-8 when valid, else the
/// charset guessed by chardetng (legacy .properties files are usually Latin-1).
pub fn decode_file(path: &Path) -> Result<Decoded, CoreError> {
    let bytes =
        fs::read(path).map_err(|e| CoreError::Encoding(format!("{}: {e}", path.display())))?;

    let bom = Encoding::for_bom(&bytes).map(|(enc, _)| enc);
    let encoding = bom.unwrap_or_else(|| guess(&bytes));

    // decode() strips a matching BOM.
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = used.name(),
            "input contained undecodable bytes"
        );
    }

    Ok(Decoded {
        text: text.into_owned(),
        encoding: used.name(),
        bom: bom.is_some(),
        had_errors,
    })
}

pub fn read_text(path: &Path) -> Result<String, CoreError> {
    decode_file(path).map(|d| d.text)
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

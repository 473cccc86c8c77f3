//! Template parameters: the params-block parser and the parameter merger.
//!
//! Parameter sets are written in `config.json` as brace-delimited blocks with
//! one `"key": "value"` pair per line:
//!
//! ```text
//! "templateParams": {
//!     "$title": "Tactical Shift",
//!     "$url": "https://example.org/page"
//! }
//! ```
//!
//! The block is valid JSON, but it is *not* decoded as a JSON object. The raw
//! text is split line by line instead, which keeps duplicate keys and the
//! order they were written in. The rules:
//!
//! 1. Surrounding whitespace and the outer `{` / `}` (plus stray line breaks)
//!    are stripped. An empty interior is an empty set.
//! 2. Records are separated by a comma at the end of a line (`,\r\n` or `,\n`).
//!    A line that does not end in a comma continues the current record.
//! 3. Each record splits on its **first** colon, so values may contain colons
//!    (URLs, times).
//! 4. Key and value are trimmed of whitespace, `"` and line breaks. Escapes are
//!    not interpreted and nested braces are not understood.
//!
//! A record without any colon is malformed and fails the whole block.
//!
//! ## Merging
//!
//! A template can receive explicit parameters (from the page) and defaults
//! (from its global slot). [`merge_params`] combines them so explicit values
//! win on key collision.

use serde::de::{self, Deserialize, Deserializer};
use serde_json::value::RawValue;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamsError {
    #[error("params block record has no ':' separator: {record:?}")]
    MissingColon { record: String },
}

/// A single substitution: every occurrence of `key` becomes `value`.
///
/// The key is the literal token including any sigil, e.g. `$title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParam {
    pub key: String,
    pub value: String,
}

impl TemplateParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered parameter set, in source order. Duplicate keys are kept.
///
/// An absent or `null` block in the configuration decodes as the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams(Vec<TemplateParam>);

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, param: TemplateParam) {
        self.0.push(param);
    }

    pub fn as_slice(&self) -> &[TemplateParam] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TemplateParam> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the last entry with this key.
    ///
    /// Substitution applies entries in order, so when a set with duplicate
    /// keys is compiled unmerged the first entry is the one that takes effect.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

impl From<Vec<TemplateParam>> for TemplateParams {
    fn from(params: Vec<TemplateParam>) -> Self {
        Self(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| TemplateParam::new(k, v))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a TemplateParams {
    type Item = &'a TemplateParam;
    type IntoIter = std::slice::Iter<'a, TemplateParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for TemplateParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        if raw.get() == "null" {
            return Ok(Self::default());
        }
        parse_params_block(raw.get()).map_err(de::Error::custom)
    }
}

// =============================================================================
// Params block parser
// =============================================================================

/// Parse the raw text of a params block, braces included.
pub fn parse_params_block(raw: &str) -> Result<TemplateParams, ParamsError> {
    let content = raw
        .trim()
        .trim_matches(|c| matches!(c, '{' | '}' | '\r' | '\n'));
    if content.trim().is_empty() {
        return Ok(TemplateParams::default());
    }

    let mut params = TemplateParams::new();
    for record in split_records(content) {
        let (key, value) = record
            .split_once(':')
            .ok_or_else(|| ParamsError::MissingColon {
                record: record.trim().to_string(),
            })?;
        params.push(TemplateParam::new(trim_part(key), trim_part(value)));
    }
    Ok(params)
}

/// Split on "comma, then end of line". The comma and the line break are
/// dropped; everything else stays with its record.
fn split_records(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut records = Vec::new();
    let mut start = 0;

    for (newline, _) in content.match_indices('\n') {
        let line_end = if newline > start && bytes[newline - 1] == b'\r' {
            newline - 1
        } else {
            newline
        };
        if line_end > start && bytes[line_end - 1] == b',' {
            records.push(&content[start..line_end - 1]);
            start = newline + 1;
        }
    }
    records.push(&content[start..]);
    records
}

fn trim_part(part: &str) -> &str {
    part.trim().trim_matches(|c| matches!(c, '"' | '\r' | '\n'))
}

// =============================================================================
// Merging
// =============================================================================

/// Combine explicit parameters with fallback defaults.
///
/// - Empty `explicit` → `defaults` as given (order and duplicates kept).
/// - Empty `defaults` → `explicit` as given.
/// - Otherwise each key appears once. Explicit values override defaults, and
///   within one input the last occurrence of a key wins. Keys keep the
///   position of their first appearance, defaults first.
///
/// Substitution is applied per key over the whole template, so callers must
/// not rely on the order of a merged set.
pub fn merge_params(explicit: &[TemplateParam], defaults: &[TemplateParam]) -> Vec<TemplateParam> {
    if explicit.is_empty() {
        return defaults.to_vec();
    }
    if defaults.is_empty() {
        return explicit.to_vec();
    }

    let mut merged: Vec<TemplateParam> = Vec::with_capacity(defaults.len() + explicit.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for param in defaults.iter().chain(explicit) {
        match positions.get(param.key.as_str()) {
            Some(&pos) => merged[pos].value.clone_from(&param.value),
            None => {
                positions.insert(param.key.as_str(), merged.len());
                merged.push(param.clone());
            }
        }
    }
    merged
}

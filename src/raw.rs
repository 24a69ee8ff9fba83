//! Loosely typed row records produced by the extractors.
//!
//! Extractors hand every field to the normalizer in its original string form;
//! type coercion (dates, amounts, signs) happens in one place, per bank.

/// One raw statement row: field values keyed by column label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based position within the located transaction table, for diagnostics.
    pub row: usize,
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        Self { row, fields: Vec::new() }
    }

    /// Append a field, keeping insertion order and the original string form.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Look up a field by column label, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get), but trimmed and mapped to `None` when empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// True when every field is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.trim().is_empty())
    }

    /// Append extra text to an existing field, separated by a newline. Used
    /// when a description wraps across physical lines in a PDF table.
    pub fn append_line(&mut self, key: &str, text: &str) {
        if let Some((_, v)) = self
            .fields
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            if !v.is_empty() {
                v.push('\n');
            }
            v.push_str(text);
        } else {
            self.push(key, text);
        }
    }
}

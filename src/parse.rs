//! Ingestion orchestration: detect → extract → normalize, one file at a time.
//!
//! Row-level failures never escalate to file-level failures, and file-level
//! failures never abort a batch; each file's outcome is independent. Files in
//! a batch are parsed strictly sequentially (PDF extraction is CPU-heavy and
//! out-of-order completion would scramble result delivery), and every parse
//! works on an isolated input, so no state is shared across files.

use crate::error::{Error, Result};
use crate::types::{Bank, FileId, FileResult, FileStatus, ParseResult};
use crate::{adcb, enbd, detect, normalize};

/// One submitted file: raw content plus a display name. The generated
/// [`FileId`] ties the eventual result back to this exact submission even
/// when two files share a name.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub id: FileId,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { id: FileId::next(), name: name.into(), bytes }
    }
}

/// Synchronous parsing core. Fatal conditions (unrecognized content, no
/// transaction table) surface as `Err`; row-level failures are collected into
/// the result's error list.
pub fn try_parse_bytes(bytes: &[u8], file_name: &str) -> Result<ParseResult> {
    let classification = detect::classify(bytes, file_name)
        .ok_or_else(|| Error::UnrecognizedFormat(file_name.to_string()))?;

    let records = match classification.bank {
        Bank::Adcb => {
            adcb::extract_rows(&String::from_utf8_lossy(bytes), classification.statement_type)?
        }
        Bank::EmiratesNbd => enbd::extract_rows(bytes, classification.statement_type)?,
    };

    let mut result = ParseResult::new(classification);
    for record in &records {
        match normalize::normalize_record(record, classification) {
            Ok(tx) => result.transactions.push(tx),
            Err(e) => result.errors.push(format!("row {}: {}", record.row, e)),
        }
    }
    Ok(result)
}

/// Total variant of [`try_parse_bytes`]: never fails. An unrecognized file
/// yields an undetected result with one error; a recognized file without a
/// table keeps its classification so callers can tell the two apart.
pub fn parse_bytes(bytes: &[u8], file_name: &str) -> ParseResult {
    match try_parse_bytes(bytes, file_name) {
        Ok(result) => result,
        Err(Error::NoTransactionTable(c)) => {
            let mut result = ParseResult::new(c);
            result.errors.push(Error::NoTransactionTable(c).to_string());
            result
        }
        Err(e) => ParseResult::unrecognized(e.to_string()),
    }
}

/// Parse one file off the caller's task, returning fatal conditions as `Err`.
pub async fn try_parse_file(input: &FileInput) -> Result<ParseResult> {
    let bytes = input.bytes.clone();
    let name = input.name.clone();
    tokio::task::spawn_blocking(move || try_parse_bytes(&bytes, &name))
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}

/// Parse one file off the caller's task. Never fails; see [`parse_bytes`].
pub async fn parse_file(input: &FileInput) -> ParseResult {
    let bytes = input.bytes.clone();
    let name = input.name.clone();
    match tokio::task::spawn_blocking(move || parse_bytes(&bytes, &name)).await {
        Ok(result) => result,
        Err(e) => ParseResult::unrecognized(Error::Task(e.to_string()).to_string()),
    }
}

/// Parse a batch of files sequentially, settling one [`FileResult`] per
/// input. Results come back in submission order and are matched by id, so a
/// caller that dropped a file mid-batch can simply discard its entry.
pub async fn parse_batch(inputs: &[FileInput]) -> Vec<FileResult> {
    let mut results: Vec<FileResult> = inputs
        .iter()
        .map(|input| FileResult {
            id: input.id,
            file_name: input.name.clone(),
            status: FileStatus::Pending,
        })
        .collect();

    for input in inputs {
        let outcome = try_parse_file(input).await;
        if let Some(entry) = results.iter_mut().find(|r| r.id == input.id) {
            entry.settle(outcome);
        }
    }

    results
}

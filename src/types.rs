//! Canonical transaction model shared by all extractors, the normalizer and
//! the YNAB exporter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Banks whose statement exports are understood.
///
/// This is a closed set: a new bank is added by adding a variant together with
/// a detection rule and an extractor, never by widening an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    /// Abu Dhabi Commercial Bank (CSV exports).
    Adcb,
    /// Emirates NBD (PDF statements).
    EmiratesNbd,
}

impl Bank {
    /// Human-readable bank label used in results and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Bank::Adcb => "ADCB",
            Bank::EmiratesNbd => "Emirates NBD",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statement type. Affects date formats and debit/credit sign conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// Checking/savings account statement.
    Account,
    /// Credit card statement.
    CreditCard,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementType::Account => "Account",
            StatementType::CreditCard => "Credit Card",
        })
    }
}

/// Outcome of content-based format detection: which bank issued the file and
/// which statement type it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub bank: Bank,
    pub statement_type: StatementType,
}

impl Classification {
    pub fn new(bank: Bank, statement_type: StatementType) -> Self {
        Self { bank, statement_type }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.bank, self.statement_type)
    }
}

/// A normalized, bank-agnostic transaction. Immutable once created.
///
/// `amount` is signed: negative means money leaving the account or card
/// balance, positive means money arriving, regardless of how the source
/// statement encoded the direction. The normalizer never constructs a
/// zero-amount transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction, no time component.
    pub date: NaiveDate,

    /// Counterparty/merchant, trimmed.
    pub payee: String,

    /// Reference or continuation text; may be empty.
    pub memo: String,

    /// Signed settlement-currency amount, at most two decimal places.
    pub amount: Decimal,

    /// Bank the statement came from.
    pub bank: Bank,

    /// Statement type the row was extracted from.
    pub statement_type: StatementType,
}

/// Result of parsing one statement file.
///
/// `detected` is `None` exactly when the file matched no known signature, so
/// callers can tell "unrecognized" apart from "detected but empty/failed".
/// Transactions keep statement order; `errors` holds one human-readable entry
/// per row-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub detected: Option<Classification>,
    pub transactions: Vec<Transaction>,
    pub errors: Vec<String>,
}

impl ParseResult {
    /// Empty result for a successfully classified file.
    pub fn new(classification: Classification) -> Self {
        Self {
            detected: Some(classification),
            transactions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Result for a file that could not be classified at all.
    pub fn unrecognized(message: impl Into<String>) -> Self {
        Self {
            detected: None,
            transactions: Vec::new(),
            errors: vec![message.into()],
        }
    }

    /// Bank label, or `"unknown"` when detection failed.
    pub fn bank_name(&self) -> &str {
        self.detected.map(|c| c.bank.label()).unwrap_or("unknown")
    }

    /// True when every row parsed cleanly.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque per-file handle. Two submitted files may share a name; results are
/// matched back to inputs by this id, never by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(u64);

impl FileId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        FileId(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-file lifecycle state. A file is `Pending` from submission until its
/// parse settles, then exactly one of the settled variants; there is no way
/// back to `Pending` and no "loading with a result" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileStatus {
    /// Parse still in flight.
    Pending,
    /// Clean parse.
    Parsed(ParseResult),
    /// Parsed with row-level failures; transactions may still be usable.
    ParsedWithWarnings(ParseResult),
    /// File could not be classified or yielded no table at all.
    Failed(String),
}

/// Associates one submitted file with its parse outcome. Owned by the caller;
/// the engine only settles it once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub id: FileId,
    pub file_name: String,
    pub status: FileStatus,
}

impl FileResult {
    /// New entry in the loading state, with a fresh id.
    pub fn pending(file_name: impl Into<String>) -> Self {
        Self {
            id: FileId::next(),
            file_name: file_name.into(),
            status: FileStatus::Pending,
        }
    }

    /// Settle a pending entry from a parse outcome. Fatal errors become
    /// `Failed`; row-level errors downgrade to `ParsedWithWarnings`. Settling
    /// an already settled entry is a no-op.
    pub fn settle(&mut self, outcome: Result<ParseResult>) {
        if self.status != FileStatus::Pending {
            return;
        }
        self.status = match outcome {
            Err(e) => FileStatus::Failed(e.to_string()),
            Ok(result) if result.detected.is_none() => FileStatus::Failed(
                result
                    .errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Error::UnrecognizedFormat(self.file_name.clone()).to_string()),
            ),
            Ok(result) if result.is_clean() => FileStatus::Parsed(result),
            Ok(result) => FileStatus::ParsedWithWarnings(result),
        };
    }

    /// True once the parse outcome has been delivered.
    pub fn is_settled(&self) -> bool {
        self.status != FileStatus::Pending
    }

    /// The parse result, when the file produced one. `Failed` files have no
    /// result and are excluded from any export.
    pub fn parse_result(&self) -> Option<&ParseResult> {
        match &self.status {
            FileStatus::Parsed(r) | FileStatus::ParsedWithWarnings(r) => Some(r),
            FileStatus::Pending | FileStatus::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bank_labels() {
        assert_eq!(Bank::Adcb.to_string(), "ADCB");
        assert_eq!(Bank::EmiratesNbd.to_string(), "Emirates NBD");
        assert_eq!(StatementType::CreditCard.to_string(), "Credit Card");
    }

    #[test]
    fn test_file_ids_are_unique() {
        let a = FileId::next();
        let b = FileId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_settle_clean_result() {
        let mut fr = FileResult::pending("march.csv");
        assert!(!fr.is_settled());

        let classification = Classification::new(Bank::Adcb, StatementType::Account);
        fr.settle(Ok(ParseResult::new(classification)));

        assert!(fr.is_settled());
        assert!(matches!(fr.status, FileStatus::Parsed(_)));
        assert!(fr.parse_result().is_some());
    }

    #[test]
    fn test_settle_with_row_errors_downgrades_to_warning() {
        let mut fr = FileResult::pending("march.csv");
        let mut result = ParseResult::new(Classification::new(Bank::Adcb, StatementType::Account));
        result.errors.push("row 3: invalid date".to_string());
        fr.settle(Ok(result));

        assert!(matches!(fr.status, FileStatus::ParsedWithWarnings(_)));
        assert!(fr.parse_result().is_some());
    }

    #[test]
    fn test_settle_fatal_error() {
        let mut fr = FileResult::pending("mystery.bin");
        fr.settle(Err(Error::UnrecognizedFormat("mystery.bin".to_string())));

        assert!(matches!(fr.status, FileStatus::Failed(_)));
        assert_eq!(fr.parse_result(), None);
    }

    #[test]
    fn test_settle_is_one_shot() {
        let mut fr = FileResult::pending("march.csv");
        fr.settle(Err(Error::UnrecognizedFormat("march.csv".to_string())));
        let settled = fr.status.clone();

        // A second settle must not overwrite the first outcome.
        fr.settle(Ok(ParseResult::new(Classification::new(
            Bank::Adcb,
            StatementType::Account,
        ))));
        assert_eq!(fr.status, settled);
    }
}

//! ADCB (Abu Dhabi Commercial Bank) CSV statement extraction.
//!
//! ADCB exports both account and credit card statements as CSV with a
//! variable-length preamble (holder, IBAN, period) before the transaction
//! table and summary lines after it. The table is located by its header
//! signature, never by a fixed line offset.
//!
//! Account exports carry a single signed `Amount` column; credit card exports
//! carry separate `Debit Amount` / `Credit Amount` columns. Both keep their
//! raw string form here; sign rules are applied by the normalizer.

use csv::ReaderBuilder;

use crate::detect::find_adcb_header;
use crate::error::{Error, Result};
use crate::raw::RawRecord;
use crate::types::{Bank, Classification, StatementType};

/// Extract raw transaction rows from ADCB statement text.
///
/// Quoted fields may contain the delimiter or embedded newlines; the reader
/// handles both. Returns `Error::NoTransactionTable` when the header signature
/// or any data row under it cannot be found.
pub fn extract_rows(text: &str, statement_type: StatementType) -> Result<Vec<RawRecord>> {
    let classification = Classification::new(Bank::Adcb, statement_type);
    let header_idx = find_adcb_header(text, statement_type)
        .ok_or(Error::NoTransactionTable(classification))?;

    // Slice the original text from the header line onward so quoted fields
    // spanning physical lines survive intact.
    let mut offset = 0;
    for (i, line) in text.split_inclusive('\n').enumerate() {
        if i == header_idx {
            break;
        }
        offset += line.len();
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text[offset..].as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            // A structurally broken line (unbalanced quotes and the like)
            // should not abort the rest of the table.
            Err(_) => continue,
        };

        let mut record = RawRecord::new(i + 1);
        for (key, value) in headers.iter().zip(row.iter()) {
            record.push(key, value);
        }
        if record.is_blank() {
            continue;
        }

        // Summary/footer lines ("Total", "Closing Balance") put a label where
        // a date belongs. Anything without a digit in the date cell is not a
        // transaction row.
        let date_cell = record.get_non_empty(date_column(statement_type));
        match date_cell {
            Some(cell) if cell.chars().any(|c| c.is_ascii_digit()) => records.push(record),
            _ => continue,
        }
    }

    if records.is_empty() {
        return Err(Error::NoTransactionTable(classification));
    }
    Ok(records)
}

pub(crate) fn date_column(statement_type: StatementType) -> &'static str {
    match statement_type {
        StatementType::Account => "date",
        StatementType::CreditCard => "transaction date",
    }
}

//! Content-based format detection.
//!
//! Classification never trusts the file extension: both supported banks could
//! ship `.csv` files, and a renamed PDF must still be recognized (or cleanly
//! rejected). CSV files are matched by their header column signature, PDFs by
//! bank anchor strings in the extracted first-page text.

use crate::pdf_text;
use crate::types::{Bank, Classification, StatementType};

/// Number of leading lines scanned for a CSV header signature. ADCB exports
/// carry a variable-length preamble (account holder, IBAN, period) before the
/// transaction table.
const CSV_HEADER_SCAN_LINES: usize = 40;

/// Classify file content as a known (bank, statement type) pair.
///
/// Returns `None` for anything unrecognized, including PDFs whose text cannot
/// be extracted. `file_name` is a diagnostic hint only and never decides the
/// outcome.
pub fn classify(bytes: &[u8], file_name: &str) -> Option<Classification> {
    if is_pdf(bytes) {
        return classify_pdf(bytes);
    }
    if let Some(classification) = classify_csv_text(&String::from_utf8_lossy(bytes)) {
        return Some(classification);
    }
    // Secondary hint only: a PDF that lost its magic header still gets one
    // attempt when the name says `.pdf`, and a failure stays "not recognized".
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        return classify_pdf(bytes);
    }
    None
}

/// True when the content carries the PDF magic header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

fn classify_pdf(bytes: &[u8]) -> Option<Classification> {
    // A corrupt or non-extractable PDF is "not recognized", not an error.
    let runs = pdf_text::extract_runs(bytes).ok()?;
    let first_page = runs.iter().map(|r| r.page).min()?;
    let text: String = runs
        .iter()
        .filter(|r| r.page == first_page)
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    if !text.contains("EMIRATES NBD") {
        return None;
    }
    if text.contains("CREDIT CARD") {
        Some(Classification::new(Bank::EmiratesNbd, StatementType::CreditCard))
    } else if text.contains("ACCOUNT") {
        Some(Classification::new(Bank::EmiratesNbd, StatementType::Account))
    } else {
        None
    }
}

fn classify_csv_text(text: &str) -> Option<Classification> {
    for line in text.lines().take(CSV_HEADER_SCAN_LINES) {
        let columns = header_columns(line);
        if is_adcb_card_header(&columns) {
            return Some(Classification::new(Bank::Adcb, StatementType::CreditCard));
        }
        if is_adcb_account_header(&columns) {
            return Some(Classification::new(Bank::Adcb, StatementType::Account));
        }
    }
    None
}

/// Locate the ADCB transaction table header within statement text, returning
/// its 0-based line index. Used by the extractor after classification.
pub(crate) fn find_adcb_header(text: &str, statement_type: StatementType) -> Option<usize> {
    text.lines()
        .take(CSV_HEADER_SCAN_LINES)
        .position(|line| {
            let columns = header_columns(line);
            match statement_type {
                StatementType::Account => is_adcb_account_header(&columns),
                StatementType::CreditCard => is_adcb_card_header(&columns),
            }
        })
}

fn header_columns(line: &str) -> Vec<String> {
    line.split(',')
        .map(|c| c.trim().trim_matches('"').to_lowercase())
        .collect()
}

// ADCB account export: `Date,Description,Amount[,Balance]`.
fn is_adcb_account_header(columns: &[String]) -> bool {
    has_column(columns, "date")
        && has_column(columns, "description")
        && has_column(columns, "amount")
}

// ADCB credit card export: `Transaction Date,Description,Debit Amount,Credit Amount`.
fn is_adcb_card_header(columns: &[String]) -> bool {
    has_column(columns, "transaction date")
        && has_column(columns, "debit amount")
        && has_column(columns, "credit amount")
}

fn has_column(columns: &[String], name: &str) -> bool {
    columns.iter().any(|c| c == name)
}

//! Emirates NBD PDF statement extraction.
//!
//! ENBD issues both account and credit card statements as PDF. Tabular rows
//! are rebuilt from positioned text runs using the column bands below, which
//! were calibrated against real statement layouts; adjusting a band moves a
//! column boundary without touching any parsing logic.
//!
//! Account tables carry separate Debit/Credit columns; card tables carry a
//! single unsigned Amount column where payments and refunds are marked with a
//! trailing `CR`. Both stay raw here, the normalizer applies the sign rules.

use crate::error::{Error, Result};
use crate::layout::{ColumnBand, TableLayout};
use crate::pdf_text::{self, TextRun};
use crate::raw::RawRecord;
use crate::types::{Bank, Classification, StatementType};

/// Account statement table: Date | Description | Debit | Credit | Balance.
pub const ENBD_ACCOUNT_LAYOUT: TableLayout = TableLayout {
    line_tolerance: 4.0,
    columns: &[
        ColumnBand { name: "date", min_x: 40.0, max_x: 115.0 },
        ColumnBand { name: "description", min_x: 115.0, max_x: 330.0 },
        ColumnBand { name: "debit", min_x: 330.0, max_x: 415.0 },
        ColumnBand { name: "credit", min_x: 415.0, max_x: 495.0 },
        ColumnBand { name: "balance", min_x: 495.0, max_x: 575.0 },
    ],
};

/// Credit card statement table: Date | Description | Amount.
pub const ENBD_CARD_LAYOUT: TableLayout = TableLayout {
    line_tolerance: 4.0,
    columns: &[
        ColumnBand { name: "date", min_x: 40.0, max_x: 115.0 },
        ColumnBand { name: "description", min_x: 115.0, max_x: 390.0 },
        ColumnBand { name: "amount", min_x: 390.0, max_x: 560.0 },
    ],
};

pub(crate) fn layout_for(statement_type: StatementType) -> &'static TableLayout {
    match statement_type {
        StatementType::Account => &ENBD_ACCOUNT_LAYOUT,
        StatementType::CreditCard => &ENBD_CARD_LAYOUT,
    }
}

/// Extract raw transaction rows from ENBD PDF bytes.
///
/// Handles multi-page statements, skips the table header repeated on every
/// page, and merges wrapped description lines into the row they belong to.
/// Returns `Error::NoTransactionTable` when no row matching the table pattern
/// exists anywhere in the document.
pub fn extract_rows(bytes: &[u8], statement_type: StatementType) -> Result<Vec<RawRecord>> {
    let runs = pdf_text::extract_runs(bytes)?;
    let records = records_from_runs(&runs, statement_type);
    if records.is_empty() {
        return Err(Error::NoTransactionTable(Classification::new(
            Bank::EmiratesNbd,
            statement_type,
        )));
    }
    Ok(records)
}

pub(crate) fn records_from_runs(runs: &[TextRun], statement_type: StatementType) -> Vec<RawRecord> {
    let layout = layout_for(statement_type);

    let mut records: Vec<RawRecord> = Vec::new();
    for row in layout.assemble_rows(runs) {
        let date = cell_named(layout, &row.cells, "date");

        if is_repeated_header(date, &row.cells) {
            continue;
        }

        if starts_transaction(date) {
            let mut record = RawRecord::new(records.len() + 1);
            for (band, cell) in layout.columns.iter().zip(row.cells.iter()) {
                record.push(band.name, cell.trim());
            }
            records.push(record);
            continue;
        }

        // A line with neither a date nor an amount is a wrapped description:
        // it belongs to the memo of the preceding row. Anything else (running
        // balances, totals, page furniture) is dropped.
        let description = cell_named(layout, &row.cells, "description");
        if !has_amount(layout, &row.cells) && !description.is_empty() {
            if let Some(last) = records.last_mut() {
                last.append_line("description", description);
            }
        }
    }

    records
}

// The table header is re-printed at the top of every page.
fn is_repeated_header(date_cell: &str, cells: &[String]) -> bool {
    date_cell.eq_ignore_ascii_case("date")
        || cells
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case("description"))
}

// Transaction rows lead with a date; continuation and summary lines do not.
fn starts_transaction(date_cell: &str) -> bool {
    date_cell.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn has_amount(layout: &TableLayout, cells: &[String]) -> bool {
    ["debit", "credit", "amount"].iter().any(|name| {
        layout
            .column_index(name)
            .is_some_and(|idx| !cells[idx].trim().is_empty())
    })
}

fn cell_named<'a>(layout: &TableLayout, cells: &'a [String], name: &str) -> &'a str {
    layout
        .column_index(name)
        .map(|idx| cells[idx].trim())
        .unwrap_or("")
}

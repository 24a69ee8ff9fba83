//! YNAB import-format serialization.
//!
//! The destination budgeting tool accepts a delimited text file with the
//! fixed column order `Date,Payee,Memo,Outflow,Inflow`, ISO 8601 dates, and
//! exactly one of Outflow/Inflow populated per row. Serialization is pure and
//! order-preserving: no re-sorting, no deduplication, no amount rewriting.

use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::{ParseResult, Transaction};

/// Fixed stem for combined multi-statement exports.
pub const COMBINED_EXPORT_STEM: &str = "all_statements";

/// YNAB CSV row structure.
#[derive(Debug, Serialize)]
struct YnabRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Payee")]
    payee: String,
    #[serde(rename = "Memo")]
    memo: String,
    #[serde(rename = "Outflow")]
    outflow: String,
    #[serde(rename = "Inflow")]
    inflow: String,
}

/// An ordered set of transactions ready for serialization. Build it from one
/// parse result or from several files' results in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct YnabExport<'a> {
    transactions: Vec<&'a Transaction>,
}

impl<'a> YnabExport<'a> {
    pub fn new(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        Self { transactions: transactions.into_iter().collect() }
    }

    /// Combined export: concatenates each file's transactions in the order
    /// the results are supplied, keeping in-file statement order within each.
    pub fn from_results(results: impl IntoIterator<Item = &'a ParseResult>) -> Self {
        Self::new(results.into_iter().flat_map(|r| r.transactions.iter()))
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Write the export to any destination implementing `Write`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use uae2ynab::types::Transaction;
    /// use uae2ynab::ynab::YnabExport;
    ///
    /// let transactions: Vec<&Transaction> = Vec::new();
    /// let export = YnabExport::new(transactions);
    /// let mut file = File::create("statement_ynab.csv")?;
    /// export.write_to(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv_writer = Writer::from_writer(writer);

        for tx in &self.transactions {
            let magnitude = format!("{:.2}", tx.amount.abs());
            let (outflow, inflow) = if tx.amount.is_sign_negative() {
                (magnitude, String::new())
            } else {
                (String::new(), magnitude)
            };

            csv_writer.serialize(YnabRecord {
                date: tx.date.format("%Y-%m-%d").to_string(),
                payee: tx.payee.clone(),
                memo: tx.memo.clone(),
                outflow,
                inflow,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Export file name for a single statement, derived from its source name:
/// `march.csv` becomes `march_ynab.csv`.
pub fn export_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("statement");
    format!("{stem}_ynab.csv")
}

/// Fixed file name for a combined multi-file export.
pub fn combined_file_name() -> String {
    format!("{COMBINED_EXPORT_STEM}_ynab.csv")
}

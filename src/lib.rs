//! UAE Bank Statement to YNAB Converter
//!
//! A library for turning bank-issued statement exports from UAE banks into a
//! normalized transaction model and serializing it into the YNAB import
//! format.
//!
//! # Supported Statements
//!
//! - **ADCB**: Account & Credit Card, CSV exports
//! - **Emirates NBD**: Account & Credit Card, PDF statements
//!
//! # Pipeline
//!
//! Detection is content-based (CSV header signatures, PDF anchor text), then
//! a bank-specific extractor produces raw rows, and the normalizer maps each
//! row into a canonical [`types::Transaction`]. A bad row becomes one error
//! entry and never aborts the file; a bad file never aborts a batch.
//!
//! Every invocation is a pure function of the bytes supplied for that call:
//! no network, no persisted state, no configuration files.
//!
//! # Examples
//!
//! ```no_run
//! use uae2ynab::parse::{parse_file, FileInput};
//! use uae2ynab::ynab::{export_file_name, YnabExport};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("march.csv")?;
//! let input = FileInput::new("march.csv", bytes);
//!
//! let result = parse_file(&input).await;
//! println!("{}: {} transactions", result.bank_name(), result.transactions.len());
//!
//! let export = YnabExport::from_results([&result]);
//! let mut out = std::fs::File::create(export_file_name(&input.name))?;
//! export.write_to(&mut out)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod types;
pub mod raw;
pub mod detect;
pub mod layout;
pub mod pdf_text;
pub mod adcb;
pub mod enbd;
pub mod normalize;
pub mod parse;
pub mod ynab;

// Re-export commonly used types
pub use error::{Error, Result};
pub use parse::{parse_batch, parse_file, try_parse_bytes, FileInput};
pub use types::{
    Bank, Classification, FileId, FileResult, FileStatus, ParseResult, StatementType, Transaction,
};

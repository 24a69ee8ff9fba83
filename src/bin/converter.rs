//! uae2ynab - CLI tool for converting UAE bank statements to the YNAB import format.

use clap::Parser;
use std::fs::{self, File};
use std::path::PathBuf;
use uae2ynab::parse::{parse_batch, FileInput};
use uae2ynab::types::FileStatus;
use uae2ynab::ynab::{combined_file_name, export_file_name, YnabExport};
use uae2ynab::Result;

#[derive(Parser)]
#[command(name = "uae2ynab")]
#[command(about = "Convert UAE bank statements (ADCB CSV, Emirates NBD PDF) to YNAB import CSV", long_about = None)]
struct Cli {
    /// Statement files to convert
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write one combined export instead of one export per statement
    #[arg(short, long)]
    combined: bool,

    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let out_dir = cli.out_dir.unwrap_or_else(|| PathBuf::from("."));

    let mut inputs = Vec::new();
    for path in &cli.inputs {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("statement")
            .to_string();
        inputs.push(FileInput::new(name, bytes));
    }

    let results = parse_batch(&inputs).await;

    let mut exportable = Vec::new();
    for file_result in &results {
        match &file_result.status {
            FileStatus::Parsed(result) | FileStatus::ParsedWithWarnings(result) => {
                eprintln!(
                    "{}: {} {} - {} transactions, {} skipped rows",
                    file_result.file_name,
                    result.bank_name(),
                    result
                        .detected
                        .map(|c| c.statement_type.to_string())
                        .unwrap_or_default(),
                    result.transactions.len(),
                    result.errors.len(),
                );
                for error in &result.errors {
                    eprintln!("  warning: {}", error);
                }
                if !result.transactions.is_empty() {
                    exportable.push((file_result.file_name.clone(), result));
                }
            }
            FileStatus::Failed(message) => {
                eprintln!("{}: {}", file_result.file_name, message);
            }
            FileStatus::Pending => {}
        }
    }

    if exportable.is_empty() {
        eprintln!("no file produced any transactions; nothing to export");
        std::process::exit(1);
    }

    if cli.combined {
        let export = YnabExport::from_results(exportable.iter().map(|(_, r)| *r));
        let path = out_dir.join(combined_file_name());
        let mut file = File::create(&path)?;
        export.write_to(&mut file)?;
        eprintln!("wrote {} rows to {}", export.len(), path.display());
    } else {
        for (source_name, result) in &exportable {
            let export = YnabExport::new(result.transactions.iter());
            let path = out_dir.join(export_file_name(source_name));
            let mut file = File::create(&path)?;
            export.write_to(&mut file)?;
            eprintln!("wrote {} rows to {}", export.len(), path.display());
        }
    }

    Ok(())
}

//! Process command - extract data from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use anreu_core::{Outcome, ReceiptExtractor, TransferRecord};

use super::{extract_file, load_config, outcome_json};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or .txt with already-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Exit with an error when the receipt is rejected
    #[arg(long)]
    fail_on_reject: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let extractor = ReceiptExtractor::from_config(&config);
    let outcome = extract_file(&extractor, &args.input).outcome;

    let output = match args.format {
        OutputFormat::Json => outcome_json(&outcome, args.pretty || config.output.pretty)?,
        OutputFormat::Text => format_text(&outcome),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.fail_on_reject {
        if let Outcome::Rejected(rejection) = outcome {
            anyhow::bail!("{}: {}", args.input.display(), rejection);
        }
    }

    Ok(())
}

fn format_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Accepted(record) => format_record(record),
        Outcome::Rejected(rejection) => format!("Rejected: {}\n", rejection),
    }
}

fn format_record(record: &TransferRecord) -> String {
    fn show<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Serials:  ACCU{} to ACCU{}\n",
        show(&record.serial_start),
        show(&record.serial_end)
    ));
    output.push_str(&format!("Vintage:  {}\n", show(&record.vintage)));
    output.push_str(&format!("Project:  {}\n", show(&record.project_id)));
    output.push_str(&format!("Facility: {}\n", show(&record.facility)));
    output.push_str("\n");
    output.push_str(&format!("From: {}\n", show(&record.from_account)));
    output.push_str(&format!("To:   {}\n", show(&record.to_account)));
    output
}

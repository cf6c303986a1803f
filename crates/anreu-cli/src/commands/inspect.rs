//! Inspect command - show what each field rule finds in a document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use anreu_core::receipt::{CONFIDENCE_THRESHOLD, RuleInspection};
use anreu_core::{Confidence, FallbackAcquirer, ReceiptParser};

use super::{is_text_file, load_config};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input file (PDF, or .txt with already-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Also print the acquired text
    #[arg(long)]
    show_text: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if is_text_file(&args.input) {
        String::from_utf8_lossy(&fs::read(&args.input)?).into_owned()
    } else {
        let data = fs::read(&args.input)?;
        let acquired = FallbackAcquirer::from_config(&config.acquisition).acquire(&data)?;
        info!(
            "Acquired {} chars from {} pages via {}",
            acquired.text.len(),
            acquired.page_count,
            acquired.source
        );
        acquired.text
    };

    if args.show_text {
        println!("{}", style("Text").bold());
        println!("{}", text);
        println!();
    }

    let parser = ReceiptParser::new();
    let inspections = parser.inspect(&text);
    for inspection in &inspections {
        print!("{}", format_inspection(inspection));
    }

    let confidence = parser.parse(&text).confidence;
    println!();
    println!("{}", format_verdict(confidence));

    Ok(())
}

fn format_inspection(inspection: &RuleInspection) -> String {
    let mut output = format!("{:<14} /{}/\n", inspection.field.name(), inspection.pattern);
    match &inspection.first {
        Some(m) => {
            let span = m
                .position
                .map(|(start, end)| format!(" at {}..{}", start, end))
                .unwrap_or_default();
            output.push_str(&format!("  value:   {}{}\n", m.value, span));
            output.push_str(&format!("  matched: {:?}\n", m.source));
        }
        None => output.push_str("  value:   -\n"),
    }
    if inspection.total_matches > 1 {
        output.push_str(&format!(
            "  {} matches, first one used\n",
            inspection.total_matches
        ));
    }
    output
}

fn format_verdict(confidence: Confidence) -> String {
    if confidence.passes() {
        format!("Confidence: {} {}", confidence, style("accepted").green())
    } else {
        format!(
            "Confidence: {} {} (threshold {}%)",
            confidence,
            style("rejected").yellow(),
            CONFIDENCE_THRESHOLD
        )
    }
}

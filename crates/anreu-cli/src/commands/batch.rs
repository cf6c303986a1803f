//! Batch processing command for multiple receipt files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use anreu_core::{Confidence, Outcome, ReceiptExtractor};

use super::{extract_file, is_text_file, load_config, outcome_json};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for one JSON file per input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Outcome,
    confidence: Option<Confidence>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_text_file(p) || has_extension(p, "pdf"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(ReceiptExtractor::from_config(&config));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let extractor = Arc::clone(&extractor);
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let extraction = extract_file(&extractor, &path);
            pb.inc(1);

            ProcessResult {
                path,
                outcome: extraction.outcome,
                confidence: extraction.confidence,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    pb.finish_and_clear();

    if let Some(ref output_dir) = args.output_dir {
        let paths: Vec<&Path> = results.iter().map(|r| r.path.as_path()).collect();
        for (result, name) in results.iter().zip(output_names(&paths)) {
            let output_path = output_dir.join(name);
            fs::write(&output_path, outcome_json(&result.outcome, config.output.pretty)?)?;
            debug!("Wrote {}", output_path.display());
        }
    } else {
        for result in &results {
            println!(
                "{}\t{}",
                result.path.display(),
                outcome_json(&result.outcome, false)?
            );
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("summary.csv");
        write_summary(&results, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let accepted = results.iter().filter(|r| r.outcome.is_accepted()).count();
    let rejected = results.len() - accepted;

    println!();
    println!(
        "{} Processed {} files in {:.2}s",
        style("✓").green(),
        results.len(),
        start.elapsed().as_secs_f64()
    );
    println!("  {} accepted", style(accepted).green());
    if rejected > 0 {
        println!("  {} need manual review", style(rejected).yellow());
        for result in results.iter().filter(|r| !r.outcome.is_accepted()) {
            if let Some(rejection) = result.outcome.rejection() {
                warn!("{}: {}", result.path.display(), rejection);
            }
        }
    }

    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn output_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{}.json", name)
}

/// One output file name per input; inputs from different directories that
/// share a file name get a numeric suffix.
fn output_names(paths: &[&Path]) -> Vec<String> {
    let mut used = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let base = output_name(path);
            let mut name = base.clone();
            let mut n = 1;
            while !used.insert(name.clone()) {
                name = format!("{}-{}.json", base.trim_end_matches(".json"), n);
                n += 1;
            }
            if name != base {
                warn!("{} shares an output name, writing {}", path.display(), name);
            }
            name
        })
        .collect()
}

fn write_summary(results: &[ProcessResult], path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "confidence",
        "serial_start",
        "serial_end",
        "vintage",
        "project_id",
        "error",
        "processing_time_ms",
    ])?;

    for result in results {
        let confidence = result
            .confidence
            .map(|c| format!("{:.2}", c.percent()))
            .unwrap_or_default();

        let (status, serial_start, serial_end, vintage, project_id, error) = match &result.outcome {
            Outcome::Accepted(record) => (
                "accepted",
                record.serial_start.as_ref().map(|n| n.to_string()).unwrap_or_default(),
                record.serial_end.as_ref().map(|n| n.to_string()).unwrap_or_default(),
                record.vintage.map(|n| n.to_string()).unwrap_or_default(),
                record.project_id.clone().unwrap_or_default(),
                String::new(),
            ),
            Outcome::Rejected(rejection) => (
                "rejected",
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                rejection.message().to_string(),
            ),
        };

        wtr.write_record([
            result.path.display().to_string(),
            status.to_string(),
            confidence,
            serial_start,
            serial_end,
            vintage,
            project_id,
            error,
            result.processing_time_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

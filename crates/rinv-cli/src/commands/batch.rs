//! Batch command - render many record files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use rinv_core::{Formatter, Invoice, InvoiceNormalizer, RowNormalizer};

use super::config::load_config;
use super::render::{format_invoice, read_row, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching record files (e.g. "rows/*.json")
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of rendering a single file.
struct RenderResult {
    path: PathBuf,
    invoice: Option<Invoice>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to render",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let normalizer = InvoiceNormalizer::from_config(&config.normalize);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = render_single_file(&path, &normalizer);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(invoice) => results.push(RenderResult {
                path,
                invoice: Some(invoice),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to render {}: {}", path.display(), error_msg);
                    anyhow::bail!("Rendering failed for {}: {}", path.display(), error_msg);
                }
                warn!("Failed to render {}: {}", path.display(), error_msg);
                results.push(RenderResult {
                    path,
                    invoice: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    let formatter = Formatter::from_config(&config.format);
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let Some(invoice) = &result.invoice else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_invoice(invoice, args.format, &formatter)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results, &formatter)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Rendered {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn render_single_file(path: &Path, normalizer: &InvoiceNormalizer) -> anyhow::Result<Invoice> {
    let row = read_row(path)?;
    Ok(normalizer.invoice(row.as_ref())?)
}

fn write_summary(path: &Path, results: &[RenderResult], formatter: &Formatter) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "number",
        "issued",
        "client",
        "items",
        "total",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let record = match &result.invoice {
            Some(invoice) => [
                filename,
                "success".to_string(),
                invoice.number.to_string(),
                formatter.date(&invoice.issued),
                invoice.client.name.clone(),
                invoice.items.len().to_string(),
                formatter.currency(&invoice.total),
                result.processing_time_ms.to_string(),
                String::new(),
            ],
            None => [
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.processing_time_ms.to_string(),
                result.error.clone().unwrap_or_default(),
            ],
        };
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

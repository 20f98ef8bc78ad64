//! Render command - normalize a single record and print the invoice.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rinv_core::models::embedded::example_row;
use rinv_core::{Formatter, Invoice, InvoiceNormalizer, Party, RawRow, RowNormalizer};

use super::config::load_config;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Record file (JSON object); reads stdin when omitted
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Render the built-in example record
    #[arg(long, conflicts_with_all = ["input", "labels"])]
    demo: bool,

    /// Render an empty record to show every placeholder label
    #[arg(long, conflicts_with = "input")]
    labels: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV of line items
    Csv,
    /// Plain text invoice
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let row = if args.demo {
        Some(example_row())
    } else if args.labels {
        Some(RawRow::new())
    } else if let Some(input) = &args.input {
        info!("Rendering record from {}", input.display());
        read_row(input)?
    } else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        parse_row(&text)?
    };

    let normalizer = InvoiceNormalizer::from_config(&config.normalize);
    let invoice = normalizer.invoice(row.as_ref())?;

    let formatter = Formatter::from_config(&config.format);
    let output = format_invoice(&invoice, args.format, &formatter)?;

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

    Ok(())
}

/// Read a record file. `null` or any non-object JSON means "no row".
pub fn read_row(path: &Path) -> anyhow::Result<Option<RawRow>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let text = fs::read_to_string(path)?;
    parse_row(&text)
}

fn parse_row(text: &str) -> anyhow::Result<Option<RawRow>> {
    Ok(RawRow::from_json(text)?)
}

pub fn format_invoice(
    invoice: &Invoice,
    format: OutputFormat,
    formatter: &Formatter,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice, formatter)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["number", "description", "quantity", "price", "total"])?;

    let number = invoice.number.to_string();
    for item in &invoice.items {
        wtr.write_record(&[
            number.clone(),
            item.description.clone(),
            item.quantity.map(|q| q.to_string()).unwrap_or_default(),
            item.price.map(|p| p.to_string()).unwrap_or_default(),
            item.total.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &Invoice, formatter: &Formatter) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.number));
    output.push_str(&format!("Issued:  {}\n", formatter.date(&invoice.issued)));
    output.push_str(&format!("Due:     {}\n", formatter.date(&invoice.due)));
    output.push('\n');

    push_party(&mut output, "From", &invoice.invoicer);
    push_party(&mut output, "To", &invoice.client);

    output.push_str("Items:\n");
    for item in &invoice.items {
        output.push_str(&format!(
            "  {:<40} {:>14}\n",
            item.description,
            formatter.format_amount(item.total)
        ));
    }
    output.push('\n');

    output.push_str(&format!("  Subtotal:  {}\n", formatter.currency(&invoice.subtotal)));
    output.push_str(&format!("  Deduction: {}\n", formatter.currency(&invoice.deduction)));
    output.push_str(&format!("  Taxes:     {}\n", formatter.currency(&invoice.taxes)));
    output.push_str(&format!("  Total:     {}\n", formatter.currency(&invoice.total)));

    if !invoice.note.is_empty() {
        output.push_str(&format!("\n{}\n", invoice.note));
    }

    output
}

fn push_party(output: &mut String, heading: &str, party: &Party) {
    output.push_str(&format!("{}:\n", heading));
    output.push_str(&format!("  {}\n", party.name));
    for line in party.address_lines() {
        output.push_str(&format!("  {}\n", line));
    }
    for contact in [&party.email, &party.phone, &party.url].into_iter().flatten() {
        output.push_str(&format!("  {}\n", contact));
    }
    output.push('\n');
}

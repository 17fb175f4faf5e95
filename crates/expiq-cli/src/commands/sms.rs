//! SMS command - categorize one message or parse a CSV dataset of them.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use expiq_core::{
    parse_records, require_non_empty, Category, ParsedRecord, SmsPrediction, SmsRecord,
    TransactionKind, TransactionRouter,
};

use super::{model_marker, Context};

/// Arguments for the sms command.
#[derive(Args)]
pub struct SmsArgs {
    /// Raw SMS text
    #[arg(required_unless_present = "input")]
    text: Option<String>,

    /// CSV file with an `sms_text` column (and optional `category`)
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Output CSV file (default: stdout)
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Also categorize each parsed message
    #[arg(long, requires = "input")]
    classify: bool,
}

/// One row of the parsed dataset.
#[derive(Debug, Serialize)]
struct DatasetRow {
    amount: String,
    merchant: Option<String>,
    date: Option<String>,
    original_text: String,
    true_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    predicted_category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    /// Calendar date as YYYY-MM-DD, empty when the message date is invalid.
    iso_date: Option<String>,
}

impl DatasetRow {
    fn new(record: ParsedRecord, prediction: Option<SmsPrediction>) -> Self {
        Self {
            amount: record.amount.to_string(),
            merchant: record.merchant,
            date: record.date,
            original_text: record.original_text,
            true_category: record.true_category,
            predicted_category: prediction.as_ref().map(|p| p.category),
            confidence: prediction.map(|p| p.confidence),
            iso_date: record.iso_date.map(|d| d.to_string()),
        }
    }
}

pub async fn run(args: SmsArgs, ctx: &Context) -> anyhow::Result<()> {
    match (&args.input, &args.text) {
        (Some(input), _) => parse_dataset(input, &args, ctx).await,
        (None, Some(text)) => predict_one(text, ctx),
        (None, None) => anyhow::bail!("Provide SMS text or --input"),
    }
}

fn predict_one(text: &str, ctx: &Context) -> anyhow::Result<()> {
    require_non_empty("sms_text", text)?;

    let prediction = ctx.router().predict_sms(text);
    ctx.emit(&prediction, format_prediction)
}

fn format_prediction(p: &SmsPrediction) -> String {
    let kind = match p.kind {
        TransactionKind::Expense => "expense",
        TransactionKind::CashWithdrawal => "cash withdrawal",
    };

    let mut output = String::new();
    output.push_str(&format!("Type:       {}\n", kind));
    output.push_str(&format!(
        "Amount:     {}\n",
        p.amount.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Date:       {}\n", p.date.as_deref().unwrap_or("-")));
    output.push_str(&format!(
        "Merchant:   {}\n",
        if p.merchant.is_empty() { "-" } else { p.merchant.as_str() }
    ));
    output.push_str(&format!(
        "Category:   {} ({:.2}, {})",
        style(p.category).cyan().bold(),
        p.confidence,
        model_marker(p.used_model)
    ));
    output
}

async fn parse_dataset(input: &Path, args: &SmsArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let mut reader = csv::Reader::from_path(input)?;
    let records = reader
        .deserialize::<SmsRecord>()
        .collect::<Result<Vec<_>, csv::Error>>()?;
    let total = records.len();
    debug!("Read {} rows from {}", total, input.display());

    let router = Arc::new(ctx.router());
    let classify = args.classify;
    let jobs = args.jobs.max(1);
    let chunk_size = total.div_ceil(jobs).max(1);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} messages")?
            .progress_chars("=>-"),
    );

    let mut handles = Vec::with_capacity(jobs);
    let mut remaining = records.into_iter();
    loop {
        let chunk: Vec<SmsRecord> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let router = Arc::clone(&router);
        let pb = pb.clone();
        let len = chunk.len() as u64;
        handles.push(tokio::task::spawn_blocking(move || {
            let rows = parse_chunk(&router, chunk, classify);
            pb.inc(len);
            rows
        }));
    }

    // Await in spawn order so output rows keep input order.
    let mut rows = Vec::with_capacity(total);
    for handle in handles {
        rows.extend(handle.await?);
    }
    pb.finish_and_clear();

    match &args.output {
        Some(path) => write_rows(csv::Writer::from_path(path)?, &rows)?,
        None => write_rows(csv::Writer::from_writer(io::stdout()), &rows)?,
    }

    info!(
        "Parsed {} of {} messages in {:.1}ms",
        rows.len(),
        total,
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(path) = &args.output {
        eprintln!(
            "{} Parsed {} of {} messages into {}",
            style("✓").green(),
            rows.len(),
            total,
            path.display()
        );
    }

    Ok(())
}

fn parse_chunk(
    router: &TransactionRouter,
    chunk: Vec<SmsRecord>,
    classify: bool,
) -> Vec<DatasetRow> {
    parse_records(router.parser(), chunk)
        .into_iter()
        .map(|record| {
            let prediction = classify.then(|| router.predict_sms(&record.original_text));
            DatasetRow::new(record, prediction)
        })
        .collect()
}

fn write_rows<W: io::Write>(mut wtr: csv::Writer<W>, rows: &[DatasetRow]) -> anyhow::Result<()> {
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

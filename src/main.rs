//! releval - evaluate relation classification predictions
//!
//! Scores a saved prediction set against a gold dataset and prints
//! classification, ranking, and structural-error metrics.
//!
//! ```bash
//! # Evaluate against the built-in TACRED vocabulary
//! releval --data test.json --predictions preds.jsonl
//!
//! # Custom vocabulary and Hits@K cutoffs, with per-instance artifacts
//! releval --data test.json --predictions preds.jsonl \
//!     --labels label2id.json --hits 1,5,10 --out runs/palstm
//!
//! # Machine-readable report
//! releval --data test.json --predictions preds.jsonl --json
//! ```

use clap::Parser;
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use releval::{
    write_artifacts, Dataset, EvalConfig, EvalReport, Evaluator, LabelIndex, PredictionSet,
    NO_RELATION, TACRED_LABELS,
};

/// Offline evaluation for relation classification models
#[derive(Parser, Debug)]
#[command(name = "releval", version, about)]
struct Cli {
    /// Gold dataset (JSON array of instances)
    #[arg(short, long, value_name = "PATH")]
    data: PathBuf,

    /// Model predictions (JSON Lines, one record per instance)
    #[arg(short, long, value_name = "PATH")]
    predictions: PathBuf,

    /// Label vocabulary as a JSON name-to-id mapping (default: built-in TACRED)
    #[arg(short, long, value_name = "PATH")]
    labels: Option<PathBuf>,

    /// Name of the negative label in the vocabulary
    #[arg(long, value_name = "LABEL", default_value = NO_RELATION)]
    negative_label: String,

    /// Hits@K cutoffs, comma-separated (overrides the config file)
    #[arg(long, value_name = "K", value_delimiter = ',')]
    hits: Vec<usize>,

    /// Evaluation config file (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write per-instance artifact files into this directory
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Show the per-label breakdown
    #[arg(short, long)]
    verbose: bool,

    /// Minimal output (suppress progress messages)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let labels = match &cli.labels {
        Some(path) => LabelIndex::from_json_file(path, &cli.negative_label)
            .map_err(|e| format!("failed to load labels: {}", e))?,
        None => LabelIndex::from_names(TACRED_LABELS, &cli.negative_label)
            .map_err(|e| format!("cannot use {:?} as negative label: {}", cli.negative_label, e))?,
    };

    let mut config = match &cli.config {
        Some(path) => {
            EvalConfig::from_json_file(path).map_err(|e| format!("failed to load config: {}", e))?
        }
        None => EvalConfig::default(),
    };
    if !cli.hits.is_empty() {
        config.hit_levels = cli.hits.clone();
    }

    log_info(
        &format!("Loading data from {}...", cli.data.display()),
        cli.quiet,
    );
    let dataset = Dataset::from_json_file(&cli.data)
        .map_err(|e| format!("failed to load {}: {}", cli.data.display(), e))?;

    log_info(
        &format!("Loading predictions from {}...", cli.predictions.display()),
        cli.quiet,
    );
    let predictions = PredictionSet::from_jsonl_file(&cli.predictions, &labels)
        .map_err(|e| format!("failed to load {}: {}", cli.predictions.display(), e))?;

    let name = cli
        .data
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("eval")
        .to_string();

    let evaluator = Evaluator::with_config(labels, config);
    let report = evaluator
        .evaluate(&name, &dataset, &predictions)
        .map_err(|e| e.to_string())?;

    if cli.json {
        println!("{}", report.to_json().map_err(|e| e.to_string())?);
    } else {
        print_human(&report, cli.verbose);
    }

    if let Some(dir) = &cli.out {
        write_artifacts(dir, &dataset, &predictions, evaluator.labels(), &report)
            .map_err(|e| format!("failed to write artifacts to {}: {}", dir.display(), e))?;
        log_info(&format!("saving to: {}", dir.display()), cli.quiet);
    }

    log_info("Evaluation ended.", cli.quiet);
    Ok(())
}

fn print_human(report: &EvalReport, verbose: bool) {
    println!();
    println!(
        "{}",
        color(
            "1;36",
            "======================================================================="
        )
    );
    println!(
        "  {}  dataset={}  instances={}",
        color("1;36", "EVALUATION"),
        report.dataset,
        report.instances
    );
    println!(
        "  labels={}  negative={}",
        report.labels, report.negative_label
    );
    println!(
        "{}",
        color(
            "1;36",
            "======================================================================="
        )
    );
    println!();

    let c = &report.classification;
    println!("  Precision: {}%", metric_colored(c.precision * 100.0));
    println!("  Recall:    {}%", metric_colored(c.recall * 100.0));
    println!("  F1:        {}%", metric_colored(c.f1 * 100.0));
    println!(
        "  TP={}  FP={}  FN={}  TN={}",
        c.true_positives, c.false_positives, c.false_negatives, c.true_negatives
    );
    println!();

    if verbose && !c.per_label.is_empty() {
        println!("{}:", color("1;33", "Per-Label Breakdown"));
        for tally in &c.per_label {
            println!(
                "  {:<40} P={:6.2}% R={:6.2}% F1={:6.2}% (gold={})",
                tally.label,
                tally.precision * 100.0,
                tally.recall * 100.0,
                tally.f1 * 100.0,
                tally.gold
            );
        }
        println!();
    }

    println!("{}:", color("1;33", "Ranks"));
    for hits in &report.ranking.hits {
        println!("  HITs@{}: {:.2}", hits.k, hits.fraction * 100.0);
    }
    println!("  MRR: {:.2}", report.ranking.mrr * 100.0);
    println!("  MR: {:.2}", report.ranking.mean_rank);
    println!(
        "  ranked={}  skipped negative-gold={}",
        report.ranking.evaluated, report.ranking.skipped
    );
    println!();

    println!("{}:", color("1;33", "Structure Errors"));
    for bucket in &report.structure {
        let accuracy = match bucket.accuracy {
            Some(a) => format!("{:.4}", a * 100.0),
            None => "n/a".to_string(),
        };
        println!(
            "  {} | Accuracy: {} | Correct: {} | Wrong: {} | Total: {}",
            bucket.name, accuracy, bucket.correct, bucket.wrong, bucket.total
        );
    }
    println!();
}

/// Log info message (respects quiet flag)
fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Colorize text with ANSI escape codes (only if stdout is a terminal)
fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format metric value with color based on threshold
fn metric_colored(value: f64) -> String {
    let code = if value >= 90.0 {
        "1;32"
    } else if value >= 70.0 {
        "1;33"
    } else if value >= 50.0 {
        "33"
    } else {
        "1;31"
    };
    color(code, &format!("{:5.2}", value))
}

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snr::catalog::Catalog;
use snr::format;
use snr::loader::SymphoniaLoader;
use snr::models::{AnalysisReport, ProcessEvent};
use snr::processor::{CatalogProcessor, FailurePolicy};
use snr::report;

#[derive(Parser)]
#[command(
    name = "snr",
    about = "Signal-to-noise ratio of compressed audio against its original"
)]
struct Cli {
    /// Catalog file (TOML). The built-in catalog is used when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory the built-in catalog's audio files are read from (default: .)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Directory reports and charts are written to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Print JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Also write a CSV report (snr_report.csv)
    #[arg(long)]
    csv: bool,

    /// Skip writing the chart files
    #[arg(long)]
    no_charts: bool,

    /// Browse the results in an interactive TUI
    #[arg(long)]
    tui: bool,

    /// Abort on the first entry that cannot be measured
    #[arg(long)]
    fail_fast: bool,

    /// Re-render the report saved in --out instead of decoding audio
    #[arg(long)]
    cached: bool,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SNR_LOG")
                .unwrap_or_else(|_| "snr=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_benchmark(report: &AnalysisReport, elapsed: Duration) {
    eprintln!(
        "Processed {} entries ({} measured, {} failed) in {:.2}s",
        report.records.len(),
        report.measured_count(),
        report.failed_count(),
        elapsed.as_secs_f64(),
    );
}

fn measure(cli: &Cli) -> Result<AnalysisReport> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?,
        None => Catalog::builtin(cli.base_dir.clone().unwrap_or_else(|| PathBuf::from("."))),
    };

    let policy = if cli.fail_fast {
        FailurePolicy::FailFast
    } else {
        FailurePolicy::KeepGoing
    };
    let processor = CatalogProcessor::new(SymphoniaLoader).with_policy(policy);

    let start = Instant::now();
    let report = processor.process_with_progress(&catalog, |event| match event {
        ProcessEvent::EntryStarted {
            index,
            total,
            algorithm,
        } => eprintln!("[{}/{}] Measuring: {}", index + 1, total, algorithm),
        ProcessEvent::EntryFailed { message, .. } => {
            eprintln!("  Warning: failed to measure: {}", message)
        }
        ProcessEvent::EntryCompleted { .. } => {}
    })?;

    print_benchmark(&report, start.elapsed());
    Ok(report)
}

fn write_reports(cli: &Cli, out: &Path, report: &AnalysisReport) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    if !cli.cached {
        if let Err(e) = report::save_json_report(out, report) {
            eprintln!("Warning: failed to save JSON report: {}", e);
        }
    }
    if let Err(e) = report::save_text_report(out, report) {
        eprintln!("Warning: failed to save text report: {}", e);
    }
    if cli.csv {
        if let Err(e) = report::save_csv_report(out, report) {
            eprintln!("Warning: failed to save CSV report: {}", e);
        }
    }
    if !cli.no_charts {
        if let Err(e) = report::save_charts(out, report) {
            eprintln!("Warning: failed to save charts: {}", e);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if cli.catalog.is_some() && cli.base_dir.is_some() {
        anyhow::bail!("--base-dir only applies to the built-in catalog; catalog files resolve paths relative to themselves");
    }
    if cli.cached && (cli.catalog.is_some() || cli.base_dir.is_some() || cli.fail_fast) {
        anyhow::bail!("--cached re-renders a saved report and cannot be combined with --catalog, --base-dir or --fail-fast");
    }
    if cli.json && cli.tui {
        anyhow::bail!("--json and --tui cannot be used together");
    }

    let out = cli.out.clone();

    let report = if cli.cached {
        let cached = report::load_saved_report(&out)
            .with_context(|| {
                format!(
                    "Failed to read saved report {}",
                    out.join(report::JSON_REPORT_FILENAME).display()
                )
            })?
            .with_context(|| {
                format!(
                    "No saved report found in {} (expected {})",
                    out.display(),
                    report::JSON_REPORT_FILENAME
                )
            })?;
        eprintln!("(loaded from saved report)");
        cached
    } else {
        measure(&cli)?
    };

    write_reports(&cli, &out, &report)?;

    if cli.tui {
        return snr::tui::run(report, &out);
    }

    if cli.json {
        println!("{}", format::format_json(&report));
    } else {
        println!("{}\n", format::format_summary(&report));
        println!("{}", format::format_table(&report));
    }

    Ok(())
}

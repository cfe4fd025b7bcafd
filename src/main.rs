use clap::Parser;
use colored::Colorize;
use fluttertidy::analysis::{AnalysisResult, Analyzer, Domain, Finding};
use fluttertidy::baseline::{Baseline, BaselineStats};
use fluttertidy::config::{Config, ReachabilityMode};
use fluttertidy::report::{ReportFormat, Reporter};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// fluttertidy - Find unused assets, files and dependencies in Flutter projects
#[derive(Parser, Debug)]
#[command(name = "fluttertidy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Flutter project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyses to run (can be specified multiple times; default: all)
    #[arg(long, value_enum)]
    only: Vec<DomainArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat files as used only when reachable from an entry point
    #[arg(long)]
    transitive: bool,

    /// Show the files that reference each used item
    #[arg(long)]
    show_references: bool,

    /// Directory names to skip when collecting sources (can be specified multiple times)
    #[arg(short, long = "exclude-dir", value_name = "NAME")]
    exclude_dir: Vec<String>,

    /// Patterns to retain - never report as unused (can be specified multiple times)
    #[arg(short, long)]
    retain: Vec<String>,

    /// Baseline file for ignoring existing unused items
    /// Only items not in the baseline will be reported
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Generate a baseline file from current results
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Exit with status 1 when unused items are reported
    #[arg(long)]
    fail_on_unused: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DomainArg {
    Assets,
    Files,
    Dependencies,
}

impl From<DomainArg> for Domain {
    fn from(domain: DomainArg) -> Self {
        match domain {
            DomainArg::Assets => Domain::Assets,
            DomainArg::Files => Domain::Files,
            DomainArg::Dependencies => Domain::Dependencies,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("fluttertidy v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let has_unused = run_analysis(&config, &cli)?;

    if cli.fail_on_unused && has_unused {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout is reserved for the report
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.exclude_dir.is_empty() {
        config.exclude_dirs.extend(cli.exclude_dir.iter().cloned());
    }
    if !cli.retain.is_empty() {
        config.retain.extend(cli.retain.iter().cloned());
    }
    if cli.transitive {
        config.reachability = ReachabilityMode::Transitive;
    }
    if cli.show_references {
        config.report.show_references = true;
    }

    Ok(config)
}

/// Run the analysis and report; returns whether unused items were reported
fn run_analysis(config: &Config, cli: &Cli) -> Result<bool> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::{Duration, Instant};

    let start_time = Instant::now();

    let format = cli
        .format
        .map(ReportFormat::from)
        .unwrap_or_else(|| ReportFormat::from_name(&config.report.format));

    let domains: Vec<Domain> = cli.only.iter().copied().map(Domain::from).collect();
    let analyzer = Analyzer::new(&cli.path, config.clone()).with_domains(&domains);

    let spinner = if format == ReportFormat::Terminal && !cli.quiet {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Scanning {}...", analyzer.project_root().display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = analyzer.run();
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let result = result?;

    let findings = result.findings();

    if let Some(ref baseline_path) = cli.generate_baseline {
        info!("Generating baseline file...");
        let baseline = Baseline::from_findings(&findings);
        baseline.save(baseline_path).into_diagnostic()?;
        eprintln!(
            "{} Baseline written to {} ({} items)",
            "✓".green(),
            baseline_path.display(),
            findings.len()
        );
    }

    let (findings, stats) = apply_baseline(&result, findings, cli);

    let reporter = Reporter::new(format, cli.output.clone())
        .with_references(config.report.show_references)
        .with_baseline_stats(stats);
    reporter.report(&result, &findings)?;

    info!("Analysis finished in {:.2?}", start_time.elapsed());

    Ok(!findings.is_empty())
}

fn apply_baseline(
    result: &AnalysisResult,
    findings: Vec<Finding>,
    cli: &Cli,
) -> (Vec<Finding>, Option<BaselineStats>) {
    let Some(ref baseline_path) = cli.baseline else {
        return (findings, None);
    };

    match Baseline::load(baseline_path) {
        Ok(baseline) => {
            let stats = baseline.stats(&findings);
            info!("Baseline for {}: {}", result.project_root.display(), stats);
            (baseline.filter_new(&findings), Some(stats))
        }
        Err(e) => {
            eprintln!("{}: Failed to load baseline: {}", "Warning".yellow(), e);
            (findings, None)
        }
    }
}

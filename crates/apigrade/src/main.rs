mod logging;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use apigrade_core::config::{Config, CONFIG_FILE};
use apigrade_core::scanner::Scanner;
use apigrade_core::scoring::Scorer;
use apigrade_core::types::WeekNumber;

use apigrade_python::FastApiExtractor;
use apigrade_report::json::EvaluationRecord;
use apigrade_report::{markdown, persist, text, ReportContext};

#[derive(Parser)]
#[command(name = "apigrade")]
#[command(about = "Grade a FastAPI course submission and write an evaluation report")]
#[command(version)]
struct Cli {
    /// Log every analyzed file
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a submission, score it and write the report and record
    Evaluate(EvaluateArgs),
    /// Create a default .apigrade.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct EvaluateArgs {
    /// Student display name
    #[arg(long, env = "STUDENT_NAME", default_value = "Student")]
    student: String,
    /// Course week (positive integer)
    #[arg(long, env = "WEEK_NUMBER", default_value = "1")]
    week: WeekNumber,
    /// Submission root directory
    #[arg(long, env = "SUBMISSION_DIR", default_value = "student-repo")]
    submission: PathBuf,
    /// Markdown report destination
    #[arg(long, env = "REPORT_PATH", default_value = "evaluation_report.md")]
    report: PathBuf,
    /// JSON record destination
    #[arg(long, env = "RECORD_PATH", default_value = "analysis_result.json")]
    record: PathBuf,
    /// Config file path (defaults to .apigrade.toml in the working directory or an ancestor)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = match cli.command {
        Commands::Evaluate(args) => cmd_evaluate(&args),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        process::exit(2);
    }
}

fn cmd_evaluate(args: &EvaluateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let extractor = FastApiExtractor::new().context("failed to initialize FastAPI extractor")?;
    let scanner = Scanner::new(Box::new(extractor), &config.scanner)
        .context("invalid scanner configuration")?;
    let extractor = scanner.extractor();

    tracing::info!(
        student = %args.student,
        week = %args.week,
        "apigrade v{}",
        env!("CARGO_PKG_VERSION")
    );

    let analysis = scanner.scan(&args.submission);

    let ctx = ReportContext {
        student_name: &args.student,
        week: args.week,
        timestamp: Local::now(),
        framework: extractor.framework(),
        file_extensions: extractor.file_extensions(),
        max_score: config.rubric.max_score,
        course: &config.course,
    };

    let score = if analysis.has_code() {
        let score = Scorer::new(&config.rubric, extractor.framework()).score(&analysis, args.week);
        tracing::info!(
            "evaluation complete: {}/{} ({})",
            score.score,
            config.rubric.max_score,
            score.category
        );
        Some(score)
    } else {
        tracing::warn!("no source code found to evaluate");
        None
    };

    let (report, record) = match &score {
        Some(score) => (
            markdown::format_report(&ctx, &analysis, score),
            EvaluationRecord::scored(&ctx, &analysis, score),
        ),
        None => (
            markdown::format_no_code_report(&ctx),
            EvaluationRecord::no_code(&ctx, &analysis),
        ),
    };

    let outcome = persist::write_artifacts(&args.report, &report, &args.record, &record);
    print!("{}", text::format_summary(&ctx, &analysis, score.as_ref()));

    if !outcome.is_success() {
        tracing::error!("{} artifact(s) could not be saved", outcome.failures.len());
        process::exit(1);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(CONFIG_FILE);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE} already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())
        .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
    println!("Created {CONFIG_FILE} with default configuration.");
    Ok(())
}

/// Grading rules come from the grader's side, never from the submission tree.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => {
            let cwd = std::env::current_dir().context("failed to read working directory")?;
            Ok(Config::load_or_default(&cwd))
        }
    }
}

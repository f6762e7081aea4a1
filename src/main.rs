/// Analyzer Renamer - creates a new logic analyzer plugin from the SimpleSerial template
///
/// The main entry point asks for the new analyzer's name and title (unless
/// given on the command line), plans every rename and rewrite, and applies
/// the plan.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::fs::File;
use std::path::PathBuf;
use std::process;

use analyzer_renamer::config::Settings;
use analyzer_renamer::utils::{output_formatter, prompt};
use analyzer_renamer::app::{self, RunOutcome};
use analyzer_renamer::{AnalyzerName, AnalyzerTitle, ApplyError, ApplyOptions, RenamePlan};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "rename_analyzer",
    version,
    about = "Create a new analyzer plugin from the SimpleSerial template",
    long_about = "Renames the template's files under src/ and rewrites the identifiers they contain:
- class names (SimpleSerialAnalyzer, SimpleSerialSimulationDataGenerator)
- macro guards (SIMPLESERIAL_ANALYZER_...)
- the project name in CMakeLists.txt
- the analyzer title shown in the add analyzer drop down"
)]
struct Args {
    /// New analyzer name, without the trailing 'Analyzer' (prompted for when absent)
    #[arg(long = "name")]
    name: Option<String>,

    /// New analyzer title (prompted for when absent)
    #[arg(long = "title")]
    title: Option<String>,

    /// Project directory containing CMakeLists.txt and src/
    #[arg(long = "project-dir", default_value = ".")]
    project_dir: PathBuf,

    /// Path to a JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Show the planned changes without touching any file
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Export the plan to a JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Undo completed changes if a later step fails
    #[arg(long = "rollback-on-failure", action = ArgAction::SetTrue)]
    rollback_on_failure: bool,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Log file path (default: stderr)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(e) = run(&args) {
        match e.downcast_ref::<ApplyError>() {
            Some(apply_error) => eprint!("{}", output_formatter::format_failure(apply_error)),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    // Both answers are collected before either is validated
    let raw_name = match &args.name {
        Some(name) => name.clone(),
        None => prompt::ask_name().context("Failed to read the analyzer name")?,
    };
    let raw_title = match &args.title {
        Some(title) => title.clone(),
        None => prompt::ask_title().context("Failed to read the analyzer title")?,
    };

    let name = AnalyzerName::parse(&raw_name)?;
    let title = AnalyzerTitle::parse(&raw_title)?;
    info!("Renaming '{}' to '{}' ({})", settings.template_name, name, title);

    let plan = RenamePlan::build(&args.project_dir, &settings, &name, &title)?;

    if !args.quiet {
        println!("\n{}", output_formatter::format_plan(&plan));
    }

    if let Some(json_path) = &args.json {
        output_formatter::export_plan_json(&plan, json_path)?;
        info!("Plan exported to {}", json_path.display());
    }

    let progress_bar = if !args.quiet && !args.dry_run && !plan.is_empty() {
        let pb = ProgressBar::new(step_count(&plan));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let options = ApplyOptions {
        rollback_on_failure: args.rollback_on_failure,
    };
    let result = app::execute(&plan, args.dry_run, options, |step| {
        if let Some(pb) = &progress_bar {
            pb.set_message(step.to_string());
            pb.inc(1);
        }
    });

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let outcome = result?;
    if !args.quiet {
        match outcome {
            RunOutcome::DryRun => println!("{}", "Dry run: no files were changed".yellow()),
            RunOutcome::NothingToDo => println!("{}", "Nothing to rename".yellow()),
            RunOutcome::Applied(report) => print!("{}", output_formatter::format_report(&report)),
        }
    }

    Ok(())
}

/// Upper bound on the number of steps, for the progress bar
fn step_count(plan: &RenamePlan) -> u64 {
    let project = u64::from(plan.project_file.is_some());
    project + 2 * plan.sources.len() as u64
}

/// Set up logging to stderr or to a log file
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        match File::create(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!(
                "{} cannot open log file {}: {}",
                "Warning:".yellow(),
                log_file.display(),
                e
            ),
        }
    }

    builder.init();
}

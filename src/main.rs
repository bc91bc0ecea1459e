use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod engagement;
mod error;
mod loader;
mod metrics;
mod models;
mod report;
mod session;

use error::AnalysisError;
use session::AnalysisSession;

#[derive(Parser)]
#[command(name = "school-assessment-report")]
#[command(about = "Per-student assessment summaries from semester score sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary report for one student
    Report {
        #[arg(long, default_value = "all_semester.csv")]
        assessments: PathBuf,
        #[arg(long, default_value = "web.csv")]
        web: PathBuf,
        /// Student to analyze; prompted for when omitted
        #[arg(long)]
        student: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print cohort-wide averages and notable students
    Cohort {
        #[arg(long, default_value = "all_semester.csv")]
        assessments: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn report_failure(err: &AnalysisError) {
    warn!(kind = ?err.kind(), "{err}");
}

fn prompt_student_name() -> anyhow::Result<String> {
    print!("Enter the name of the student: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read student name")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            assessments,
            web,
            student,
            format,
        } => {
            let mut session = AnalysisSession::new();
            if let Err(err) = session.process_file(&assessments) {
                report_failure(&err);
                return Ok(());
            }

            let student_name = match student {
                Some(name) => name,
                None => prompt_student_name()?,
            };

            if let Err(err) = session.fetch_web_data(&web, &student_name) {
                report_failure(&err);
                return Ok(());
            }
            info!(student = %student_name, engagement = %session.engagement(), "web data loaded");

            let student_report = match session.analyze_student(&student_name) {
                Ok(report) => report,
                Err(err) => {
                    report_failure(&err);
                    warn!("No report to generate summary from.");
                    return Ok(());
                }
            };

            let generated_on = Local::now().date_naive();
            match format {
                OutputFormat::Text => {
                    println!("{}", report::render_summary(&student_report, generated_on));
                }
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "generated_on": generated_on,
                        "report": student_report,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
            }
            info!(student = %student_name, "report generated");
        }
        Commands::Cohort { assessments } => {
            let mut session = AnalysisSession::new();
            if let Err(err) = session.process_file(&assessments) {
                report_failure(&err);
                return Ok(());
            }

            match session.cohort_summary() {
                Ok(Some(summary)) => print!("{}", report::render_cohort(&summary)),
                Ok(None) => println!("No students recorded in {}.", assessments.display()),
                Err(err) => report_failure(&err),
            }
        }
    }

    Ok(())
}

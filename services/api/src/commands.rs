use crate::infra::load_service;
use clap::Args;
use riskform::assessment::export::{read_answers, write_results_csv};
use riskform::assessment::{AssessmentReport, ExportError, RiskAssessment};
use riskform::config::AppConfig;
use riskform::error::AppError;
use riskform::telemetry;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct BuildArgs {
    /// Directory holding the form definition (defaults to RISKFORM_FORM_DIR)
    #[arg(long)]
    pub(crate) form_dir: Option<PathBuf>,
    /// Bundle path (defaults to RISKFORM_OUTPUT_DIR/form.json)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Directory holding the form definition (defaults to RISKFORM_FORM_DIR)
    #[arg(long)]
    pub(crate) form_dir: Option<PathBuf>,
    /// Print results as CSV instead of a summary
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) fn run_build(args: BuildArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let form_dir = args.form_dir.unwrap_or(config.form.form_dir.clone());
    let output = args.output.unwrap_or_else(|| config.form.bundle_path());

    let written = build_bundle(&form_dir, &output)?;
    println!("Compiled form written to {}", written.display());
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let form_dir = args.form_dir.unwrap_or(config.form.form_dir);
    let report = evaluate_file(&form_dir, &args.answers)?;

    if args.csv {
        write_results_csv(std::io::stdout().lock(), &report.results)?;
    } else {
        render_report(&report);
    }
    Ok(())
}

/// Compile `form_dir` and write the bundle to `output`, creating parent directories.
pub(crate) fn build_bundle(form_dir: &Path, output: &Path) -> Result<PathBuf, AppError> {
    let service = load_service(form_dir)?;

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(writer, service.compiled()).map_err(ExportError::from)?;

    info!(output = %output.display(), "form bundle written");
    Ok(output.to_path_buf())
}

pub(crate) fn evaluate_file(form_dir: &Path, answers: &Path) -> Result<AssessmentReport, AppError> {
    let service = load_service(form_dir)?;
    let answers = read_answers(File::open(answers)?)?;
    let report = service.assess(answers).map_err(ExportError::from)?;
    Ok(report)
}

fn render_report(report: &AssessmentReport) {
    println!("Risk assessment");
    println!(
        "Answered questions: {} (visible: {})",
        report.answers.len(),
        report.visible_questions.len()
    );
    println!("Highest residual level: {}", report.highest_level().label());

    println!("\nRisks");
    for result in &report.results {
        println!("- {}", summary_line(result));
    }
}

fn summary_line(result: &RiskAssessment) -> String {
    let dimension = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let likelihood = dimension(result.residual.likelihood.map(|value| value.to_string()));
    let consequence = dimension(result.residual.consequence.map(|value| value.to_string()));

    let mut line = format!(
        "{}: {} ({} / {})",
        result.name,
        result.level.label(),
        likelihood,
        consequence
    );
    if result.is_mitigated() {
        line.push_str(&format!(
            ", reduced from {} by {}",
            result.inherent_level.label(),
            result.applied_controls.join(", ")
        ));
    }
    line
}

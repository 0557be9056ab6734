use super::answers::Answers;
use super::error::ExportError;
use super::risk::{Consequence, Likelihood, RiskAssessment, RiskLevel};
use super::service::AssessmentReport;
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    risk_id: &'a str,
    risk: &'a str,
    likelihood: Option<Likelihood>,
    consequence: Option<Consequence>,
    inherent_level: RiskLevel,
    level: RiskLevel,
    controls: String,
}

/// Read a persisted answer export.
pub fn read_answers<R: Read>(reader: R) -> Result<Answers, ExportError> {
    Ok(Answers::from_json_reader(reader)?)
}

/// One row per risk: residual pair, inherent and residual level, applied controls.
pub fn write_results_csv<W: Write>(writer: W, results: &[RiskAssessment]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(ResultRow {
            risk_id: &result.risk_id,
            risk: &result.name,
            likelihood: result.residual.likelihood,
            consequence: result.residual.consequence,
            inherent_level: result.inherent_level,
            level: result.level,
            controls: result.applied_controls.join(";"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_json<W: Write>(writer: W, report: &AssessmentReport) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

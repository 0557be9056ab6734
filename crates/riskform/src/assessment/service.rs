use super::answers::Answers;
use super::compile::{compile_form, CompiledForm};
use super::error::FormError;
use super::loader::FormDefinition;
use super::questions::visible_question_ids;
use super::risk::{RiskAssessment, RiskEvaluator, RiskLevel};
use super::validation::{validate_answer_keys, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Snapshot of a completed (or partially completed) assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub generated_at: DateTime<Utc>,
    pub answers: Answers,
    pub visible_questions: Vec<String>,
    pub results: Vec<RiskAssessment>,
}

impl AssessmentReport {
    pub fn result(&self, risk_id: &str) -> Option<&RiskAssessment> {
        self.results.iter().find(|result| result.risk_id == risk_id)
    }

    pub fn highest_level(&self) -> RiskLevel {
        self.results
            .iter()
            .map(|result| result.level)
            .max()
            .unwrap_or(RiskLevel::NotApplicable)
    }
}

/// A validated, compiled form ready to assess answers.
pub struct AssessmentService {
    form: FormDefinition,
    compiled: CompiledForm,
    evaluator: RiskEvaluator,
}

impl AssessmentService {
    pub fn new(form: FormDefinition) -> Result<Self, ValidationError> {
        let compiled = compile_form(&form)?;
        let evaluator = form.evaluator();
        Ok(Self {
            form,
            compiled,
            evaluator,
        })
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, FormError> {
        let form = FormDefinition::load_dir(dir)?;
        Ok(Self::new(form)?)
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn compiled(&self) -> &CompiledForm {
        &self.compiled
    }

    pub fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// Resolve every risk for `answers`; keys must all name questions of this form.
    pub fn assess(&self, answers: Answers) -> Result<AssessmentReport, ValidationError> {
        validate_answer_keys(&answers, &self.form.sections)?;

        let visible_questions = visible_question_ids(&self.form.sections, &answers)
            .into_iter()
            .map(str::to_string)
            .collect();
        let results = self.evaluator.evaluate_all(&answers);

        let report = AssessmentReport {
            generated_at: Utc::now(),
            answers,
            visible_questions,
            results,
        };

        info!(
            answered = report.answers.len(),
            risks = report.results.len(),
            highest = %report.highest_level(),
            "assessment evaluated"
        );

        Ok(report)
    }
}

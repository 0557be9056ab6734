//! Whole-form compilation into the bundle consumed by the single-page client.

use super::js::{COMPONENT_ANSWERS, TEMPLATE_ANSWERS};
use super::loader::FormDefinition;
use super::questions::{all_questions, Question, Section, SubSection};
use super::risk::scale::resolve;
use super::risk::{Consequence, Control, Likelihood, Risk, RiskLevel};
use super::validation::{validate_references, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct CompiledForm {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<CompiledSection>,
    pub risks: Vec<CompiledRisk>,
    pub controls: Vec<CompiledControl>,
    pub scales: ScaleTables,
}

impl CompiledForm {
    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.subsections)
            .map(|subsection| subsection.questions.len())
            .sum()
    }

    pub fn risk(&self, risk_id: &str) -> Option<&CompiledRisk> {
        self.risks.iter().find(|risk| risk.id == risk_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompiledSection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subsections: Vec<CompiledSubSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompiledSubSection {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when_js: Option<String>,
    pub questions: Vec<CompiledQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompiledQuestion {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when_js: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompiledRisk {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Evaluated in order; the first non-null result wins.
    pub rules_js: Vec<String>,
    pub default_likelihood: Option<Likelihood>,
    pub default_consequence: Option<Consequence>,
    pub questions: Vec<QuestionRef>,
    pub controls: Vec<ControlEffectView>,
}

/// Question a risk reads, for display next to the risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRef {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlEffectView {
    pub id: String,
    pub name: String,
    pub reduces_likelihood: bool,
    pub reduces_consequence: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompiledControl {
    pub id: String,
    pub name: String,
    pub question_id: String,
    pub presence_js: String,
}

/// Ordered scales and the full matrix, for the client-side aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleTables {
    pub likelihoods: Vec<Likelihood>,
    pub consequences: Vec<Consequence>,
    pub levels: Vec<RiskLevel>,
    pub matrix: BTreeMap<Likelihood, BTreeMap<Consequence, RiskLevel>>,
}

impl ScaleTables {
    pub fn standard() -> Self {
        let matrix = Likelihood::ALL
            .iter()
            .map(|&likelihood| {
                let row = Consequence::ALL
                    .iter()
                    .map(|&consequence| (consequence, resolve(likelihood, consequence)))
                    .collect();
                (likelihood, row)
            })
            .collect();

        Self {
            likelihoods: Likelihood::ALL.to_vec(),
            consequences: Consequence::ALL.to_vec(),
            levels: RiskLevel::ALL.to_vec(),
            matrix,
        }
    }
}

/// Validate references, then compile every condition, rule and control predicate.
pub fn compile_form(form: &FormDefinition) -> Result<CompiledForm, ValidationError> {
    validate_references(&form.sections, &form.risks, &form.controls)?;

    let sections: Vec<CompiledSection> = form.sections.iter().map(compile_section).collect();
    let risks = compile_risks(&form.risks, &form.sections, &form.controls);
    let controls = form.controls.iter().map(compile_control).collect();

    let compiled = CompiledForm {
        generated_at: Utc::now(),
        sections,
        risks,
        controls,
        scales: ScaleTables::standard(),
    };

    info!(
        sections = compiled.sections.len(),
        questions = compiled.question_count(),
        risks = compiled.risks.len(),
        controls = compiled.controls.len(),
        "form compiled"
    );

    Ok(compiled)
}

pub fn compile_section(section: &Section) -> CompiledSection {
    CompiledSection {
        id: section.id.clone(),
        title: section.title.clone(),
        description: section.description.clone(),
        subsections: section.subsections.iter().map(compile_subsection).collect(),
    }
}

fn compile_subsection(subsection: &SubSection) -> CompiledSubSection {
    CompiledSubSection {
        title: subsection.title.clone(),
        description: subsection.description.clone(),
        visible_when_js: subsection
            .visible_when
            .as_ref()
            .map(|condition| condition.to_js(TEMPLATE_ANSWERS)),
        questions: subsection.questions.iter().map(compile_question).collect(),
    }
}

fn compile_question(question: &Question) -> CompiledQuestion {
    CompiledQuestion {
        id: question.id.clone(),
        text: question.text.clone(),
        guidance: question.guidance.clone(),
        kind: question.kind.as_str(),
        options: question.kind.options().to_vec(),
        visible_when_js: question
            .visible_when
            .as_ref()
            .map(|condition| condition.to_js(TEMPLATE_ANSWERS)),
    }
}

/// Compile risks and attach each control's effects to the risk they reduce.
pub fn compile_risks(risks: &[Risk], sections: &[Section], controls: &[Control]) -> Vec<CompiledRisk> {
    let question_text: HashMap<&str, &str> = all_questions(sections)
        .into_iter()
        .map(|question| (question.id.as_str(), question.text.as_str()))
        .collect();

    risks
        .iter()
        .map(|risk| CompiledRisk {
            id: risk.id.clone(),
            name: risk.name.clone(),
            description: risk.description.clone(),
            rules_js: risk
                .rules
                .iter()
                .map(|rule| rule.to_js(COMPONENT_ANSWERS))
                .collect(),
            default_likelihood: risk.default_likelihood,
            default_consequence: risk.default_consequence,
            questions: risk
                .referenced_question_ids()
                .into_iter()
                .filter_map(|id| {
                    question_text.get(id).map(|text| QuestionRef {
                        id: id.to_string(),
                        text: text.to_string(),
                    })
                })
                .collect(),
            controls: controls
                .iter()
                .flat_map(|control| {
                    control.effects_on(&risk.id).map(move |effect| ControlEffectView {
                        id: control.id.clone(),
                        name: control.name.clone(),
                        reduces_likelihood: effect.reduces_likelihood(),
                        reduces_consequence: effect.reduces_consequence(),
                    })
                })
                .collect(),
        })
        .collect()
}

pub fn compile_control(control: &Control) -> CompiledControl {
    CompiledControl {
        id: control.id.clone(),
        name: control.name.clone(),
        question_id: control.question_id.clone(),
        presence_js: control.presence_js(COMPONENT_ANSWERS),
    }
}

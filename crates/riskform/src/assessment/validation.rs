use super::answers::Answers;
use super::questions::{all_questions, Section};
use super::risk::{Control, Risk};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Definition that refers to another by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Owner {
    Question(String),
    SubSection(String),
    Risk(String),
    Control(String),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Question(id) => write!(f, "question `{id}`"),
            Owner::SubSection(title) => write!(f, "subsection `{title}`"),
            Owner::Risk(id) => write!(f, "risk `{id}`"),
            Owner::Control(id) => write!(f, "control `{id}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ReferenceIssue {
    UnknownQuestion { owner: Owner, question_id: String },
    UnknownRisk { owner: Owner, risk_id: String },
    DuplicateQuestion { question_id: String },
    DuplicateRisk { risk_id: String },
    UnknownAnswer { question_id: String },
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceIssue::UnknownQuestion { owner, question_id } => {
                write!(f, "{owner} references unknown question `{question_id}`")
            }
            ReferenceIssue::UnknownRisk { owner, risk_id } => {
                write!(f, "{owner} references unknown risk `{risk_id}`")
            }
            ReferenceIssue::DuplicateQuestion { question_id } => {
                write!(f, "question id `{question_id}` is declared more than once")
            }
            ReferenceIssue::DuplicateRisk { risk_id } => {
                write!(f, "risk id `{risk_id}` is declared more than once")
            }
            ReferenceIssue::UnknownAnswer { question_id } => {
                write!(f, "answer given for unknown question `{question_id}`")
            }
        }
    }
}

/// Every broken reference in a form, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} invalid reference(s): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ReferenceIssue>,
}

fn join_issues(issues: &[ReferenceIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn issues(&self) -> &[ReferenceIssue] {
        &self.issues
    }

    fn check(issues: Vec<ReferenceIssue>) -> Result<(), Self> {
        if issues.is_empty() {
            return Ok(());
        }
        warn!(count = issues.len(), "form validation failed");
        Err(Self { issues })
    }
}

/// Check that every id referenced by conditions, rules and controls exists.
///
/// Collects all offenders instead of stopping at the first one.
pub fn validate_references(
    sections: &[Section],
    risks: &[Risk],
    controls: &[Control],
) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let mut question_ids = HashSet::new();
    for question in all_questions(sections) {
        if !question_ids.insert(question.id.as_str()) {
            issues.push(ReferenceIssue::DuplicateQuestion {
                question_id: question.id.clone(),
            });
        }
    }

    let mut risk_ids = HashSet::new();
    for risk in risks {
        if !risk_ids.insert(risk.id.as_str()) {
            issues.push(ReferenceIssue::DuplicateRisk {
                risk_id: risk.id.clone(),
            });
        }
    }

    for subsection in sections.iter().flat_map(|section| &section.subsections) {
        if let Some(condition) = &subsection.visible_when {
            for id in condition.referenced_question_ids() {
                check_question(&mut issues, &question_ids, id, || {
                    Owner::SubSection(subsection.title.clone())
                });
            }
        }
        for question in &subsection.questions {
            if let Some(condition) = &question.visible_when {
                for id in condition.referenced_question_ids() {
                    check_question(&mut issues, &question_ids, id, || {
                        Owner::Question(question.id.clone())
                    });
                }
            }
        }
    }

    for risk in risks {
        for id in risk.referenced_question_ids() {
            check_question(&mut issues, &question_ids, id, || Owner::Risk(risk.id.clone()));
        }
    }

    for control in controls {
        check_question(&mut issues, &question_ids, &control.question_id, || {
            Owner::Control(control.id.clone())
        });
    }

    for control in controls {
        for effect in &control.effects {
            if !risk_ids.contains(effect.risk_id()) {
                issues.push(ReferenceIssue::UnknownRisk {
                    owner: Owner::Control(control.id.clone()),
                    risk_id: effect.risk_id().to_string(),
                });
            }
        }
    }

    ValidationError::check(issues)
}

fn check_question(
    issues: &mut Vec<ReferenceIssue>,
    known: &HashSet<&str>,
    question_id: &str,
    owner: impl FnOnce() -> Owner,
) {
    if !known.contains(question_id) {
        issues.push(ReferenceIssue::UnknownQuestion {
            owner: owner(),
            question_id: question_id.to_string(),
        });
    }
}

/// Check that an imported answer map only names questions of this form.
pub fn validate_answer_keys(answers: &Answers, sections: &[Section]) -> Result<(), ValidationError> {
    let known: HashSet<&str> = all_questions(sections)
        .into_iter()
        .map(|question| question.id.as_str())
        .collect();

    let issues = answers
        .question_ids()
        .filter(|id| !known.contains(id))
        .map(|id| ReferenceIssue::UnknownAnswer {
            question_id: id.to_string(),
        })
        .collect();

    ValidationError::check(issues)
}

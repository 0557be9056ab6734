//! Assessment form model, compiler and evaluator.
//!
//! Definitions are loaded from YAML ([`loader`]), checked for dangling references
//! ([`validation`]), compiled into client-side expressions ([`compile`]) and evaluated
//! natively against submitted answers ([`service`]). Both paths share one set of
//! semantics: a condition or rule compiled to JavaScript produces the same result as
//! its native evaluation on the same answers.

pub mod answers;
pub mod compile;
pub mod condition;
pub mod error;
pub mod export;
pub(crate) mod js;
pub mod loader;
pub mod questions;
pub mod risk;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use answers::{AnswerValue, Answers, YES};
pub use compile::{compile_form, CompiledForm, ScaleTables};
pub use condition::Condition;
pub use error::{ExportError, FormError, LoadError, ModelError};
pub use js::{COMPONENT_ANSWERS, TEMPLATE_ANSWERS};
pub use loader::FormDefinition;
pub use questions::{Question, QuestionKind, Section, SubSection};
pub use risk::{
    Consequence, Control, ControlEffect, Likelihood, Outcome, Risk, RiskAssessment,
    RiskEvaluator, RiskLevel, RiskRule,
};
pub use router::assessment_router;
pub use service::{AssessmentReport, AssessmentService};
pub use validation::{validate_answer_keys, validate_references, ReferenceIssue, ValidationError};

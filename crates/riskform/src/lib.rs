//! Compiler and evaluator for declarative risk assessment forms.
//!
//! A form is a set of questions grouped into sections, a set of risks scored from the
//! answers by declarative rules, and controls that mitigate those risks. The
//! [`assessment`] module compiles visibility conditions, scoring rules and control
//! predicates into client-side expressions and evaluates the same definitions natively.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;

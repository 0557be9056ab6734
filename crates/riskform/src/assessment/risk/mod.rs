mod control;
mod evaluation;
mod rule;
pub mod scale;

pub use control::{Control, ControlEffect};
pub use evaluation::{RiskAssessment, RiskEvaluator};
pub use rule::{Outcome, RiskRule, ScoredOutcome};
pub use scale::{Consequence, Likelihood, RiskLevel};

use super::answers::Answers;
use serde::Deserialize;

/// A named risk whose level is derived from rules applied to form answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Risk {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<RiskRule>,
    #[serde(default = "default_likelihood")]
    pub default_likelihood: Option<Likelihood>,
    #[serde(default = "default_consequence")]
    pub default_consequence: Option<Consequence>,
}

fn default_likelihood() -> Option<Likelihood> {
    Some(Likelihood::Rare)
}

fn default_consequence() -> Option<Consequence> {
    Some(Consequence::Minor)
}

impl Risk {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rules: Vec::new(),
            default_likelihood: default_likelihood(),
            default_consequence: default_consequence(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rule(mut self, rule: RiskRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_defaults(
        mut self,
        likelihood: Option<Likelihood>,
        consequence: Option<Consequence>,
    ) -> Self {
        self.default_likelihood = likelihood;
        self.default_consequence = consequence;
        self
    }

    pub fn default_outcome(&self) -> Outcome {
        Outcome::new(self.default_likelihood, self.default_consequence)
    }

    /// Question ids read by any rule, deduplicated, in first-seen order.
    pub fn referenced_question_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.rules.iter().flat_map(RiskRule::referenced_question_ids) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Index and outcome of the first rule that fires, in declaration order.
    pub fn first_firing_rule(&self, answers: &Answers) -> Option<(usize, Outcome)> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.evaluate(answers).map(|outcome| (index, outcome)))
    }
}

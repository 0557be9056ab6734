use super::scale::{resolve_partial, Consequence, Likelihood, RiskLevel};
use crate::assessment::answers::{deserialize_literals, Answers, YES};
use crate::assessment::error::ModelError;
use crate::assessment::js;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Likelihood/consequence pair produced by a rule. Either dimension may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    #[serde(default)]
    pub likelihood: Option<Likelihood>,
    #[serde(default)]
    pub consequence: Option<Consequence>,
}

impl Outcome {
    pub fn new(likelihood: Option<Likelihood>, consequence: Option<Consequence>) -> Self {
        Self {
            likelihood,
            consequence,
        }
    }

    pub fn pair(likelihood: Likelihood, consequence: Consequence) -> Self {
        Self::new(Some(likelihood), Some(consequence))
    }

    /// Fill unknown dimensions from `fallback`.
    pub fn or(self, fallback: Outcome) -> Outcome {
        Outcome {
            likelihood: self.likelihood.or(fallback.likelihood),
            consequence: self.consequence.or(fallback.consequence),
        }
    }

    pub fn level(&self) -> RiskLevel {
        resolve_partial(self.likelihood, self.consequence)
    }

    /// `{likelihood: "likely", consequence: null}`
    pub fn to_js(&self) -> String {
        let likelihood = self
            .likelihood
            .map_or_else(|| "null".to_string(), |value| js::string(value.as_str()));
        let consequence = self
            .consequence
            .map_or_else(|| "null".to_string(), |value| js::string(value.as_str()));
        format!("{{likelihood: {likelihood}, consequence: {consequence}}}")
    }
}

/// An [`Outcome`] known to carry at least one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoredOutcome(Outcome);

impl ScoredOutcome {
    pub fn new(likelihood: Option<Likelihood>, consequence: Option<Consequence>) -> Option<Self> {
        if likelihood.is_none() && consequence.is_none() {
            None
        } else {
            Some(Self(Outcome::new(likelihood, consequence)))
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.0
    }
}

/// Scoring rule mapping answers to a risk outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RuleDefinition")]
pub enum RiskRule {
    /// Fires when any listed yes/no question is answered "yes".
    AnyYes {
        question_ids: Vec<String>,
        outcome: ScoredOutcome,
    },
    /// Fires when at least `threshold` of the listed yes/no questions are "yes".
    CountYes {
        question_ids: Vec<String>,
        threshold: usize,
        outcome: ScoredOutcome,
    },
    /// Looks the single-choice answer up in `mapping`; each entry is the outcome.
    ChoiceMap {
        question_id: String,
        mapping: BTreeMap<String, Outcome>,
    },
    /// Fires when the multi-select answer shares any value with `values`.
    ContainsAny {
        question_id: String,
        values: Vec<String>,
        outcome: ScoredOutcome,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum RuleDefinition {
    AnyYes {
        question_ids: Vec<String>,
        #[serde(default)]
        likelihood: Option<Likelihood>,
        #[serde(default)]
        consequence: Option<Consequence>,
    },
    CountYes {
        question_ids: Vec<String>,
        threshold: usize,
        #[serde(default)]
        likelihood: Option<Likelihood>,
        #[serde(default)]
        consequence: Option<Consequence>,
    },
    ChoiceMap {
        question_id: String,
        mapping: BTreeMap<String, Outcome>,
    },
    ContainsAny {
        question_id: String,
        #[serde(deserialize_with = "deserialize_literals")]
        values: Vec<String>,
        #[serde(default)]
        likelihood: Option<Likelihood>,
        #[serde(default)]
        consequence: Option<Consequence>,
    },
}

impl TryFrom<RuleDefinition> for RiskRule {
    type Error = ModelError;

    fn try_from(definition: RuleDefinition) -> Result<Self, Self::Error> {
        match definition {
            RuleDefinition::AnyYes {
                question_ids,
                likelihood,
                consequence,
            } => RiskRule::any_yes(question_ids, likelihood, consequence),
            RuleDefinition::CountYes {
                question_ids,
                threshold,
                likelihood,
                consequence,
            } => RiskRule::count_yes(question_ids, threshold, likelihood, consequence),
            RuleDefinition::ChoiceMap {
                question_id,
                mapping,
            } => Ok(RiskRule::choice_map(question_id, mapping)),
            RuleDefinition::ContainsAny {
                question_id,
                values,
                likelihood,
                consequence,
            } => RiskRule::contains_any(question_id, values, likelihood, consequence),
        }
    }
}

fn scored(
    rule: &'static str,
    likelihood: Option<Likelihood>,
    consequence: Option<Consequence>,
) -> Result<ScoredOutcome, ModelError> {
    ScoredOutcome::new(likelihood, consequence).ok_or(ModelError::MissingScore { rule })
}

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl RiskRule {
    pub fn any_yes<I, S>(
        question_ids: I,
        likelihood: Option<Likelihood>,
        consequence: Option<Consequence>,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(RiskRule::AnyYes {
            question_ids: to_strings(question_ids),
            outcome: scored("any_yes", likelihood, consequence)?,
        })
    }

    pub fn count_yes<I, S>(
        question_ids: I,
        threshold: usize,
        likelihood: Option<Likelihood>,
        consequence: Option<Consequence>,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(RiskRule::CountYes {
            question_ids: to_strings(question_ids),
            threshold,
            outcome: scored("count_yes", likelihood, consequence)?,
        })
    }

    pub fn choice_map<K: Into<String>>(
        question_id: impl Into<String>,
        mapping: impl IntoIterator<Item = (K, Outcome)>,
    ) -> Self {
        RiskRule::ChoiceMap {
            question_id: question_id.into(),
            mapping: mapping
                .into_iter()
                .map(|(answer, outcome)| (answer.into(), outcome))
                .collect(),
        }
    }

    pub fn contains_any<I, S>(
        question_id: impl Into<String>,
        values: I,
        likelihood: Option<Likelihood>,
        consequence: Option<Consequence>,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(RiskRule::ContainsAny {
            question_id: question_id.into(),
            values: to_strings(values),
            outcome: scored("contains_any", likelihood, consequence)?,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RiskRule::AnyYes { .. } => "any_yes",
            RiskRule::CountYes { .. } => "count_yes",
            RiskRule::ChoiceMap { .. } => "choice_map",
            RiskRule::ContainsAny { .. } => "contains_any",
        }
    }

    pub fn referenced_question_ids(&self) -> Vec<&str> {
        match self {
            RiskRule::AnyYes { question_ids, .. } | RiskRule::CountYes { question_ids, .. } => {
                question_ids.iter().map(String::as_str).collect()
            }
            RiskRule::ChoiceMap { question_id, .. } | RiskRule::ContainsAny { question_id, .. } => {
                vec![question_id.as_str()]
            }
        }
    }

    /// The outcome if the rule fires, `None` otherwise.
    pub fn evaluate(&self, answers: &Answers) -> Option<Outcome> {
        match self {
            RiskRule::AnyYes {
                question_ids,
                outcome,
            } => question_ids
                .iter()
                .any(|id| answers.is_yes(id))
                .then(|| outcome.outcome()),
            RiskRule::CountYes {
                question_ids,
                threshold,
                outcome,
            } => {
                let yes_count = question_ids.iter().filter(|id| answers.is_yes(id)).count();
                (yes_count >= *threshold).then(|| outcome.outcome())
            }
            RiskRule::ChoiceMap {
                question_id,
                mapping,
            } => answers
                .scalar(question_id)
                .and_then(|answer| mapping.get(answer))
                .copied(),
            RiskRule::ContainsAny {
                question_id,
                values,
                outcome,
            } => {
                let selected = answers.list(question_id);
                values
                    .iter()
                    .any(|value| selected.contains(value))
                    .then(|| outcome.outcome())
            }
        }
    }

    /// Compile to a parenthesized JavaScript expression yielding `{likelihood, consequence}`
    /// or `null`. Choice tables have no prototype, so only declared answers match.
    pub fn to_js(&self, scope: &str) -> String {
        match self {
            RiskRule::AnyYes {
                question_ids,
                outcome,
            } => format!(
                "({}.some(id => {scope}[id] === {}) ? {} : null)",
                js::string_array(question_ids),
                js::string(YES),
                outcome.outcome().to_js()
            ),
            RiskRule::CountYes {
                question_ids,
                threshold,
                outcome,
            } => format!(
                "({}.filter(id => {scope}[id] === {}).length >= {threshold} ? {} : null)",
                js::string_array(question_ids),
                js::string(YES),
                outcome.outcome().to_js()
            ),
            RiskRule::ChoiceMap {
                question_id,
                mapping,
            } => {
                let table = serde_json::to_string(mapping).unwrap_or_else(|_| "{}".to_string());
                format!(
                    "(Object.assign(Object.create(null), {table})[{}] || null)",
                    js::answer(scope, question_id)
                )
            }
            RiskRule::ContainsAny {
                question_id,
                values,
                outcome,
            } => format!(
                "({}.some(v => ({} || []).includes(v)) ? {} : null)",
                js::string_array(values),
                js::answer(scope, question_id),
                outcome.outcome().to_js()
            ),
        }
    }
}

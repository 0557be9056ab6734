use super::rule::Outcome;
use crate::assessment::answers::{deserialize_literal, Answers};
use crate::assessment::error::ModelError;
use crate::assessment::js;
use serde::{Deserialize, Serialize};

/// Reduction a present control applies to one risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EffectDefinition")]
pub struct ControlEffect {
    risk_id: String,
    reduces_likelihood: bool,
    reduces_consequence: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EffectDefinition {
    risk_id: String,
    #[serde(default)]
    reduces_likelihood: bool,
    #[serde(default)]
    reduces_consequence: bool,
}

impl TryFrom<EffectDefinition> for ControlEffect {
    type Error = ModelError;

    fn try_from(definition: EffectDefinition) -> Result<Self, Self::Error> {
        ControlEffect::new(
            definition.risk_id,
            definition.reduces_likelihood,
            definition.reduces_consequence,
        )
    }
}

impl ControlEffect {
    pub fn new(
        risk_id: impl Into<String>,
        reduces_likelihood: bool,
        reduces_consequence: bool,
    ) -> Result<Self, ModelError> {
        let risk_id = risk_id.into();
        if !reduces_likelihood && !reduces_consequence {
            return Err(ModelError::EmptyEffect { risk_id });
        }

        Ok(Self {
            risk_id,
            reduces_likelihood,
            reduces_consequence,
        })
    }

    pub fn risk_id(&self) -> &str {
        &self.risk_id
    }

    pub fn reduces_likelihood(&self) -> bool {
        self.reduces_likelihood
    }

    pub fn reduces_consequence(&self) -> bool {
        self.reduces_consequence
    }

    /// Step each reduced dimension one level down; the bottom of a scale is a floor.
    pub fn apply(&self, outcome: Outcome) -> Outcome {
        Outcome {
            likelihood: if self.reduces_likelihood {
                outcome.likelihood.map(|value| value.step_down())
            } else {
                outcome.likelihood
            },
            consequence: if self.reduces_consequence {
                outcome.consequence.map(|value| value.step_down())
            } else {
                outcome.consequence
            },
        }
    }
}

/// Mitigating factor, present when the gating question holds `present_value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Control {
    pub id: String,
    pub name: String,
    pub question_id: String,
    #[serde(deserialize_with = "deserialize_literal")]
    pub present_value: String,
    pub effects: Vec<ControlEffect>,
}

impl Control {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        question_id: impl Into<String>,
        present_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            question_id: question_id.into(),
            present_value: present_value.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: ControlEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Scalar answers match by equality, multi-select answers by membership.
    pub fn is_present(&self, answers: &Answers) -> bool {
        answers
            .get(&self.question_id)
            .is_some_and(|answer| answer.matches(&self.present_value))
    }

    pub fn effects_on<'a>(&'a self, risk_id: &'a str) -> impl Iterator<Item = &'a ControlEffect> {
        self.effects
            .iter()
            .filter(move |effect| effect.risk_id == risk_id)
    }

    /// Compile the presence predicate to a JavaScript boolean expression.
    pub fn presence_js(&self, scope: &str) -> String {
        let answer = js::answer(scope, &self.question_id);
        let value = js::string(&self.present_value);
        format!("(Array.isArray({answer}) ? {answer}.includes({value}) : {answer} === {value})")
    }
}

use super::control::Control;
use super::rule::Outcome;
use super::scale::RiskLevel;
use super::Risk;
use crate::assessment::answers::Answers;
use serde::Serialize;
use tracing::debug;

/// Resolved state of one risk for a given set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_id: String,
    pub name: String,
    /// Index of the rule that fired; `None` when the default outcome applies.
    pub fired_rule: Option<usize>,
    pub inherent: Outcome,
    pub inherent_level: RiskLevel,
    pub residual: Outcome,
    pub level: RiskLevel,
    pub applied_controls: Vec<String>,
}

impl RiskAssessment {
    pub fn is_mitigated(&self) -> bool {
        self.residual != self.inherent
    }
}

/// Stateless evaluator resolving every risk's level from live answers.
#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator {
    risks: Vec<Risk>,
    controls: Vec<Control>,
}

impl RiskEvaluator {
    /// Definitions are expected to have passed reference validation; effects naming a
    /// risk that does not exist simply never apply.
    pub fn new(risks: Vec<Risk>, controls: Vec<Control>) -> Self {
        Self { risks, controls }
    }

    pub fn risks(&self) -> &[Risk] {
        &self.risks
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn evaluate_all(&self, answers: &Answers) -> Vec<RiskAssessment> {
        self.risks
            .iter()
            .map(|risk| self.evaluate(risk, answers))
            .collect()
    }

    pub fn evaluate_risk(&self, risk_id: &str, answers: &Answers) -> Option<RiskAssessment> {
        self.risks
            .iter()
            .find(|risk| risk.id == risk_id)
            .map(|risk| self.evaluate(risk, answers))
    }

    /// First firing rule (or the default), defaults filling missing dimensions, then
    /// every present control's effects on this risk in declaration order.
    pub fn evaluate(&self, risk: &Risk, answers: &Answers) -> RiskAssessment {
        let fired = risk.first_firing_rule(answers);
        let fired_rule = fired.map(|(index, _)| index);
        let inherent = fired
            .map(|(_, outcome)| outcome)
            .unwrap_or_default()
            .or(risk.default_outcome());

        let mut residual = inherent;
        let mut applied_controls = Vec::new();
        for control in self.controls.iter().filter(|c| c.is_present(answers)) {
            let mut applied = false;
            for effect in control.effects_on(&risk.id) {
                residual = effect.apply(residual);
                applied = true;
            }
            if applied {
                applied_controls.push(control.id.clone());
            }
        }

        let assessment = RiskAssessment {
            risk_id: risk.id.clone(),
            name: risk.name.clone(),
            fired_rule,
            inherent,
            inherent_level: inherent.level(),
            residual,
            level: residual.level(),
            applied_controls,
        };

        debug!(
            risk = %assessment.risk_id,
            fired_rule = ?assessment.fired_rule,
            inherent = %assessment.inherent_level,
            level = %assessment.level,
            controls = assessment.applied_controls.len(),
            "risk evaluated"
        );

        assessment
    }
}

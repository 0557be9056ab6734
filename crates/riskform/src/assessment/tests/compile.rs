use super::common::*;
use crate::assessment::compile::{compile_control, compile_form, ScaleTables};
use crate::assessment::js::COMPONENT_ANSWERS;
use crate::assessment::loader::FormDefinition;
use crate::assessment::risk::{Consequence, Control, ControlEffect, Likelihood, RiskLevel};

#[test]
fn compiled_questions_carry_visibility_expressions() {
    let compiled = compile_form(&form()).expect("fixture compiles");

    assert_eq!(compiled.sections.len(), 2);
    assert_eq!(compiled.question_count(), 9);

    let habits = &compiled.sections[1].subsections[0];
    let notes = habits
        .questions
        .iter()
        .find(|question| question.id == "notes")
        .expect("notes compiled");
    assert_eq!(notes.kind, "free_text");
    assert_eq!(notes.visible_when_js.as_deref(), Some(r#"answers["q1"] === "yes""#));

    let hobbies = &habits.questions[0];
    assert_eq!(hobbies.kind, "multiple_select");
    assert_eq!(hobbies.options, ["reading", "gaming", "hiking", "team_sports"]);
    assert!(hobbies.visible_when_js.is_none());

    let winter = &compiled.sections[1].subsections[1];
    assert_eq!(
        winter.visible_when_js.as_deref(),
        Some(r#"answers["season"] === "Winter""#)
    );
}

#[test]
fn compiled_risks_list_questions_and_mitigating_controls() {
    let compiled = compile_form(&form()).expect("fixture compiles");
    let risk = compiled.risk("screening_risk").expect("risk compiled");

    assert_eq!(
        risk.rules_js,
        [r#"(["q1"].some(id => this.answers[id] === "yes") ? {likelihood: "likely", consequence: null} : null)"#]
    );
    assert_eq!(risk.default_likelihood, Some(Likelihood::Rare));
    assert_eq!(risk.default_consequence, Some(Consequence::Minor));
    assert_eq!(risk.questions.len(), 1);
    assert_eq!(risk.questions[0].id, "q1");
    assert_eq!(risk.questions[0].text, "First screening question");

    let control_ids: Vec<&str> = risk.controls.iter().map(|view| view.id.as_str()).collect();
    assert_eq!(control_ids, ["outdoors", "exercise"]);
    assert!(risk.controls.iter().all(|view| view.reduces_likelihood));

    let seasonal = compiled.risk("seasonal_risk").expect("risk compiled");
    assert_eq!(seasonal.controls.len(), 1);
    assert!(seasonal.controls[0].reduces_consequence);
    assert!(!seasonal.controls[0].reduces_likelihood);

    let hobby = compiled.risk("hobby_risk").expect("risk compiled");
    assert!(hobby.controls.is_empty());
}

#[test]
fn risk_questions_are_deduplicated() {
    let mut form = form();
    form.risks[0] = form.risks[0].clone().with_rule(
        crate::assessment::risk::RiskRule::count_yes(
            ["q1", "q2", "q1"],
            2,
            Some(Likelihood::Possible),
            None,
        )
        .expect("rule"),
    );

    let compiled = compile_form(&form).expect("compiles");
    let ids: Vec<&str> = compiled.risks[0]
        .questions
        .iter()
        .map(|question| question.id.as_str())
        .collect();
    assert_eq!(ids, ["q1", "q2"]);
    assert_eq!(compiled.risks[0].rules_js.len(), 2);
}

#[test]
fn control_presence_handles_scalar_and_array_answers() {
    let control = Control::new("team", "Team sports", "hobbies", "team_sports")
        .with_effect(ControlEffect::new("hobby_risk", true, false).expect("effect"));
    let compiled = compile_control(&control);
    assert_eq!(compiled.question_id, "hobbies");
    assert_eq!(
        compiled.presence_js,
        r#"(Array.isArray(this.answers["hobbies"]) ? this.answers["hobbies"].includes("team_sports") : this.answers["hobbies"] === "team_sports")"#
    );
    assert_eq!(control.presence_js(COMPONENT_ANSWERS), compiled.presence_js);
}

#[test]
fn scale_tables_expose_the_full_matrix() {
    let scales = ScaleTables::standard();
    assert_eq!(scales.likelihoods.len(), 5);
    assert_eq!(scales.consequences.len(), 3);
    assert_eq!(scales.matrix.len(), 5);
    assert!(scales.matrix.values().all(|row| row.len() == 3));
    assert_eq!(
        scales.matrix[&Likelihood::Likely][&Consequence::Minor],
        RiskLevel::Medium
    );

    let json = serde_json::to_value(&scales).expect("serializes");
    assert_eq!(json["matrix"]["almost_certain"]["minor"], "high");
    assert_eq!(json["levels"][0], "not_applicable");
}

#[test]
fn invalid_forms_do_not_compile() {
    let mut form = form();
    form.controls.push(
        Control::new("orphan", "Orphan", "q1", "yes")
            .with_effect(ControlEffect::new("no_such_risk", true, false).expect("effect")),
    );
    assert!(compile_form(&form).is_err());
}

#[test]
fn empty_form_compiles_to_empty_bundle() {
    let compiled = compile_form(&FormDefinition::default()).expect("empty form compiles");
    assert!(compiled.sections.is_empty());
    assert!(compiled.risks.is_empty());
    assert_eq!(compiled.question_count(), 0);
}

#[test]
fn bundle_serializes_question_type_tag() {
    let compiled = compile_form(&form()).expect("fixture compiles");
    let json = serde_json::to_value(&compiled).expect("serializes");
    let first = &json["sections"][0]["subsections"][0]["questions"][0];
    assert_eq!(first["id"], "q1");
    assert_eq!(first["type"], "yes_no");
    assert!(first.get("options").is_none());
    assert!(first.get("visible_when_js").is_none());
}

use super::common::*;
use crate::assessment::answers::Answers;
use crate::assessment::error::ModelError;
use crate::assessment::js::COMPONENT_ANSWERS;
use crate::assessment::risk::{Consequence, Likelihood, Outcome, RiskRule};

fn likely() -> Outcome {
    Outcome::new(Some(Likelihood::Likely), None)
}

#[test]
fn any_yes_fires_when_one_question_is_yes() {
    let rule = RiskRule::any_yes(["q1", "q2"], Some(Likelihood::Likely), None).expect("rule");
    assert_eq!(rule.evaluate(&answers(&[("q2", "yes")])), Some(likely()));
    assert_eq!(rule.evaluate(&answers(&[("q1", "no"), ("q2", "no")])), None);
    assert_eq!(rule.evaluate(&Answers::new()), None);
}

#[test]
fn count_yes_compares_against_threshold() {
    let rule = RiskRule::count_yes(["q1", "q2", "q3"], 2, Some(Likelihood::Likely), None)
        .expect("rule");
    assert_eq!(rule.evaluate(&answers(&[("q1", "yes")])), None);
    assert_eq!(
        rule.evaluate(&answers(&[("q1", "yes"), ("q3", "yes")])),
        Some(likely())
    );
}

#[test]
fn count_yes_with_zero_threshold_always_fires() {
    let rule = RiskRule::count_yes(["q1"], 0, Some(Likelihood::Rare), None).expect("rule");
    assert!(rule.evaluate(&Answers::new()).is_some());
    assert!(rule.evaluate(&answers(&[("q1", "no")])).is_some());
}

#[test]
fn count_yes_threshold_above_list_length_never_fires() {
    let rule = RiskRule::count_yes(["q1", "q2"], 3, Some(Likelihood::Rare), None).expect("rule");
    assert_eq!(rule.evaluate(&answers(&[("q1", "yes"), ("q2", "yes")])), None);
}

#[test]
fn choice_map_returns_the_mapped_outcome() {
    let rule = RiskRule::choice_map(
        "season",
        [
            ("Winter", Outcome::pair(Likelihood::Likely, Consequence::Major)),
            ("Autumn", Outcome::new(Some(Likelihood::Possible), None)),
        ],
    );
    assert_eq!(
        rule.evaluate(&answers(&[("season", "Winter")])),
        Some(Outcome::pair(Likelihood::Likely, Consequence::Major))
    );
    assert_eq!(
        rule.evaluate(&answers(&[("season", "Autumn")])),
        Some(Outcome::new(Some(Likelihood::Possible), None))
    );
    assert_eq!(rule.evaluate(&answers(&[("season", "Summer")])), None);
    assert_eq!(rule.evaluate(&Answers::new()), None);
}

#[test]
fn contains_any_fires_on_any_intersection() {
    let rule = RiskRule::contains_any(
        "hobbies",
        ["reading", "gaming"],
        None,
        Some(Consequence::Medium),
    )
    .expect("rule");
    let outcome = Some(Outcome::new(None, Some(Consequence::Medium)));

    assert_eq!(
        rule.evaluate(&Answers::new().with("hobbies", vec!["hiking", "gaming"])),
        outcome
    );
    assert_eq!(rule.evaluate(&Answers::new().with("hobbies", vec!["hiking"])), None);
    assert_eq!(rule.evaluate(&Answers::new().with("hobbies", Vec::<String>::new())), None);
    assert_eq!(rule.evaluate(&Answers::new()), None);
}

#[test]
fn contains_any_ignores_scalar_answers() {
    let rule = RiskRule::contains_any("hobbies", ["reading"], Some(Likelihood::Rare), None)
        .expect("rule");
    assert_eq!(rule.evaluate(&answers(&[("hobbies", "reading")])), None);
}

#[test]
fn scored_rules_require_a_dimension() {
    let err = RiskRule::any_yes(["q1"], None, None).expect_err("unscored");
    assert_eq!(err, ModelError::MissingScore { rule: "any_yes" });
    assert!(RiskRule::count_yes(["q1"], 1, None, None).is_err());
    assert!(RiskRule::contains_any("q1", ["x"], None, None).is_err());
}

#[test]
fn any_yes_compiles_to_some_over_ids() {
    let rule = RiskRule::any_yes(["q1", "q2"], Some(Likelihood::Likely), None).expect("rule");
    assert_eq!(
        rule.to_js(COMPONENT_ANSWERS),
        r#"(["q1","q2"].some(id => this.answers[id] === "yes") ? {likelihood: "likely", consequence: null} : null)"#
    );
}

#[test]
fn count_yes_compiles_to_filtered_length() {
    let rule = RiskRule::count_yes(
        ["a", "b"],
        2,
        Some(Likelihood::AlmostCertain),
        Some(Consequence::Medium),
    )
    .expect("rule");
    assert_eq!(
        rule.to_js(COMPONENT_ANSWERS),
        r#"(["a","b"].filter(id => this.answers[id] === "yes").length >= 2 ? {likelihood: "almost_certain", consequence: "medium"} : null)"#
    );
}

#[test]
fn choice_map_compiles_to_table_lookup() {
    let rule = RiskRule::choice_map(
        "season",
        [("Winter", Outcome::pair(Likelihood::Likely, Consequence::Major))],
    );
    assert_eq!(
        rule.to_js(COMPONENT_ANSWERS),
        r#"(Object.assign(Object.create(null), {"Winter":{"likelihood":"likely","consequence":"major"}})[this.answers["season"]] || null)"#
    );
}

#[test]
fn contains_any_compiles_with_empty_array_fallback() {
    let rule = RiskRule::contains_any("hobbies", ["gaming"], None, Some(Consequence::Minor))
        .expect("rule");
    assert_eq!(
        rule.to_js(COMPONENT_ANSWERS),
        r#"(["gaming"].some(v => (this.answers["hobbies"] || []).includes(v)) ? {likelihood: null, consequence: "minor"} : null)"#
    );
}

#[test]
fn yaml_rules_dispatch_on_type() {
    let yaml = r#"
- type: any_yes
  question_ids: [q1]
  likelihood: likely
- type: count_yes
  question_ids: [q1, q2, q3]
  threshold: 2
  consequence: major
- type: choice_map
  question_id: season
  mapping:
    Winter: { likelihood: likely, consequence: major }
- type: contains_any
  question_id: hobbies
  values: [reading, true]
  likelihood: possible
"#;
    let rules: Vec<RiskRule> = serde_yaml::from_str(yaml).expect("rules parse");
    let kinds: Vec<&str> = rules.iter().map(RiskRule::kind).collect();
    assert_eq!(kinds, ["any_yes", "count_yes", "choice_map", "contains_any"]);

    match &rules[3] {
        RiskRule::ContainsAny { values, .. } => assert_eq!(values, &["reading", "yes"]),
        other => panic!("unexpected rule: {other:?}"),
    }
}

#[test]
fn yaml_rule_without_scores_is_rejected() {
    let yaml = "type: any_yes\nquestion_ids: [q1]\n";
    let err = serde_yaml::from_str::<RiskRule>(yaml).expect_err("unscored rule");
    assert!(err.to_string().contains("requires at least one of likelihood or consequence"));
}

#[test]
fn yaml_rule_with_unknown_type_is_rejected() {
    let yaml = "type: sum_scores\nquestion_ids: [q1]\n";
    assert!(serde_yaml::from_str::<RiskRule>(yaml).is_err());
}

#[test]
fn yaml_choice_map_rejects_unknown_outcome_fields() {
    let yaml = r#"
type: choice_map
question_id: season
mapping:
  Winter: { likelihood: likely, severity: major }
"#;
    assert!(serde_yaml::from_str::<RiskRule>(yaml).is_err());
}

#[test]
fn choice_map_ignores_object_property_names() {
    let rule = RiskRule::choice_map(
        "season",
        [("Winter", Outcome::pair(Likelihood::Likely, Consequence::Major))],
    );
    for answer in ["constructor", "toString", "__proto__"] {
        let answers = Answers::new().with("season", answer);
        assert_eq!(rule.evaluate(&answers), None, "{answer}");
    }
    assert!(rule
        .to_js(COMPONENT_ANSWERS)
        .starts_with("(Object.assign(Object.create(null), "));
}

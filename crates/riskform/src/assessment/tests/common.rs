use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::assessment::answers::Answers;
use crate::assessment::condition::Condition;
use crate::assessment::loader::FormDefinition;
use crate::assessment::questions::{Question, QuestionKind, Section, SubSection};
use crate::assessment::risk::{
    Consequence, Control, ControlEffect, Likelihood, Outcome, Risk, RiskRule,
};
use crate::assessment::service::AssessmentService;

pub(super) fn choice(id: &str, options: &[&str]) -> Question {
    Question::new(
        id,
        format!("Choose {id}"),
        QuestionKind::MultipleChoice {
            options: options.iter().map(|option| option.to_string()).collect(),
        },
    )
    .expect("choice question has options")
}

pub(super) fn multi_select(id: &str, options: &[&str]) -> Question {
    Question::new(
        id,
        format!("Select {id}"),
        QuestionKind::MultipleSelect {
            options: options.iter().map(|option| option.to_string()).collect(),
        },
    )
    .expect("multi-select question has options")
}

/// Two sections: yes/no screening questions and a conditional detail block.
pub(super) fn sections() -> Vec<Section> {
    vec![
        Section::new(
            "screening",
            "Screening",
            vec![SubSection::new(
                "Basics",
                vec![
                    Question::yes_no("q1", "First screening question"),
                    Question::yes_no("q2", "Second screening question"),
                    Question::yes_no("q3", "Third screening question"),
                    choice("season", &["Spring", "Summer", "Autumn", "Winter"]),
                ],
            )],
        ),
        Section::new(
            "details",
            "Details",
            vec![
                SubSection::new(
                    "Habits",
                    vec![
                        multi_select("hobbies", &["reading", "gaming", "hiking", "team_sports"]),
                        Question::yes_no("outdoors", "Time outdoors"),
                        Question::yes_no("exercise", "Weekly exercise"),
                        Question::free_text("notes", "Anything else?")
                            .with_visible_when(Condition::equals("q1", "yes")),
                    ],
                ),
                SubSection::new(
                    "Winter",
                    vec![Question::yes_no("lamp", "Light therapy lamp")],
                )
                .with_visible_when(Condition::equals("season", "Winter")),
            ],
        ),
    ]
}

pub(super) fn screening_risk() -> Risk {
    Risk::new("screening_risk", "Screening risk").with_rule(
        RiskRule::any_yes(["q1"], Some(Likelihood::Likely), None).expect("scored rule"),
    )
}

pub(super) fn seasonal_risk() -> Risk {
    Risk::new("seasonal_risk", "Seasonal risk").with_rule(RiskRule::choice_map(
        "season",
        [(
            "Winter",
            Outcome::pair(Likelihood::Likely, Consequence::Major),
        )],
    ))
}

pub(super) fn hobby_risk() -> Risk {
    Risk::new("hobby_risk", "Hobby risk").with_rule(
        RiskRule::contains_any(
            "hobbies",
            ["reading", "gaming"],
            Some(Likelihood::Possible),
            Some(Consequence::Medium),
        )
        .expect("scored rule"),
    )
}

pub(super) fn outdoors_control() -> Control {
    Control::new("outdoors", "Time outdoors", "outdoors", "yes")
        .with_effect(ControlEffect::new("screening_risk", true, false).expect("effect"))
}

pub(super) fn exercise_control() -> Control {
    Control::new("exercise", "Weekly exercise", "exercise", "yes")
        .with_effect(ControlEffect::new("screening_risk", true, false).expect("effect"))
        .with_effect(ControlEffect::new("seasonal_risk", false, true).expect("effect"))
}

pub(super) fn form() -> FormDefinition {
    FormDefinition::new(
        sections(),
        vec![screening_risk(), seasonal_risk(), hobby_risk()],
        vec![outdoors_control(), exercise_control()],
    )
}

pub(super) fn service() -> Arc<AssessmentService> {
    Arc::new(AssessmentService::new(form()).expect("fixture form is valid"))
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs.iter().map(|(id, value)| (*id, *value)).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

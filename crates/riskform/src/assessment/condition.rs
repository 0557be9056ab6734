use super::answers::{deserialize_literal, Answers};
use super::js;
use serde::Deserialize;

/// Boolean predicate over the answer map, used to gate question and subsection
/// visibility.
///
/// Definitions use a single-key map per node:
///
/// ```yaml
/// visible_when:
///   all:
///     - equals: { question_id: has_pets, value: yes }
///     - not:
///         contains: { question_id: pet_types, value: fish }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals {
        question_id: String,
        #[serde(deserialize_with = "deserialize_literal")]
        value: String,
    },
    Contains {
        question_id: String,
        #[serde(deserialize_with = "deserialize_literal")]
        value: String,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals {
            question_id: question_id.into(),
            value: value.into(),
        }
    }

    pub fn contains(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Contains {
            question_id: question_id.into(),
            value: value.into(),
        }
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Any(conditions.into_iter().collect())
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Compile to a JavaScript boolean expression reading answers through `scope`.
    ///
    /// Every child of `all`/`any`/`not` is parenthesized. Multi-select reads fall back
    /// to an empty array; scalar reads do not, since `undefined` never equals a literal.
    /// An empty `all` compiles to `true` and an empty `any` to `false`.
    pub fn to_js(&self, scope: &str) -> String {
        match self {
            Condition::Equals { question_id, value } => {
                format!("{} === {}", js::answer(scope, question_id), js::string(value))
            }
            Condition::Contains { question_id, value } => format!(
                "({} || []).includes({})",
                js::answer(scope, question_id),
                js::string(value)
            ),
            Condition::All(conditions) => join_js(conditions, scope, " && ", "true"),
            Condition::Any(conditions) => join_js(conditions, scope, " || ", "false"),
            Condition::Not(condition) => format!("!({})", condition.to_js(scope)),
        }
    }

    /// Evaluate against live answers with the same semantics as [`Condition::to_js`].
    pub fn evaluate(&self, answers: &Answers) -> bool {
        match self {
            Condition::Equals { question_id, value } => {
                answers.scalar(question_id) == Some(value.as_str())
            }
            Condition::Contains { question_id, value } => {
                answers.list(question_id).iter().any(|answer| answer == value)
            }
            Condition::All(conditions) => conditions.iter().all(|c| c.evaluate(answers)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.evaluate(answers)),
            Condition::Not(condition) => !condition.evaluate(answers),
        }
    }

    /// Every question id read by this condition, depth first.
    pub fn referenced_question_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_question_ids(&mut ids);
        ids
    }

    fn collect_question_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Condition::Equals { question_id, .. } | Condition::Contains { question_id, .. } => {
                ids.push(question_id)
            }
            Condition::All(conditions) | Condition::Any(conditions) => {
                for condition in conditions {
                    condition.collect_question_ids(ids);
                }
            }
            Condition::Not(condition) => condition.collect_question_ids(ids),
        }
    }
}

fn join_js(conditions: &[Condition], scope: &str, operator: &str, empty: &str) -> String {
    if conditions.is_empty() {
        return empty.to_string();
    }

    conditions
        .iter()
        .map(|condition| format!("({})", condition.to_js(scope)))
        .collect::<Vec<_>>()
        .join(operator)
}

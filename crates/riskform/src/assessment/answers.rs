use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Literal answer for yes/no questions.
pub const YES: &str = "yes";

/// A single stored answer: a scalar for yes/no, free text and single-choice questions,
/// a list for multi-select questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Many(Vec<String>),
}

impl AnswerValue {
    /// Scalar answers match by equality, list answers by membership.
    pub fn matches(&self, literal: &str) -> bool {
        match self {
            AnswerValue::Single(value) => value == literal,
            AnswerValue::Many(values) => values.iter().any(|value| value == literal),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Single(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Single(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Many(values)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        AnswerValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Live answer store keyed by question id.
///
/// Lookups never fail: an unanswered question reads as `None` for scalar access and
/// as an empty list for multi-select access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.set(question_id, value);
        self
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn scalar(&self, question_id: &str) -> Option<&str> {
        match self.0.get(question_id) {
            Some(AnswerValue::Single(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, question_id: &str) -> &[String] {
        match self.0.get(question_id) {
            Some(AnswerValue::Many(values)) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn is_yes(&self, question_id: &str) -> bool {
        self.scalar(question_id) == Some(YES)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A literal compared against answers. YAML booleans are read back as `"yes"` / `"no"`
/// so `value: true` and `value: "yes"` mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Literal(pub(crate) String);

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LiteralVisitor;

        impl<'de> Visitor<'de> for LiteralVisitor {
            type Value = Literal;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or boolean literal")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Literal, E> {
                Ok(Literal(if value { "yes" } else { "no" }.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Literal, E> {
                Ok(Literal(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Literal, E> {
                Ok(Literal(value))
            }
        }

        deserializer.deserialize_any(LiteralVisitor)
    }
}

pub(crate) fn deserialize_literal<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Literal::deserialize(deserializer).map(|literal| literal.0)
}

pub(crate) fn deserialize_literals<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let literals = Vec::<Literal>::deserialize(deserializer)?;
    Ok(literals.into_iter().map(|literal| literal.0).collect())
}

use super::answers::{deserialize_literals, Answers};
use super::condition::Condition;
use super::error::ModelError;
use serde::{Deserialize, Deserializer};

/// The answer shape a question collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    YesNo,
    FreeText,
    /// Single choice among `options`.
    MultipleChoice { options: Vec<String> },
    /// Any subset of `options`; answered as a list.
    MultipleSelect { options: Vec<String> },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum QuestionType {
    YesNo,
    FreeText,
    MultipleChoice,
    MultipleSelect,
}

impl QuestionType {
    fn as_str(self) -> &'static str {
        match self {
            QuestionType::YesNo => "yes_no",
            QuestionType::FreeText => "free_text",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultipleSelect => "multiple_select",
        }
    }
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::YesNo => "yes_no",
            QuestionKind::FreeText => "free_text",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::MultipleSelect { .. } => "multiple_select",
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            QuestionKind::MultipleChoice { options } | QuestionKind::MultipleSelect { options } => {
                options
            }
            QuestionKind::YesNo | QuestionKind::FreeText => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionDefinition")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub guidance: Option<String>,
    pub visible_when: Option<Condition>,
    pub kind: QuestionKind,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionDefinition {
    id: String,
    #[serde(rename = "type")]
    kind: QuestionType,
    text: String,
    #[serde(default, deserialize_with = "deserialize_optional_literals")]
    options: Option<Vec<String>>,
    #[serde(default)]
    guidance: Option<String>,
    #[serde(default)]
    visible_when: Option<Condition>,
}

fn deserialize_optional_literals<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_literals(deserializer).map(Some)
}

impl TryFrom<QuestionDefinition> for Question {
    type Error = ModelError;

    fn try_from(definition: QuestionDefinition) -> Result<Self, Self::Error> {
        let kind = match (definition.kind, definition.options) {
            (QuestionType::YesNo, None) => QuestionKind::YesNo,
            (QuestionType::FreeText, None) => QuestionKind::FreeText,
            (kind @ (QuestionType::YesNo | QuestionType::FreeText), Some(_)) => {
                return Err(ModelError::UnexpectedOptions {
                    kind: kind.as_str(),
                    question_id: definition.id,
                });
            }
            (QuestionType::MultipleChoice, options) => QuestionKind::MultipleChoice {
                options: options.unwrap_or_default(),
            },
            (QuestionType::MultipleSelect, options) => QuestionKind::MultipleSelect {
                options: options.unwrap_or_default(),
            },
        };
        let mut question = Question::new(definition.id, definition.text, kind)?;
        question.guidance = definition.guidance;
        question.visible_when = definition.visible_when;
        Ok(question)
    }
}

impl Question {
    /// Choice questions must offer at least one option.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionKind,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if matches!(
            kind,
            QuestionKind::MultipleChoice { .. } | QuestionKind::MultipleSelect { .. }
        ) && kind.options().is_empty()
        {
            return Err(ModelError::MissingOptions {
                kind: kind.as_str(),
                question_id: id,
            });
        }

        Ok(Self {
            id,
            text: text.into(),
            guidance: None,
            visible_when: None,
            kind,
        })
    }

    pub fn yes_no(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            guidance: None,
            visible_when: None,
            kind: QuestionKind::YesNo,
        }
    }

    pub fn free_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            guidance: None,
            visible_when: None,
            kind: QuestionKind::FreeText,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    pub fn with_visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    /// Questions without a condition are always visible.
    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.visible_when
            .as_ref()
            .map_or(true, |condition| condition.evaluate(answers))
    }
}

/// Visual grouping of questions within a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubSection {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub visible_when: Option<Condition>,
}

impl SubSection {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            questions,
            visible_when: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.visible_when
            .as_ref()
            .map_or(true, |condition| condition.evaluate(answers))
    }
}

/// Major form section, rendered as its own tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub subsections: Vec<SubSection>,
}

impl Section {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subsections: Vec<SubSection>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            subsections,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Flatten sections into a single declaration-ordered question list.
pub fn all_questions(sections: &[Section]) -> Vec<&Question> {
    sections
        .iter()
        .flat_map(|section| section.subsections.iter())
        .flat_map(|subsection| subsection.questions.iter())
        .collect()
}

/// Ids of every question currently shown to the respondent, in declaration order.
pub fn visible_question_ids<'a>(sections: &'a [Section], answers: &Answers) -> Vec<&'a str> {
    sections
        .iter()
        .flat_map(|section| section.subsections.iter())
        .filter(|subsection| subsection.is_visible(answers))
        .flat_map(|subsection| subsection.questions.iter())
        .filter(|question| question.is_visible(answers))
        .map(|question| question.id.as_str())
        .collect()
}

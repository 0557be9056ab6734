use super::error::LoadError;
use super::questions::{all_questions, Question, Section};
use super::risk::{Control, Risk, RiskEvaluator};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SECTIONS_FILE: &str = "sections.yaml";
pub const RISKS_FILE: &str = "risks.yaml";
pub const CONTROLS_FILE: &str = "controls.yaml";

/// Everything that defines one assessment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefinition {
    pub sections: Vec<Section>,
    pub risks: Vec<Risk>,
    pub controls: Vec<Control>,
}

impl FormDefinition {
    pub fn new(sections: Vec<Section>, risks: Vec<Risk>, controls: Vec<Control>) -> Self {
        Self {
            sections,
            risks,
            controls,
        }
    }

    /// Load `sections.yaml`, `risks.yaml` and, when present, `controls.yaml` from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let sections = load_yaml(dir.join(SECTIONS_FILE))?;
        let risks = load_yaml(dir.join(RISKS_FILE))?;

        let controls_path = dir.join(CONTROLS_FILE);
        let controls = if controls_path.exists() {
            load_yaml(controls_path)?
        } else {
            debug!(path = %controls_path.display(), "no controls file, continuing without controls");
            Vec::new()
        };

        let form = Self::new(sections, risks, controls);
        info!(
            dir = %dir.display(),
            sections = form.sections.len(),
            questions = form.questions().len(),
            risks = form.risks.len(),
            controls = form.controls.len(),
            "form definition loaded"
        );
        Ok(form)
    }

    pub fn questions(&self) -> Vec<&Question> {
        all_questions(&self.sections)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions()
            .into_iter()
            .find(|question| question.id == question_id)
    }

    pub fn evaluator(&self) -> RiskEvaluator {
        RiskEvaluator::new(self.risks.clone(), self.controls.clone())
    }
}

pub fn parse_sections(yaml: &str) -> Result<Vec<Section>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub fn parse_risks(yaml: &str) -> Result<Vec<Risk>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub fn parse_controls(yaml: &str) -> Result<Vec<Control>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

fn load_yaml<T: DeserializeOwned>(path: PathBuf) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml { path, source })
}

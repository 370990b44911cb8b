//! Application steps and their client-side gates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::catalogue::EXAM_QUESTION_COUNT;
use super::form::{ESSAY_EXTENSIONS, IntakeForm, word_count};
use crate::error::ValidationError;

pub const PROMPT_MIN_WORDS: usize = 100;
pub const PROMPT_MAX_WORDS: usize = 150;

pub const PROMPT_TIME_LIMIT: Duration = Duration::from_secs(15 * 60);
pub const ESSAY_TIME_LIMIT: Duration = Duration::from_secs(30 * 60);

/// The seven application steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Contact,
    Proficiency,
    WritingPrompt,
    Essay,
    WorkSamples,
    Cv,
    Certificates,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 7] = [
        Self::Contact,
        Self::Proficiency,
        Self::WritingPrompt,
        Self::Essay,
        Self::WorkSamples,
        Self::Cv,
        Self::Certificates,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::Contact => 1,
            Self::Proficiency => 2,
            Self::WritingPrompt => 3,
            Self::Essay => 4,
            Self::WorkSamples => 5,
            Self::Cv => 6,
            Self::Certificates => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<IntakeStep> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn next(&self) -> Option<IntakeStep> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<IntakeStep> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Certificates)
    }

    /// Soft time limit for the timed steps.
    pub fn time_limit(&self) -> Option<Duration> {
        match self {
            Self::WritingPrompt => Some(PROMPT_TIME_LIMIT),
            Self::Essay => Some(ESSAY_TIME_LIMIT),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Contact => "profile information",
            Self::Proficiency => "proficiency exam",
            Self::WritingPrompt => "writing prompt",
            Self::Essay => "essay",
            Self::WorkSamples => "work samples",
            Self::Cv => "CV",
            Self::Certificates => "certificates",
        }
    }

    /// Gate for leaving this step.
    pub fn validate(&self, form: &IntakeForm) -> Result<(), ValidationError> {
        match self {
            Self::Contact => {
                for (key, value) in form.contact.entries() {
                    if value.trim().is_empty() {
                        return Err(ValidationError::RequiredField(field_label(key)));
                    }
                }
                Ok(())
            }
            Self::Proficiency => {
                let answered = form.answered_count();
                if answered < EXAM_QUESTION_COUNT {
                    Err(ValidationError::ExamIncomplete {
                        answered,
                        required: EXAM_QUESTION_COUNT,
                    })
                } else {
                    Ok(())
                }
            }
            Self::WritingPrompt => {
                if form.prompt_id().is_none() {
                    return Err(ValidationError::NothingSelected("writing prompt"));
                }
                let words = word_count(form.prompt_response());
                if (PROMPT_MIN_WORDS..=PROMPT_MAX_WORDS).contains(&words) {
                    Ok(())
                } else {
                    Err(ValidationError::WordCountOutOfRange {
                        words,
                        min: PROMPT_MIN_WORDS,
                        max: PROMPT_MAX_WORDS,
                    })
                }
            }
            Self::Essay => {
                if form.essay_topic_id().is_none() {
                    return Err(ValidationError::NothingSelected("essay topic"));
                }
                let files = form.essay_file();
                if files.len() != 1 {
                    return Err(ValidationError::ExactlyOneFile("essay document"));
                }
                match files.first() {
                    Some(file) if !file.has_extension(ESSAY_EXTENSIONS) => {
                        Err(ValidationError::UnsupportedFileType {
                            name: file.display_name.clone(),
                            allowed: ESSAY_EXTENSIONS.join(", "),
                        })
                    }
                    _ => Ok(()),
                }
            }
            // Optional; caps are enforced when files are added
            Self::WorkSamples => Ok(()),
            Self::Cv => {
                if form.cv().len() == 1 {
                    Ok(())
                } else {
                    Err(ValidationError::ExactlyOneFile("CV"))
                }
            }
            Self::Certificates => {
                if form.certificates().is_empty() {
                    Err(ValidationError::AtLeastOneFile("certificate"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn field_label(key: &str) -> &'static str {
    match key {
        "phone" => "phone number",
        "country" => "country",
        "city" => "city",
        "education_level" => "education level",
        "specialization" => "specialization",
        "years_of_experience" => "years of experience",
        _ => "details",
    }
}

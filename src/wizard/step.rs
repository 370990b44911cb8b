//! Wizard steps: the closed step set, each with its validator and payload.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::fields::{
    self, BIO_MIN_CHARS, MAX_SPECIALIZATIONS, MAX_SUBJECTS, MIN_SPECIALIZATIONS, MIN_SUBJECTS,
    PhotoSource, WizardFields,
};
use crate::api::ProfileUpdate;
use crate::error::ValidationError;

/// The profile completion steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Photo,
    Bio,
    Specializations,
    Education,
    Languages,
    Subjects,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        Self::Photo,
        Self::Bio,
        Self::Specializations,
        Self::Education,
        Self::Languages,
        Self::Subjects,
        Self::Review,
    ];

    pub const FIRST: WizardStep = Self::Photo;

    /// 1-indexed position.
    pub fn number(&self) -> u8 {
        match self {
            Self::Photo => 1,
            Self::Bio => 2,
            Self::Specializations => 3,
            Self::Education => 4,
            Self::Languages => 5,
            Self::Subjects => 6,
            Self::Review => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<WizardStep> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<WizardStep> {
        Self::from_number(self.number() - 1)
    }

    /// The review step collects nothing and ends the wizard.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Review)
    }

    /// Step predicate: may the user move past this step?
    pub fn validate(&self, fields: &WizardFields) -> Result<(), ValidationError> {
        match self {
            Self::Photo => match fields.photo() {
                Some(PhotoSource::Stored(url)) if !url.trim().is_empty() => Ok(()),
                Some(PhotoSource::Fresh(file)) if file.is_image() => Ok(()),
                Some(PhotoSource::Fresh(file)) => Err(ValidationError::PhotoNotImage {
                    name: file.display_name.clone(),
                }),
                _ => Err(ValidationError::PhotoMissing),
            },
            Self::Bio => {
                let len = fields.bio_len();
                if len >= BIO_MIN_CHARS {
                    Ok(())
                } else {
                    Err(ValidationError::BioTooShort {
                        len,
                        min: BIO_MIN_CHARS,
                    })
                }
            }
            Self::Specializations => check_range(
                "specializations",
                fields.specializations().len(),
                MIN_SPECIALIZATIONS,
                MAX_SPECIALIZATIONS,
            ),
            Self::Education => {
                if fields.education().iter().any(|r| r.value.is_populated()) {
                    Ok(())
                } else {
                    Err(ValidationError::EducationMissing)
                }
            }
            Self::Languages => {
                if fields.languages().is_empty() {
                    Err(ValidationError::LanguagesMissing)
                } else {
                    Ok(())
                }
            }
            Self::Subjects => check_range(
                "subjects",
                fields.subjects().len(),
                MIN_SUBJECTS,
                MAX_SUBJECTS,
            ),
            Self::Review => Ok(()),
        }
    }

    /// The minimal save payload for this step, or `None` for review.
    pub fn payload(&self, fields: &WizardFields) -> Option<ProfileUpdate> {
        let body = match self {
            Self::Photo => match fields.photo()? {
                PhotoSource::Fresh(file) => return Some(ProfileUpdate::Photo(file.clone())),
                PhotoSource::Stored(url) => json!({ "photo_url": url }),
            },
            Self::Bio => json!({ "bio": fields.bio().trim() }),
            Self::Specializations => {
                json!({ "specializations": fields::values(fields.specializations()) })
            }
            Self::Education => {
                let populated: Vec<_> = fields
                    .education()
                    .iter()
                    .filter(|r| r.value.is_populated())
                    .map(|r| r.value.clone())
                    .collect();
                json!({ "education": populated })
            }
            Self::Languages => json!({ "languages": fields::values(fields.languages()) }),
            Self::Subjects => json!({ "subjects": fields::values(fields.subjects()) }),
            Self::Review => return None,
        };
        Some(ProfileUpdate::Fields(body))
    }
}

fn check_range(
    field: &'static str,
    count: usize,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&count) {
        Ok(())
    } else {
        Err(ValidationError::SelectionOutOfRange {
            field,
            count,
            min,
            max,
        })
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Photo => "photo",
            Self::Bio => "bio",
            Self::Specializations => "specializations",
            Self::Education => "education",
            Self::Languages => "languages",
            Self::Subjects => "subjects",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// The first step whose predicate fails, or review when all pass.
pub fn resume_step(fields: &WizardFields) -> WizardStep {
    WizardStep::ALL
        .iter()
        .copied()
        .filter(|s| !s.is_terminal())
        .find(|s| s.validate(fields).is_err())
        .unwrap_or(WizardStep::Review)
}

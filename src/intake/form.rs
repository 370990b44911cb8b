//! Values collected across the application steps. Memory only: nothing here
//! is persisted until the packet is submitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalogue::{self, EXAM_QUESTION_COUNT, OPTIONS_PER_QUESTION};
use crate::error::{IntakeError, ValidationError};
use crate::upload::{FileList, UploadedFile};

pub const ESSAY_EXTENSIONS: &[&str] = &["pdf", "docx"];
pub const CV_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
pub const CERTIFICATE_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

pub const MAX_WORK_SAMPLES: usize = 3;
pub const MAX_WORK_SAMPLES_BYTES: u64 = 50 * 1024 * 1024;

/// Step 1 contact and background fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub country: String,
    pub city: String,
    pub education_level: String,
    pub specialization: String,
    pub years_of_experience: String,
}

impl ContactInfo {
    /// Field names paired with their values, in form order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("phone", self.phone.as_str()),
            ("country", self.country.as_str()),
            ("city", self.city.as_str()),
            ("education_level", self.education_level.as_str()),
            ("specialization", self.specialization.as_str()),
            ("years_of_experience", self.years_of_experience.as_str()),
        ]
    }
}

fn accept(file: &UploadedFile, allowed: &'static [&'static str]) -> Result<(), ValidationError> {
    if file.has_extension(allowed) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFileType {
            name: file.display_name.clone(),
            allowed: allowed.join(", "),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeForm {
    pub contact: ContactInfo,
    answers: BTreeMap<usize, u8>,
    prompt_id: Option<String>,
    prompt_response: String,
    essay_topic_id: Option<String>,
    essay_file: FileList,
    work_samples: FileList,
    cv: FileList,
    certificates: FileList,
}

impl IntakeForm {
    // ── Proficiency exam ────────────────────────────────────────────

    /// Record the selected option (0-based) for a question (0-based).
    pub fn answer(&mut self, question: usize, option: u8) -> Result<(), ValidationError> {
        if question >= EXAM_QUESTION_COUNT || usize::from(option) >= OPTIONS_PER_QUESTION {
            return Err(ValidationError::InvalidAnswer { question, option });
        }
        self.answers.insert(question, option);
        Ok(())
    }

    pub fn answers(&self) -> &BTreeMap<usize, u8> {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    // ── Writing prompt ──────────────────────────────────────────────

    pub fn select_prompt(&mut self, id: &str) -> Result<(), IntakeError> {
        catalogue::find_prompt(id).ok_or_else(|| IntakeError::UnknownCatalogueId {
            kind: "prompt",
            id: id.to_string(),
        })?;
        self.prompt_id = Some(id.to_string());
        Ok(())
    }

    pub fn prompt_id(&self) -> Option<&str> {
        self.prompt_id.as_deref()
    }

    pub fn set_prompt_response(&mut self, text: impl Into<String>) {
        self.prompt_response = text.into();
    }

    pub fn prompt_response(&self) -> &str {
        &self.prompt_response
    }

    // ── Essay ───────────────────────────────────────────────────────

    pub fn select_essay_topic(&mut self, id: &str) -> Result<(), IntakeError> {
        catalogue::find_essay_topic(id).ok_or_else(|| IntakeError::UnknownCatalogueId {
            kind: "essay topic",
            id: id.to_string(),
        })?;
        self.essay_topic_id = Some(id.to_string());
        Ok(())
    }

    pub fn essay_topic_id(&self) -> Option<&str> {
        self.essay_topic_id.as_deref()
    }

    /// Attach the essay document, replacing any earlier one.
    pub fn attach_essay(&mut self, file: UploadedFile) -> Result<Vec<UploadedFile>, ValidationError> {
        accept(&file, ESSAY_EXTENSIONS)?;
        Ok(self.essay_file.replace_with(file))
    }

    pub fn remove_essay(&mut self) -> Vec<UploadedFile> {
        self.essay_file.clear()
    }

    pub fn essay_file(&self) -> &FileList {
        &self.essay_file
    }

    // ── Work samples ────────────────────────────────────────────────

    /// Add an optional work sample, enforcing the count and total size caps.
    pub fn add_work_sample(&mut self, file: UploadedFile) -> Result<Uuid, ValidationError> {
        if self.work_samples.len() >= MAX_WORK_SAMPLES {
            return Err(ValidationError::TooManyFiles {
                max: MAX_WORK_SAMPLES,
            });
        }
        let total_bytes = self.work_samples.total_bytes() + file.size_bytes;
        if total_bytes > MAX_WORK_SAMPLES_BYTES {
            return Err(ValidationError::FilesTooLarge {
                total_bytes,
                max_bytes: MAX_WORK_SAMPLES_BYTES,
            });
        }
        Ok(self.work_samples.push(file))
    }

    pub fn remove_work_sample(&mut self, id: Uuid) -> Option<UploadedFile> {
        self.work_samples.remove(id)
    }

    pub fn work_samples(&self) -> &FileList {
        &self.work_samples
    }

    // ── CV ──────────────────────────────────────────────────────────

    pub fn set_cv(&mut self, file: UploadedFile) -> Result<Vec<UploadedFile>, ValidationError> {
        accept(&file, CV_EXTENSIONS)?;
        Ok(self.cv.replace_with(file))
    }

    pub fn remove_cv(&mut self) -> Vec<UploadedFile> {
        self.cv.clear()
    }

    pub fn cv(&self) -> &FileList {
        &self.cv
    }

    // ── Certificates ────────────────────────────────────────────────

    pub fn add_certificate(&mut self, file: UploadedFile) -> Result<Uuid, ValidationError> {
        accept(&file, CERTIFICATE_EXTENSIONS)?;
        Ok(self.certificates.push(file))
    }

    pub fn remove_certificate(&mut self, id: Uuid) -> Option<UploadedFile> {
        self.certificates.remove(id)
    }

    pub fn certificates(&self) -> &FileList {
        &self.certificates
    }
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

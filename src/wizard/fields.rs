//! Field values collected by the profile wizard.
//!
//! List-valued fields are keyed by a locally generated id that stays stable
//! across edits, so the UI can address rows for update and removal.

use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::{EducationEntry, LanguageEntry, LanguageProficiency, WriterProfile};
use crate::upload::UploadedFile;

pub const BIO_MIN_CHARS: usize = 100;
pub const BIO_MAX_CHARS: usize = 500;
pub const MIN_SPECIALIZATIONS: usize = 1;
pub const MAX_SPECIALIZATIONS: usize = 5;
pub const MIN_SUBJECTS: usize = 1;
pub const MAX_SUBJECTS: usize = 10;

/// Where the profile photo comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSource {
    /// Picked in this session, not yet known to match what the server holds.
    Fresh(UploadedFile),
    /// URL of a photo the backend already stores.
    Stored(String),
}

/// A list row with its local id.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub id: Uuid,
    pub value: T,
}

impl<T> Keyed<T> {
    fn new(value: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
        }
    }
}

fn keyed<T: Clone>(values: &[T]) -> Vec<Keyed<T>> {
    values.iter().cloned().map(Keyed::new).collect()
}

fn remove_keyed<T>(rows: &mut Vec<Keyed<T>>, id: Uuid) -> Option<T> {
    let idx = rows.iter().position(|r| r.id == id)?;
    Some(rows.remove(idx).value)
}

/// Add a tag unless it is blank, already present, or the list is at `max`.
fn add_tag(rows: &mut Vec<Keyed<String>>, tag: &str, max: usize) -> Option<Uuid> {
    let tag = tag.trim();
    if tag.is_empty() || rows.len() >= max {
        return None;
    }
    if rows.iter().any(|r| r.value.eq_ignore_ascii_case(tag)) {
        return None;
    }
    let row = Keyed::new(tag.to_string());
    let id = row.id;
    rows.push(row);
    Some(id)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardFields {
    photo: Option<PhotoSource>,
    bio: String,
    specializations: Vec<Keyed<String>>,
    education: Vec<Keyed<EducationEntry>>,
    languages: Vec<Keyed<LanguageEntry>>,
    subjects: Vec<Keyed<String>>,
}

impl WizardFields {
    /// Hydrate from a server-fetched profile, replacing any local defaults.
    pub fn from_profile(profile: &WriterProfile) -> Self {
        Self {
            photo: profile
                .photo_url
                .as_ref()
                .filter(|url| !url.trim().is_empty())
                .map(|url| PhotoSource::Stored(url.clone())),
            bio: profile.bio.chars().take(BIO_MAX_CHARS).collect(),
            specializations: keyed(&profile.specializations),
            education: keyed(&profile.education),
            languages: keyed(&profile.languages),
            subjects: keyed(&profile.subjects),
        }
    }

    // ── Photo ───────────────────────────────────────────────────────

    pub fn photo(&self) -> Option<&PhotoSource> {
        self.photo.as_ref()
    }

    /// Select a new photo, returning the one it replaces. Only image files
    /// are accepted.
    pub fn set_photo(
        &mut self,
        file: UploadedFile,
    ) -> Result<Option<PhotoSource>, ValidationError> {
        if !file.is_image() {
            return Err(ValidationError::PhotoNotImage {
                name: file.display_name,
            });
        }
        Ok(self.photo.replace(PhotoSource::Fresh(file)))
    }

    pub fn clear_photo(&mut self) -> Option<PhotoSource> {
        self.photo.take()
    }

    // ── Bio ─────────────────────────────────────────────────────────

    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Set the bio, truncating input beyond the maximum length.
    pub fn set_bio(&mut self, text: &str) {
        self.bio = text.chars().take(BIO_MAX_CHARS).collect();
    }

    pub fn bio_len(&self) -> usize {
        self.bio.trim().chars().count()
    }

    // ── Specializations ─────────────────────────────────────────────

    pub fn specializations(&self) -> &[Keyed<String>] {
        &self.specializations
    }

    /// Returns `None` when the tag is blank, a duplicate, or the cap is reached.
    pub fn add_specialization(&mut self, tag: &str) -> Option<Uuid> {
        add_tag(&mut self.specializations, tag, MAX_SPECIALIZATIONS)
    }

    pub fn remove_specialization(&mut self, id: Uuid) -> Option<String> {
        remove_keyed(&mut self.specializations, id)
    }

    // ── Education ───────────────────────────────────────────────────

    pub fn education(&self) -> &[Keyed<EducationEntry>] {
        &self.education
    }

    pub fn add_education(&mut self, entry: EducationEntry) -> Uuid {
        let row = Keyed::new(entry);
        let id = row.id;
        self.education.push(row);
        id
    }

    pub fn update_education(&mut self, id: Uuid, entry: EducationEntry) -> bool {
        match self.education.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.value = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove_education(&mut self, id: Uuid) -> Option<EducationEntry> {
        remove_keyed(&mut self.education, id)
    }

    // ── Languages ───────────────────────────────────────────────────

    pub fn languages(&self) -> &[Keyed<LanguageEntry>] {
        &self.languages
    }

    /// Add a language. Each language may appear at most once.
    pub fn add_language(
        &mut self,
        language: &str,
        proficiency: LanguageProficiency,
    ) -> Result<Uuid, ValidationError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(ValidationError::RequiredField("language"));
        }
        if self
            .languages
            .iter()
            .any(|r| r.value.language.eq_ignore_ascii_case(language))
        {
            return Err(ValidationError::DuplicateLanguage(language.to_string()));
        }
        let row = Keyed::new(LanguageEntry {
            language: language.to_string(),
            proficiency,
        });
        let id = row.id;
        self.languages.push(row);
        Ok(id)
    }

    pub fn set_language_proficiency(&mut self, id: Uuid, proficiency: LanguageProficiency) -> bool {
        match self.languages.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.value.proficiency = proficiency;
                true
            }
            None => false,
        }
    }

    pub fn remove_language(&mut self, id: Uuid) -> Option<LanguageEntry> {
        remove_keyed(&mut self.languages, id)
    }

    // ── Subjects ────────────────────────────────────────────────────

    pub fn subjects(&self) -> &[Keyed<String>] {
        &self.subjects
    }

    pub fn add_subject(&mut self, tag: &str) -> Option<Uuid> {
        add_tag(&mut self.subjects, tag, MAX_SUBJECTS)
    }

    pub fn remove_subject(&mut self, id: Uuid) -> Option<String> {
        remove_keyed(&mut self.subjects, id)
    }
}

/// Plain values of a keyed list, in order.
pub(crate) fn values<T: Clone>(rows: &[Keyed<T>]) -> Vec<T> {
    rows.iter().map(|r| r.value.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_specialization_is_ignored() {
        let mut fields = WizardFields::default();
        for tag in ["History", "Nursing", "Law", "Economics", "Biology"] {
            assert!(fields.add_specialization(tag).is_some());
        }
        assert!(fields.add_specialization("Physics").is_none());
        assert_eq!(fields.specializations().len(), MAX_SPECIALIZATIONS);
        assert!(!fields.specializations().iter().any(|r| r.value == "Physics"));
    }

    #[test]
    fn eleventh_subject_is_ignored() {
        let mut fields = WizardFields::default();
        for i in 0..MAX_SUBJECTS {
            assert!(fields.add_subject(&format!("Subject {i}")).is_some());
        }
        let before = fields.subjects().to_vec();
        assert!(fields.add_subject("One too many").is_none());
        assert_eq!(fields.subjects(), before.as_slice());
    }

    #[test]
    fn duplicate_language_rejected() {
        let mut fields = WizardFields::default();
        fields.add_language("English", LanguageProficiency::Native).unwrap();
        let err = fields
            .add_language("english", LanguageProficiency::Fluent)
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateLanguage("english".to_string()));
        assert_eq!(fields.languages().len(), 1);
        assert_eq!(fields.languages()[0].value.proficiency, LanguageProficiency::Native);
    }

    #[test]
    fn removal_by_id_keeps_other_ids_stable() {
        let mut fields = WizardFields::default();
        let a = fields.add_education(EducationEntry::new("BA", "UCL"));
        let b = fields.add_education(EducationEntry::new("MA", "KCL"));

        assert_eq!(fields.remove_education(a).unwrap().degree, "BA");
        assert_eq!(fields.education()[0].id, b);
        assert!(fields.update_education(b, EducationEntry::new("MSc", "KCL")));
        assert_eq!(fields.education()[0].value.degree, "MSc");
        assert!(!fields.update_education(a, EducationEntry::new("x", "y")));
    }

    #[test]
    fn bio_is_truncated_at_max() {
        let mut fields = WizardFields::default();
        fields.set_bio(&"a".repeat(BIO_MAX_CHARS + 50));
        assert_eq!(fields.bio().chars().count(), BIO_MAX_CHARS);
    }

    #[test]
    fn duplicate_and_blank_tags_rejected() {
        let mut fields = WizardFields::default();
        assert!(fields.add_subject("Math").is_some());
        assert!(fields.add_subject("math").is_none());
        assert!(fields.add_subject("   ").is_none());
        assert_eq!(fields.subjects().len(), 1);
    }

    #[test]
    fn hydrate_from_profile() {
        let profile = WriterProfile {
            photo_url: Some("https://cdn/p.jpg".to_string()),
            bio: "bio".to_string(),
            specializations: vec!["Law".to_string()],
            languages: vec![LanguageEntry {
                language: "French".to_string(),
                proficiency: LanguageProficiency::Fluent,
            }],
            ..Default::default()
        };
        let fields = WizardFields::from_profile(&profile);
        assert_eq!(
            fields.photo(),
            Some(&PhotoSource::Stored("https://cdn/p.jpg".to_string()))
        );
        assert_eq!(values(fields.specializations()), vec!["Law".to_string()]);
        assert_eq!(fields.languages()[0].value.language, "French");
        assert!(fields.education().is_empty());
    }

    #[test]
    fn set_photo_returns_replaced() {
        let mut fields = WizardFields::from_profile(&WriterProfile {
            photo_url: Some("https://cdn/old.jpg".to_string()),
            ..Default::default()
        });
        let previous = fields
            .set_photo(UploadedFile::new("me.png", "image/png", vec![1]))
            .unwrap();
        assert_eq!(previous, Some(PhotoSource::Stored("https://cdn/old.jpg".to_string())));
        assert!(matches!(fields.photo(), Some(PhotoSource::Fresh(_))));
    }

    #[test]
    fn set_photo_rejects_non_images() {
        let mut fields = WizardFields::from_profile(&WriterProfile {
            photo_url: Some("https://cdn/old.jpg".to_string()),
            ..Default::default()
        });
        assert_eq!(
            fields.set_photo(UploadedFile::new("cv.pdf", "application/pdf", vec![1])),
            Err(ValidationError::PhotoNotImage {
                name: "cv.pdf".to_string()
            })
        );
        // The stored photo is kept
        assert_eq!(
            fields.photo(),
            Some(&PhotoSource::Stored("https://cdn/old.jpg".to_string()))
        );

        let mut empty = WizardFields::default();
        let pdf = UploadedFile::new("cv.pdf", "application/pdf", vec![1]);
        assert!(empty.set_photo(pdf).is_err());
        assert_eq!(
            crate::wizard::WizardStep::Photo.validate(&empty),
            Err(ValidationError::PhotoMissing)
        );
    }
}

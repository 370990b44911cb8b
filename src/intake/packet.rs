//! The one-shot multipart application packet.

use super::form::IntakeForm;
use crate::error::IntakeError;
use crate::upload::UploadedFile;

/// Multipart field names understood by the application resource.
pub mod field_names {
    pub const PROFICIENCY_ANSWERS: &str = "proficiency_answers";
    pub const PROMPT_ID: &str = "prompt_id";
    pub const PROMPT_RESPONSE: &str = "prompt_response";
    pub const ESSAY_TOPIC_ID: &str = "essay_topic_id";
    pub const ESSAY_FILE: &str = "essay_file";
    pub const CV_FILE: &str = "cv_file";
    pub const WORK_SAMPLES: &str = "work_samples";
    pub const CERTIFICATES: &str = "certificates";
}

/// A file bound to its multipart field.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketFile {
    pub field: &'static str,
    pub file: UploadedFile,
}

/// Scalar fields plus attachments, ready to send.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntakePacket {
    pub fields: Vec<(String, String)>,
    pub files: Vec<PacketFile>,
}

impl IntakePacket {
    /// Flatten the form. Callers validate the form first.
    pub fn build(form: &IntakeForm) -> Result<Self, IntakeError> {
        use field_names::*;

        let mut fields: Vec<(String, String)> = form
            .contact
            .entries()
            .iter()
            .map(|(k, v)| (k.to_string(), v.trim().to_string()))
            .collect();

        fields.push((
            PROFICIENCY_ANSWERS.to_string(),
            serde_json::to_string(form.answers())?,
        ));
        if let Some(id) = form.prompt_id() {
            fields.push((PROMPT_ID.to_string(), id.to_string()));
        }
        fields.push((
            PROMPT_RESPONSE.to_string(),
            form.prompt_response().trim().to_string(),
        ));
        if let Some(id) = form.essay_topic_id() {
            fields.push((ESSAY_TOPIC_ID.to_string(), id.to_string()));
        }

        let mut files = Vec::new();
        let mut attach = |field: &'static str, list: &crate::upload::FileList| {
            files.extend(list.iter().map(|f| PacketFile {
                field,
                file: f.clone(),
            }));
        };
        attach(ESSAY_FILE, form.essay_file());
        attach(CV_FILE, form.cv());
        attach(WORK_SAMPLES, form.work_samples());
        attach(CERTIFICATES, form.certificates());

        Ok(Self { fields, files })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn files_named(&self, field: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|f| f.field == field)
            .map(|f| &f.file)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::field_names::*;
    use super::*;

    #[test]
    fn packet_carries_scalars_answers_and_named_files() {
        let mut form = IntakeForm::default();
        form.contact.phone = " 555-0101 ".to_string();
        form.contact.country = "Kenya".to_string();
        form.answer(0, 2).unwrap();
        form.answer(12, 1).unwrap();
        form.select_prompt("remote-learning").unwrap();
        form.set_prompt_response("Some response text");
        form.select_essay_topic("ai-in-education").unwrap();
        form.attach_essay(UploadedFile::new("e.docx", "x", vec![1])).unwrap();
        form.set_cv(UploadedFile::new("cv.pdf", "application/pdf", vec![2])).unwrap();
        form.add_work_sample(UploadedFile::new("s1.pdf", "application/pdf", vec![3]))
            .unwrap();
        form.add_work_sample(UploadedFile::new("s2.pdf", "application/pdf", vec![4]))
            .unwrap();
        form.add_certificate(UploadedFile::new("c.png", "image/png", vec![5]))
            .unwrap();

        let packet = IntakePacket::build(&form).unwrap();

        assert_eq!(packet.field("phone"), Some("555-0101"));
        assert_eq!(packet.field("country"), Some("Kenya"));
        assert_eq!(packet.field(PROMPT_ID), Some("remote-learning"));
        assert_eq!(packet.field(ESSAY_TOPIC_ID), Some("ai-in-education"));

        let answers: serde_json::Value =
            serde_json::from_str(packet.field(PROFICIENCY_ANSWERS).unwrap()).unwrap();
        assert_eq!(answers["0"], 2);
        assert_eq!(answers["12"], 1);

        assert_eq!(packet.files_named(ESSAY_FILE).len(), 1);
        assert_eq!(packet.files_named(CV_FILE).len(), 1);
        assert_eq!(packet.files_named(WORK_SAMPLES).len(), 2);
        assert_eq!(packet.files_named(CERTIFICATES).len(), 1);
    }

    #[test]
    fn local_file_ids_are_not_sent() {
        let mut form = IntakeForm::default();
        let file = UploadedFile::new("cv.pdf", "application/pdf", vec![1]);
        let id = file.id.to_string();
        form.set_cv(file).unwrap();
        let packet = IntakePacket::build(&form).unwrap();
        assert!(packet.fields.iter().all(|(_, v)| !v.contains(&id)));
    }
}

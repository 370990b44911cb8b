//! Error types for the writer onboarding client.

use crate::wizard::WizardStep;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Message shown when the backend gives no usable error text.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors talking to the marketplace backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Best-effort text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Client-side validation failures. Display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload a profile photo")]
    PhotoMissing,

    #[error("{name} is not an image")]
    PhotoNotImage { name: String },

    #[error("Your bio must be at least {min} characters (currently {len})")]
    BioTooShort { len: usize, min: usize },

    #[error("Select between {min} and {max} {field}")]
    SelectionOutOfRange {
        field: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("Add at least one education entry with a degree and an institution")]
    EducationMissing,

    #[error("Add at least one language")]
    LanguagesMissing,

    #[error("{0} is already in your languages")]
    DuplicateLanguage(String),

    #[error("Please fill in your {0}")]
    RequiredField(&'static str),

    #[error("Please answer all questions ({answered}/{required} answered)")]
    ExamIncomplete { answered: usize, required: usize },

    #[error("Question {question} has no option {option}")]
    InvalidAnswer { question: usize, option: u8 },

    #[error("Please select a {0}")]
    NothingSelected(&'static str),

    #[error("Your response must be between {min} and {max} words (currently {words})")]
    WordCountOutOfRange { words: usize, min: usize, max: usize },

    #[error("Please attach exactly one {0}")]
    ExactlyOneFile(&'static str),

    #[error("Please attach at least one {0}")]
    AtLeastOneFile(&'static str),

    #[error("{name} is not an accepted file type (allowed: {allowed})")]
    UnsupportedFileType { name: String, allowed: String },

    #[error("You can upload at most {max} work samples")]
    TooManyFiles { max: usize },

    #[error("Work samples may not exceed {max_bytes} bytes in total")]
    FilesTooLarge { total_bytes: u64, max_bytes: u64 },
}

/// Local persistence errors (token store).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Profile wizard errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("A step is already being saved")]
    StepSubmitting,

    #[error("Step {step} is not valid: {source}")]
    Invalid {
        step: WizardStep,
        #[source]
        source: ValidationError,
    },

    #[error("Failed to save step {step}: {source}")]
    SaveFailed {
        step: WizardStep,
        #[source]
        source: ApiError,
    },

    #[error("Failed to load profile: {0}")]
    LoadFailed(#[source] ApiError),

    #[error("Finish is only available on the review step (currently {0})")]
    NotOnReview(WizardStep),

    #[error("The wizard has been closed")]
    Closed,
}

/// Application intake errors.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Step {step} is not valid: {source}")]
    Invalid {
        step: u8,
        #[source]
        source: ValidationError,
    },

    #[error("Submission is only available on the final step (currently {0})")]
    NotOnFinalStep(u8),

    #[error("The application has already been submitted")]
    AlreadySubmitted,

    #[error("Unknown {kind} id {id}")]
    UnknownCatalogueId { kind: &'static str, id: String },

    #[error("Submission failed: {0}")]
    SubmitFailed(#[source] ApiError),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode application packet: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn load_session(disk_fails: bool) -> Result<()> {
        let read: std::result::Result<(), StorageError> = if disk_fails {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        } else {
            Ok(())
        };
        read?;
        let fetch: std::result::Result<(), ApiError> = Err(ApiError::Unauthorized);
        fetch?;
        Ok(())
    }

    #[test]
    fn sub_errors_convert_into_top_level() {
        assert!(matches!(load_session(true), Err(Error::Storage(_))));
        let err = load_session(false).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Unauthorized)));
        assert_eq!(err.to_string(), "API error: Not authenticated");
    }

    #[test]
    fn user_message_falls_back_to_generic_text() {
        let blank = ApiError::Status {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(blank.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            ApiError::Network("reset".to_string()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }
}

//! Session user and writer profile data models, as returned by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role of the acting user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Writer,
    Client,
    Admin,
}

impl Role {
    /// Whether this role must have a complete writer profile to use gated areas.
    pub fn requires_complete_profile(&self) -> bool {
        matches!(self, Self::Writer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Writer => write!(f, "writer"),
            Self::Client => write!(f, "client"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
}

/// Where the writer's application stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    NotSubmitted,
    Pending,
    Approved,
    Rejected,
}

/// The signed-in user as reported by the session resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the education list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
}

impl EducationEntry {
    pub fn new(degree: impl Into<String>, institution: impl Into<String>) -> Self {
        Self {
            degree: degree.into(),
            institution: institution.into(),
            ..Default::default()
        }
    }

    /// Both the degree and the institution are filled in.
    pub fn is_populated(&self) -> bool {
        !self.degree.trim().is_empty() && !self.institution.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LanguageProficiency {
    Basic,
    #[default]
    Conversational,
    Fluent,
    Native,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    pub language: String,
    pub proficiency: LanguageProficiency,
}

/// Server-authoritative completion flag plus the fields still missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CompletionStatus {
    pub is_complete: bool,
    #[serde(default)]
    pub missing_fields: Vec<String>,
}

/// Writer profile as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WriterProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub missing_fields: Vec<String>,
}

impl WriterProfile {
    pub fn completion(&self) -> CompletionStatus {
        CompletionStatus {
            is_complete: self.is_complete,
            missing_fields: self.missing_fields.clone(),
        }
    }
}

/// Acknowledgment returned after the intake packet is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

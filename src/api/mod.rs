//! Backend REST API boundary.
//!
//! Everything the onboarding core needs from the marketplace backend goes
//! through [`BackendApi`], so the wizard, intake flow and services can be
//! driven by the reqwest client in production and by a double in tests.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::intake::IntakePacket;
use crate::model::{ApplicationReceipt, SessionUser, WriterProfile};
use crate::upload::UploadedFile;

/// Resource paths, relative to the configured base URL.
pub mod paths {
    pub const PROFILE: &str = "writers/profile";
    pub const APPLICATION: &str = "writers/application";
    pub const SESSION: &str = "auth/me";
}

/// Payload of a single wizard-step save.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    /// JSON subset of the profile fields owned by one step.
    Fields(serde_json::Value),
    /// A freshly selected profile photo, sent as multipart.
    Photo(UploadedFile),
}

/// Backend-agnostic access to the marketplace REST API.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Fetch the writer profile along with its completion flag.
    async fn fetch_profile(&self) -> Result<WriterProfile, ApiError>;

    /// Persist one wizard step's fields.
    async fn update_profile(&self, update: ProfileUpdate) -> Result<WriterProfile, ApiError>;

    /// Submit the one-shot application packet.
    async fn submit_application(
        &self,
        packet: IntakePacket,
    ) -> Result<ApplicationReceipt, ApiError>;

    /// Fetch the signed-in user.
    async fn fetch_session(&self) -> Result<SessionUser, ApiError>;
}

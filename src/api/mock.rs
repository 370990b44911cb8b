//! In-memory [`BackendApi`] double used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{BackendApi, ProfileUpdate};
use crate::error::ApiError;
use crate::intake::IntakePacket;
use crate::model::{ApplicationReceipt, ApplicationStatus, Role, SessionUser, WriterProfile};

#[derive(Default)]
struct Inner {
    profile: WriterProfile,
    session: Option<SessionUser>,
    updates: Vec<ProfileUpdate>,
    packets: Vec<IntakePacket>,
    profile_fetches: usize,
    fail_fetch: bool,
    fail_update: Option<String>,
    fail_submit: Option<ApiError>,
}

#[derive(Default)]
pub(crate) struct MockBackend {
    inner: Mutex<Inner>,
    /// When set, `update_profile` waits for a notification before answering.
    hold_updates: Option<Arc<Notify>>,
}

impl MockBackend {
    pub(crate) fn with_profile(profile: WriterProfile) -> Self {
        let backend = Self::default();
        backend.lock().profile = profile;
        backend
    }

    pub(crate) fn with_held_updates(mut self, hold: Arc<Notify>) -> Self {
        self.hold_updates = Some(hold);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub(crate) fn set_profile(&self, profile: WriterProfile) {
        self.lock().profile = profile;
    }

    pub(crate) fn set_session(&self, user: SessionUser) {
        self.lock().session = Some(user);
    }

    pub(crate) fn fail_fetch(&self, fail: bool) {
        self.lock().fail_fetch = fail;
    }

    pub(crate) fn fail_update(&self, message: Option<&str>) {
        self.lock().fail_update = message.map(str::to_string);
    }

    pub(crate) fn fail_submit(&self, err: Option<ApiError>) {
        self.lock().fail_submit = err;
    }

    pub(crate) fn updates(&self) -> Vec<ProfileUpdate> {
        self.lock().updates.clone()
    }

    pub(crate) fn packets(&self) -> Vec<IntakePacket> {
        self.lock().packets.clone()
    }

    pub(crate) fn profile_fetches(&self) -> usize {
        self.lock().profile_fetches
    }
}

pub(crate) fn writer(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        first_name: "Test".to_string(),
        last_name: "Writer".to_string(),
        role: Role::Writer,
        verification_status: Default::default(),
        application_status: ApplicationStatus::NotSubmitted,
        created_at: None,
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn fetch_profile(&self) -> Result<WriterProfile, ApiError> {
        let mut inner = self.lock();
        inner.profile_fetches += 1;
        if inner.fail_fetch {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(inner.profile.clone())
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<WriterProfile, ApiError> {
        self.lock().updates.push(update.clone());

        if let Some(hold) = &self.hold_updates {
            hold.notified().await;
        }

        let mut inner = self.lock();
        if let Some(message) = inner.fail_update.clone() {
            return Err(ApiError::Status {
                status: 500,
                message,
            });
        }
        match update {
            ProfileUpdate::Photo(_) => {
                inner.profile.photo_url = Some("https://cdn.example.com/photo.jpg".to_string());
            }
            ProfileUpdate::Fields(body) => {
                let mut current = serde_json::to_value(&inner.profile).unwrap();
                if let (Some(dst), Some(src)) = (current.as_object_mut(), body.as_object()) {
                    for (k, v) in src {
                        dst.insert(k.clone(), v.clone());
                    }
                }
                inner.profile = serde_json::from_value(current).unwrap();
            }
        }
        Ok(inner.profile.clone())
    }

    async fn submit_application(
        &self,
        packet: IntakePacket,
    ) -> Result<ApplicationReceipt, ApiError> {
        let mut inner = self.lock();
        inner.packets.push(packet);
        if let Some(err) = inner.fail_submit.take() {
            return Err(err);
        }
        Ok(ApplicationReceipt {
            id: Some("app-1".to_string()),
            status: ApplicationStatus::Pending,
            submitted_at: Some(chrono::Utc::now()),
        })
    }

    async fn fetch_session(&self) -> Result<SessionUser, ApiError> {
        self.lock().session.clone().ok_or(ApiError::Unauthorized)
    }
}

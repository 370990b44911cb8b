//! ProfileService: owns the cached writer profile and completion status.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::BackendApi;
use crate::error::ApiError;
use crate::model::{CompletionStatus, WriterProfile};

/// Cached view of the server-owned writer profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    /// Not fetched yet (or re-fetching after a failure).
    Loading,
    Ready(WriterProfile),
    /// Last fetch failed; carries a user-facing message.
    Failed(String),
}

impl ProfileState {
    pub fn completion(&self) -> Option<CompletionStatus> {
        match self {
            Self::Ready(profile) => Some(profile.completion()),
            _ => None,
        }
    }
}

/// Single owner of the profile slice. Readers subscribe; writers go through
/// [`ProfileService::refresh`] or [`ProfileService::apply`].
pub struct ProfileService {
    api: Arc<dyn BackendApi>,
    tx: watch::Sender<ProfileState>,
}

impl ProfileService {
    pub fn new(api: Arc<dyn BackendApi>) -> Arc<Self> {
        let (tx, _rx) = watch::channel(ProfileState::Loading);
        Arc::new(Self { api, tx })
    }

    pub fn api(&self) -> Arc<dyn BackendApi> {
        Arc::clone(&self.api)
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ProfileState {
        self.tx.borrow().clone()
    }

    pub fn completion(&self) -> Option<CompletionStatus> {
        self.tx.borrow().completion()
    }

    /// Re-fetch the profile from the backend and publish the result.
    pub async fn refresh(&self) -> Result<WriterProfile, ApiError> {
        if matches!(*self.tx.borrow(), ProfileState::Failed(_)) {
            self.tx.send_replace(ProfileState::Loading);
        }

        match self.api.fetch_profile().await {
            Ok(profile) => {
                tracing::info!(
                    is_complete = profile.is_complete,
                    missing = profile.missing_fields.len(),
                    "Profile refreshed"
                );
                self.tx.send_replace(ProfileState::Ready(profile.clone()));
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch profile: {}", e);
                self.tx.send_replace(ProfileState::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Publish a profile the backend returned from a save.
    pub fn apply(&self, profile: WriterProfile) {
        self.tx.send_replace(ProfileState::Ready(profile));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;

    fn complete_profile() -> WriterProfile {
        WriterProfile {
            is_complete: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn starts_loading_then_ready() {
        let api = Arc::new(MockBackend::with_profile(complete_profile()));
        let service = ProfileService::new(api);
        assert_eq!(service.current(), ProfileState::Loading);
        assert!(service.completion().is_none());

        service.refresh().await.unwrap();
        assert!(service.completion().unwrap().is_complete);
    }

    #[tokio::test]
    async fn failure_is_distinct_from_loading() {
        let api = Arc::new(MockBackend::default());
        api.fail_fetch(true);
        let service = ProfileService::new(api.clone());

        assert!(service.refresh().await.is_err());
        assert!(matches!(service.current(), ProfileState::Failed(_)));

        api.fail_fetch(false);
        service.refresh().await.unwrap();
        assert!(matches!(service.current(), ProfileState::Ready(_)));
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let api = Arc::new(MockBackend::with_profile(complete_profile()));
        let service = ProfileService::new(api);
        let mut rx = service.subscribe();

        service.refresh().await.unwrap();
        rx.changed().await.unwrap();
        assert!(matches!(*rx.borrow(), ProfileState::Ready(_)));
    }
}

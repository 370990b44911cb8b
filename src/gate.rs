//! Profile completion guard for writer-only areas.
//!
//! The guard takes its own snapshot of completion status when mounted and
//! only re-reads it on an explicit [`ProfileGuard::refresh`]. It does not
//! follow the shared profile channel, so a writer who finishes the wizard
//! elsewhere stays blocked here until the host refreshes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::model::{Role, WriterProfile};
use crate::services::ProfileService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Blocked { missing_fields: Vec<String> },
    Allowed,
    Failed(String),
}

/// What the host should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Spinner,
    CallToAction { missing_fields: Vec<String> },
    Content,
    Error(String),
}

impl From<&GateState> for GateView {
    fn from(state: &GateState) -> Self {
        match state {
            GateState::Loading => Self::Spinner,
            GateState::Blocked { missing_fields } => Self::CallToAction {
                missing_fields: missing_fields.clone(),
            },
            GateState::Allowed => Self::Content,
            GateState::Failed(message) => Self::Error(message.clone()),
        }
    }
}

fn decide(profile: &WriterProfile) -> GateState {
    let status = profile.completion();
    if status.is_complete {
        GateState::Allowed
    } else {
        GateState::Blocked {
            missing_fields: status.missing_fields,
        }
    }
}

pub struct ProfileGuard {
    profiles: Arc<ProfileService>,
    role: Role,
    loaded: AtomicBool,
    tx: watch::Sender<GateState>,
}

impl ProfileGuard {
    /// Mount a guard for a user with `role`. Roles that do not need a complete
    /// profile start out allowed and never fetch.
    pub fn new(profiles: Arc<ProfileService>, role: Role) -> Self {
        let initial = if role.requires_complete_profile() {
            GateState::Loading
        } else {
            GateState::Allowed
        };
        let (tx, _rx) = watch::channel(initial);
        Self {
            profiles,
            role,
            loaded: AtomicBool::new(false),
            tx,
        }
    }

    pub fn state(&self) -> GateState {
        self.tx.borrow().clone()
    }

    pub fn view(&self) -> GateView {
        GateView::from(&*self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.tx.subscribe()
    }

    /// First fetch for this mount. Later calls return the current state.
    pub async fn load(&self) -> GateState {
        if self.loaded.swap(true, Ordering::AcqRel) {
            return self.state();
        }
        self.refresh().await
    }

    /// Re-fetch completion status and re-decide.
    pub async fn refresh(&self) -> GateState {
        if !self.role.requires_complete_profile() {
            return GateState::Allowed;
        }
        let next = match self.profiles.refresh().await {
            Ok(profile) => decide(&profile),
            Err(e) => GateState::Failed(e.user_message()),
        };
        tracing::info!(role = %self.role, state = ?next, "Profile gate evaluated");
        self.tx.send_replace(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;

    fn incomplete() -> WriterProfile {
        WriterProfile {
            is_complete: false,
            missing_fields: vec!["bio".to_string(), "languages".to_string()],
            ..Default::default()
        }
    }

    fn guard(api: &Arc<MockBackend>, role: Role) -> ProfileGuard {
        let profiles = ProfileService::new(api.clone());
        ProfileGuard::new(profiles, role)
    }

    #[tokio::test]
    async fn spinner_until_loaded() {
        let api = Arc::new(MockBackend::with_profile(incomplete()));
        let guard = guard(&api, Role::Writer);
        assert_eq!(guard.view(), GateView::Spinner);
        assert_eq!(api.profile_fetches(), 0);
    }

    #[tokio::test]
    async fn incomplete_writer_is_blocked_with_missing_fields() {
        let api = Arc::new(MockBackend::with_profile(incomplete()));
        let guard = guard(&api, Role::Writer);

        guard.load().await;
        assert_eq!(
            guard.view(),
            GateView::CallToAction {
                missing_fields: vec!["bio".to_string(), "languages".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn complete_writer_sees_content() {
        let api = Arc::new(MockBackend::with_profile(WriterProfile {
            is_complete: true,
            ..Default::default()
        }));
        let guard = guard(&api, Role::Writer);
        assert_eq!(guard.load().await, GateState::Allowed);
        assert_eq!(guard.view(), GateView::Content);
    }

    #[tokio::test]
    async fn other_roles_pass_without_fetching() {
        let api = Arc::new(MockBackend::with_profile(incomplete()));
        for role in [Role::Client, Role::Admin] {
            let guard = guard(&api, role);
            assert_eq!(guard.view(), GateView::Content);
            assert_eq!(guard.load().await, GateState::Allowed);
        }
        assert_eq!(api.profile_fetches(), 0);
    }

    #[tokio::test]
    async fn load_fetches_once_and_unblocks_only_on_refresh() {
        let api = Arc::new(MockBackend::with_profile(incomplete()));
        let profiles = ProfileService::new(api.clone());
        let guard = ProfileGuard::new(Arc::clone(&profiles), Role::Writer);

        guard.load().await;
        guard.load().await;
        assert_eq!(api.profile_fetches(), 1);

        // Profile completed elsewhere and published on the shared service
        let done = WriterProfile {
            is_complete: true,
            ..Default::default()
        };
        api.set_profile(done.clone());
        profiles.apply(done);
        assert!(matches!(guard.state(), GateState::Blocked { .. }));

        assert_eq!(guard.refresh().await, GateState::Allowed);
        assert_eq!(api.profile_fetches(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error_not_content() {
        let api = Arc::new(MockBackend::default());
        api.fail_fetch(true);
        let guard = guard(&api, Role::Writer);
        guard.load().await;
        assert!(matches!(guard.view(), GateView::Error(_)));
    }
}

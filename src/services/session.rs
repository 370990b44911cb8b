//! SessionService: auth token and cached user record.
//!
//! The token and the last-seen user are kept in a small JSON file, the local
//! counterpart of the browser storage the web client uses.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::api::BackendApi;
use crate::error::{ApiError, StorageError};
use crate::model::{ApplicationStatus, Role, SessionUser};

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<SessionUser>,
}

/// Token plus the user record cached alongside it.
#[derive(Debug)]
pub struct CachedSession {
    pub token: SecretString,
    pub user: Option<SessionUser>,
}

/// File-backed storage for the auth token and cached user.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<CachedSession>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = serde_json::from_str(&raw)?;
        Ok(Some(CachedSession {
            token: SecretString::from(stored.token),
            user: stored.user,
        }))
    }

    pub async fn save(
        &self,
        token: &SecretString,
        user: Option<&SessionUser>,
    ) -> Result<(), StorageError> {
        let stored = StoredSession {
            token: token.expose_secret().to_string(),
            user: user.cloned(),
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Replace the cached user, keeping the stored token. No-op without a token.
    pub async fn save_user(&self, user: &SessionUser) -> Result<(), StorageError> {
        match self.load().await? {
            Some(cached) => self.save(&cached.token, Some(user)).await,
            None => Ok(()),
        }
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Owns the signed-in user slice.
pub struct SessionService {
    api: Arc<dyn BackendApi>,
    store: TokenStore,
    user: RwLock<Option<SessionUser>>,
}

impl SessionService {
    pub fn new(api: Arc<dyn BackendApi>, store: TokenStore) -> Arc<Self> {
        Arc::new(Self {
            api,
            store,
            user: RwLock::new(None),
        })
    }

    /// Load the stored token and cached user. The caller installs the token
    /// on its transport.
    pub async fn restore(&self) -> Result<Option<SecretString>, StorageError> {
        let Some(cached) = self.store.load().await? else {
            return Ok(None);
        };
        *self.user.write().await = cached.user;
        Ok(Some(cached.token))
    }

    pub async fn save_token(&self, token: &SecretString) -> Result<(), StorageError> {
        let user = self.user.read().await.clone();
        self.store.save(token, user.as_ref()).await
    }

    pub async fn current(&self) -> Option<SessionUser> {
        self.user.read().await.clone()
    }

    pub async fn role(&self) -> Option<Role> {
        self.user.read().await.as_ref().map(|u| u.role)
    }

    /// Re-fetch the session user. An unauthorized response clears the cache.
    pub async fn refresh(&self) -> Result<SessionUser, ApiError> {
        match self.api.fetch_session().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Session refreshed");
                self.persist_user(&user).await;
                *self.user.write().await = Some(user.clone());
                Ok(user)
            }
            Err(ApiError::Unauthorized) => {
                tracing::info!("Session no longer valid, clearing cached user");
                *self.user.write().await = None;
                if let Err(e) = self.store.clear().await {
                    tracing::warn!("Failed to clear token store: {}", e);
                }
                Err(ApiError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    /// Record that the writer's application is now awaiting review.
    pub async fn mark_application_pending(&self) {
        let updated = {
            let mut guard = self.user.write().await;
            match guard.as_mut() {
                Some(user) => {
                    user.application_status = ApplicationStatus::Pending;
                    Some(user.clone())
                }
                None => None,
            }
        };
        if let Some(user) = updated {
            self.persist_user(&user).await;
        }
    }

    pub async fn sign_out(&self) -> Result<(), StorageError> {
        *self.user.write().await = None;
        self.store.clear().await
    }

    async fn persist_user(&self, user: &SessionUser) {
        if let Err(e) = self.store.save_user(user).await {
            tracing::warn!("Failed to persist session user: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockBackend, writer};

    #[tokio::test]
    async fn store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested/session.json"));
        assert!(store.load().await.unwrap().is_none());

        store
            .save(&SecretString::from("tok-1"), Some(&writer("w1")))
            .await
            .unwrap();
        let cached = store.load().await.unwrap().unwrap();
        assert_eq!(cached.token.expose_secret(), "tok-1");
        assert_eq!(cached.user.unwrap().id, "w1");

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_user_without_token_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        store.save_user(&writer("w1")).await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_caches_and_persists_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        store.save(&SecretString::from("tok"), None).await.unwrap();

        let api = Arc::new(MockBackend::default());
        api.set_session(writer("w7"));
        let service = SessionService::new(api, store.clone());

        let token = service.restore().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "tok");
        assert!(service.current().await.is_none());

        service.refresh().await.unwrap();
        assert_eq!(service.role().await, Some(Role::Writer));
        let cached = store.load().await.unwrap().unwrap();
        assert_eq!(cached.user.unwrap().id, "w7");
    }

    #[tokio::test]
    async fn unauthorized_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        store
            .save(&SecretString::from("stale"), Some(&writer("w1")))
            .await
            .unwrap();

        let service = SessionService::new(Arc::new(MockBackend::default()), store.clone());
        service.restore().await.unwrap();
        assert!(service.current().await.is_some());

        let err = service.refresh().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert!(service.current().await.is_none());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_application_pending_updates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.json"));
        store
            .save(&SecretString::from("tok"), Some(&writer("w1")))
            .await
            .unwrap();
        let service = SessionService::new(Arc::new(MockBackend::default()), store.clone());
        service.restore().await.unwrap();

        service.mark_application_pending().await;
        assert_eq!(
            service.current().await.unwrap().application_status,
            ApplicationStatus::Pending
        );
        let cached = store.load().await.unwrap().unwrap();
        assert_eq!(cached.user.unwrap().application_status, ApplicationStatus::Pending);
    }
}

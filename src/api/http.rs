//! reqwest-backed implementation of [`BackendApi`].

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use super::{BackendApi, ProfileUpdate, paths};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::intake::IntakePacket;
use crate::model::{ApplicationReceipt, SessionUser, WriterProfile};
use crate::upload::UploadedFile;

/// HTTP client for the marketplace backend.
pub struct HttpBackend {
    config: ClientConfig,
    client: reqwest::Client,
    token: RwLock<Option<SecretString>>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            token: RwLock::new(None),
        })
    }

    /// Set (or clear) the bearer token sent with every request.
    pub fn set_token(&self, token: Option<SecretString>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = match self.token.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.authorized(builder).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or_default();
            tracing::warn!(status = status.as_u16(), message = %message, "Backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn file_part(file: &UploadedFile) -> Result<Part, ApiError> {
    Part::bytes(file.bytes())
        .file_name(file.display_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ApiError::Network(format!("Invalid MIME type {}: {e}", file.mime_type)))
}

/// Build the multipart form for the application packet.
pub(crate) fn packet_form(packet: &IntakePacket) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in &packet.fields {
        form = form.text(name.clone(), value.clone());
    }
    for attachment in &packet.files {
        form = form.part(attachment.field.to_string(), file_part(&attachment.file)?);
    }
    Ok(form)
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_profile(&self) -> Result<WriterProfile, ApiError> {
        self.send(self.client.get(self.config.url(paths::PROFILE)))
            .await
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<WriterProfile, ApiError> {
        let builder = self.client.put(self.config.url(paths::PROFILE));
        let builder = match update {
            ProfileUpdate::Fields(body) => builder.json(&body),
            ProfileUpdate::Photo(file) => {
                builder.multipart(Form::new().part("photo", file_part(&file)?))
            }
        };
        self.send(builder).await
    }

    async fn submit_application(
        &self,
        packet: IntakePacket,
    ) -> Result<ApplicationReceipt, ApiError> {
        let form = packet_form(&packet)?;
        tracing::info!(
            fields = packet.fields.len(),
            files = packet.files.len(),
            "Submitting application packet"
        );
        self.send(
            self.client
                .post(self.config.url(paths::APPLICATION))
                .multipart(form),
        )
        .await
    }

    async fn fetch_session(&self) -> Result<SessionUser, ApiError> {
        self.send(self.client.get(self.config.url(paths::SESSION)))
            .await
    }
}

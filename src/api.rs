use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;

use crate::config::{ClientConfig, Configuration};
use crate::errors::{Error, Result};
use crate::registration::{
    MultipartPayload, ParentSubmission, ProfileAttachment, RegistrationResponse,
    RegistrationSubmission,
};

/// The one network capability the form controllers need.
///
/// Implementations send `payload` as a multipart POST to `path` and hand back
/// the parsed JSON body whatever the HTTP status was: registration endpoints
/// report their own failures in the body.
#[async_trait]
pub trait RegistrationTransport: Send + Sync {
    async fn post_multipart(&self, path: &str, payload: MultipartPayload) -> Result<Value>;
}

#[async_trait]
impl<T: RegistrationTransport + ?Sized> RegistrationTransport for Arc<T> {
    async fn post_multipart(&self, path: &str, payload: MultipartPayload) -> Result<Value> {
        (**self).post_multipart(path, payload).await
    }
}

/// reqwest-backed client for the registration server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new API client for the server described by `config`.
    ///
    /// No request timeout is configured; a submission waits as long as the
    /// network stack does.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate and register a student without a page around it.
    pub async fn register_student(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<RegistrationResponse> {
        submission.validate()?;
        let body = self
            .post_multipart(&self.config.student_path, submission.into_payload())
            .await?;
        RegistrationResponse::from_value(body)
    }

    pub async fn register_parent(&self, submission: ParentSubmission) -> Result<RegistrationResponse> {
        submission.validate()?;
        let body = self
            .post_multipart(&self.config.parent_path, submission.into_payload())
            .await?;
        RegistrationResponse::from_value(body)
    }

    /// Reserve the next student id ahead of registration.
    pub async fn reserve_student_id(&self) -> Result<String> {
        let url = self.config.url_for(&self.config.reservation_path);
        let resp = self.client.get(&url).send().await?;
        log::debug!("GET {} -> {}", url, resp.status());

        match RegistrationResponse::from_value(Self::read_json(resp).await?)? {
            RegistrationResponse::Success(registered) if !registered.student_id.is_empty() => {
                Ok(registered.student_id)
            }
            RegistrationResponse::Success(_) => Err(Error::UnexpectedResponse(
                "reservation succeeded without a studentId".to_string(),
            )),
            RegistrationResponse::Failure { message } => Err(Error::Rejected(
                message.unwrap_or_else(|| "student id reservation failed".to_string()),
            )),
        }
    }

    /// `true` when the server answers its health probe with a 2xx.
    pub async fn health(&self) -> Result<bool> {
        let url = self.config.url_for(&self.config.health_path);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value> {
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RegistrationTransport for ApiClient {
    async fn post_multipart(&self, path: &str, payload: MultipartPayload) -> Result<Value> {
        let url = self.config.url_for(path);
        log::debug!(
            "POST {} fields={:?} file={}",
            url,
            payload.keys(),
            payload.file.is_some()
        );

        let resp = self
            .client
            .post(&url)
            .multipart(multipart_form(payload))
            .send()
            .await?;
        log::debug!("POST {} -> {}", url, resp.status());

        Self::read_json(resp).await
    }
}

/// Convert the transport-neutral payload into a reqwest multipart form.
///
/// A content type that does not parse as a MIME type is dropped and the file
/// goes out without one, as a browser would send it.
pub fn multipart_form(payload: MultipartPayload) -> Form {
    let mut form = Form::new();
    for (key, value) in payload.fields {
        form = form.text(key, value);
    }
    if let Some((key, file)) = payload.file {
        form = form.part(key, file_part(file));
    }
    form
}

fn file_part(file: ProfileAttachment) -> Part {
    let ProfileAttachment {
        file_name,
        content_type,
        bytes,
    } = file;
    match content_type.filter(|ct| !ct.trim().is_empty()) {
        Some(content_type) => {
            match Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str(&content_type)
            {
                Ok(part) => part,
                Err(e) => {
                    log::debug!("ignoring content type {content_type:?} of {file_name}: {e}");
                    Part::bytes(bytes).file_name(file_name)
                }
            }
        }
        None => Part::bytes(bytes).file_name(file_name),
    }
}

//! Form submissions
//!
//! `SubmittedForm` collects the text fields and file parts of a POST body:
//! multipart, urlencoded or a JSON object of strings. File parts are streamed
//! into spool files of the configured media store. The combined `/private` endpoint then decides
//! what the body is by which fields are present:
//!
//! 1. `Persona` and `Contraseña` both non-empty: a login attempt.
//! 2. `Nombre`, `Tema`, `Descripcion` non-empty and every file part the
//!    storage variant needs: a new episode.
//! 3. Anything else: insufficient data.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use podcast_common::StorageVariant;
use serde_json::Value;
use std::collections::HashMap;
use tracing::error;

use crate::error::ApiError;
use crate::ingest::{EpisodeFiles, MediaStore, UploadWriter, UploadedFile};
use crate::AppState;

pub const FIELD_USER: &str = "Persona";
pub const FIELD_PASSWORD: &str = "Contraseña";
pub const FIELD_NAME: &str = "Nombre";
pub const FIELD_TOPIC: &str = "Tema";
pub const FIELD_DESCRIPTION: &str = "Descripcion";

pub const FILE_PDF: &str = "pdf";
pub const FILE_IMAGE: &str = "imagen";
pub const FILE_AUDIO: &str = "audio";
pub const FILE_DOCUMENT: &str = "Documento";

/// File parts an episode submission must carry for a storage variant
pub fn required_files(variant: StorageVariant) -> &'static [&'static str] {
    match variant {
        StorageVariant::Disk => &[FILE_PDF, FILE_IMAGE, FILE_AUDIO],
        StorageVariant::Inline => &[FILE_DOCUMENT],
    }
}

/// Administrator credential pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

/// Complete episode submission
#[derive(Debug)]
pub struct EpisodeSubmission {
    pub name: String,
    pub topic: String,
    pub description: String,
    pub files: EpisodeFiles,
}

/// What a POST to `/private` turned out to be
#[derive(Debug)]
pub enum PrivateSubmission {
    Login(LoginRequest),
    Episode(EpisodeSubmission),
    Insufficient,
}

/// Text fields and file parts of a POST body
#[derive(Debug, Default)]
pub struct SubmittedForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl SubmittedForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a file part; a part without a filename is treated as absent
    pub fn with_file(mut self, file: UploadedFile) -> Self {
        if !file.file_name.is_empty() {
            self.files.entry(file.field.clone()).or_insert(file);
        }
        self
    }

    /// Non-empty value of a text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Credential pair, when both values are present
    pub fn login(&self) -> Option<LoginRequest> {
        Some(LoginRequest {
            user: self.field(FIELD_USER)?.to_string(),
            password: self.field(FIELD_PASSWORD)?.to_string(),
        })
    }

    /// Episode submission, when every field and file part is present
    pub fn into_episode(mut self, variant: StorageVariant) -> Option<EpisodeSubmission> {
        let name = self.field(FIELD_NAME)?.to_string();
        let topic = self.field(FIELD_TOPIC)?.to_string();
        let description = self.field(FIELD_DESCRIPTION)?.to_string();

        if !required_files(variant).iter().all(|f| self.has_file(f)) {
            return None;
        }

        let files = match variant {
            StorageVariant::Disk => EpisodeFiles::Disk {
                pdf: self.files.remove(FILE_PDF)?,
                image: self.files.remove(FILE_IMAGE)?,
                audio: self.files.remove(FILE_AUDIO)?,
            },
            StorageVariant::Inline => EpisodeFiles::Inline {
                document: self.files.remove(FILE_DOCUMENT)?,
            },
        };

        Some(EpisodeSubmission {
            name,
            topic,
            description,
            files,
        })
    }

    /// Classify the body of the combined endpoint
    ///
    /// A credential pair wins over episode fields.
    pub fn classify(self, variant: StorageVariant) -> PrivateSubmission {
        if let Some(login) = self.login() {
            return PrivateSubmission::Login(login);
        }
        match self.into_episode(variant) {
            Some(episode) => PrivateSubmission::Episode(episode),
            None => PrivateSubmission::Insufficient,
        }
    }

    async fn from_multipart(mut multipart: Multipart, media: &MediaStore) -> Result<Self, ApiError> {
        let mut form = Self::new();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let file_name = field.file_name().map(str::to_string);
            match file_name {
                // No file picked in the browser
                Some(file_name) if file_name.is_empty() => continue,
                Some(file_name) => {
                    media.prepare_spool_dir().await.map_err(spool_failed)?;
                    let mut writer = UploadWriter::create(media.spool_dir(), &name, &file_name)
                        .map_err(spool_failed)?;

                    while let Some(chunk) = field
                        .chunk()
                        .await
                        .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?
                    {
                        writer.write(&chunk).await.map_err(spool_failed)?;
                    }

                    form = form.with_file(writer.finish().await.map_err(spool_failed)?);
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
                    form.fields.entry(name).or_insert(value);
                }
            }
        }

        Ok(form)
    }

    /// String members of a JSON object; any other JSON value has no fields
    fn from_json(value: Value) -> Self {
        let fields = match value {
            Value::Object(members) => members
                .into_iter()
                .filter_map(|(name, value)| match value {
                    Value::String(text) => Some((name, text)),
                    _ => None,
                })
                .collect(),
            _ => HashMap::new(),
        };

        Self {
            fields,
            files: HashMap::new(),
        }
    }
}

fn spool_failed(e: podcast_common::Error) -> ApiError {
    error!("Failed to spool uploaded file: {}", e);
    ApiError::Internal("Failed to store uploaded media".to_string())
}

#[async_trait]
impl FromRequest<AppState> for SubmittedForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
            return Self::from_multipart(multipart, &state.media).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
            return Ok(Self {
                fields,
                files: HashMap::new(),
            });
        }

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
            return Ok(Self::from_json(value));
        }

        // No recognizable body: every field is absent
        Ok(Self::new())
    }
}

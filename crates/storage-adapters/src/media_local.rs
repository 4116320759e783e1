//! Local filesystem implementation of `MediaStore`.
//!
//! Uploads are content-addressed: the SHA-256 of the bytes names the file,
//! sharded two levels deep, so re-uploading the same photo is a no-op.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use domains::{DomainError, MediaStore};
use mime::Mime;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

/// Uploads above this size are rejected.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

const ACCEPTED_SUBTYPES: &[&str] = &["jpeg", "jpg", "png", "gif"];

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g. "./data/uploads").
    root_path: PathBuf,
    /// Public path prefix stored alongside records (e.g. "uploads").
    url_prefix: String,
    max_bytes: usize,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root_path: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_owned(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// "ab/cd/abcdef....png"
    fn relative_path(hash: &str, extension: &str) -> String {
        format!("{}/{}/{hash}.{extension}", &hash[0..2], &hash[2..4])
    }

    fn check(&self, data: &Bytes, content_type: &Mime) -> Result<(), DomainError> {
        if content_type.type_() != mime::IMAGE
            || !ACCEPTED_SUBTYPES.contains(&content_type.subtype().as_str())
        {
            return Err(DomainError::Validation(
                "only images (jpeg, jpg, png, gif) are allowed".into(),
            ));
        }
        if data.is_empty() {
            return Err(DomainError::Validation("uploaded file is empty".into()));
        }
        if data.len() > self.max_bytes {
            return Err(DomainError::Validation(format!(
                "uploaded file exceeds {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }
}

fn extension_for(content_type: &Mime, file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| ACCEPTED_SUBTYPES.contains(&e.as_str()))
        .or_else(|| {
            mime_guess::get_mime_extensions(content_type)
                .and_then(|exts| exts.first())
                .map(|e| (*e).to_owned())
        })
        .unwrap_or_else(|| "bin".to_owned())
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save_upload(
        &self,
        data: Bytes,
        content_type: Mime,
        file_name: Option<String>,
    ) -> Result<String, DomainError> {
        self.check(&data, &content_type)?;

        let hash = hex::encode(Sha256::digest(&data));
        let relative = Self::relative_path(&hash, &extension_for(&content_type, file_name.as_deref()));
        let target = self.root_path.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(e.to_string()))?;
        }
        if fs::try_exists(&target).await.unwrap_or(false) {
            debug!(%relative, "upload already stored");
        } else {
            fs::write(&target, &data)
                .await
                .map_err(|e| DomainError::Storage(e.to_string()))?;
            debug!(%relative, bytes = data.len(), "upload stored");
        }

        Ok(format!("{}/{relative}", self.url_prefix))
    }
}

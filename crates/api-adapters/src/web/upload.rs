//! Multipart bodies of the upload endpoints.
//!
//! A form is read completely before anything is stored, so handlers can
//! validate and authorize first and only then hand files to the
//! [`MediaStore`].

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use domains::MediaStore;
use mime::Mime;

use super::ApiError;

#[derive(Debug)]
pub struct Upload {
    pub data: Bytes,
    pub content_type: Mime,
    pub file_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<Upload>>,
}

impl UploadForm {
    /// Reads every part. Parts named in `file_fields` are kept as files
    /// (empty ones dropped); everything else is read as text.
    pub async fn read(multipart: &mut Multipart, file_fields: &[&str]) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            if file_fields.contains(&name.as_str()) {
                let content_type = field
                    .content_type()
                    .and_then(|ct| ct.parse::<Mime>().ok())
                    .unwrap_or(mime::APPLICATION_OCTET_STREAM);
                let file_name = field.file_name().map(str::to_owned);
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.files.entry(name).or_default().push(Upload {
                        data,
                        content_type,
                        file_name,
                    });
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// First non-blank value among `names`.
    pub fn text(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|value| !value.trim().is_empty())
            .map(|value| value.trim().to_owned())
    }

    pub fn file_count(&self, name: &str) -> usize {
        self.files.get(name).map_or(0, Vec::len)
    }

    pub fn take_files(&mut self, name: &str) -> Vec<Upload> {
        self.files.remove(name).unwrap_or_default()
    }
}

/// Stores `uploads` in order and returns their paths.
pub async fn store_all(
    media: &dyn MediaStore,
    uploads: Vec<Upload>,
) -> Result<Vec<String>, ApiError> {
    let mut paths = Vec::with_capacity(uploads.len());
    for upload in uploads {
        paths.push(
            media
                .save_upload(upload.data, upload.content_type, upload.file_name)
                .await?,
        );
    }
    Ok(paths)
}

//! Reading `multipart/form-data` uploads

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use std::collections::HashMap;

use rv_core::services::UploadedFile;

use super::error::ApiError;

/// Name of the multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Parsed multipart form: the uploaded file and the plain text fields
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

fn multipart_error(error: actix_multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart body: {}", error))
}

/// Longest accepted text field
pub const MAX_TEXT_FIELD_SIZE: usize = 1024;

/// Most text fields kept from one form
pub const MAX_TEXT_FIELDS: usize = 16;

fn too_large() -> ApiError {
    ApiError::PayloadTooLarge("File too large".to_string())
}

/// Streams one part, charging every byte to `budget`; only `keep` parts are buffered
async fn read_field(
    field: &mut Field,
    limit: usize,
    budget: &mut usize,
    keep: bool,
) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    let mut read = 0usize;
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        read += chunk.len();
        *budget = budget.checked_sub(chunk.len()).ok_or_else(too_large)?;
        if !keep {
            continue;
        }
        if read > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Drain a multipart body, keeping the first `file` part
///
/// The whole body may carry at most `max_size` bytes, else 413. Text fields
/// are capped at [`MAX_TEXT_FIELD_SIZE`] bytes and [`MAX_TEXT_FIELDS`] entries;
/// other parts are read through without being kept.
pub async fn read_form(mut payload: Multipart, max_size: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    let mut budget = max_size;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        match file_name {
            Some(file_name) if name == FILE_FIELD && form.file.is_none() => {
                let bytes = read_field(&mut field, max_size, &mut budget, true).await?;
                if bytes.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(_) => {
                read_field(&mut field, 0, &mut budget, false).await?;
            }
            None => {
                if form.fields.len() >= MAX_TEXT_FIELDS && !form.fields.contains_key(&name) {
                    return Err(ApiError::BadRequest("Too many form fields".to_string()));
                }
                let bytes = read_field(&mut field, MAX_TEXT_FIELD_SIZE, &mut budget, true).await?;
                let value = String::from_utf8(bytes).map_err(|_| {
                    ApiError::BadRequest(format!("Field {} is not valid UTF-8", name))
                })?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

use serde::Deserialize;

use crate::core::library::UploadType;
use crate::error_handler::AppResult;

/// `?upload_type=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct UploadTypeQuery {
    #[serde(default)]
    pub upload_type: Option<String>,
}

impl UploadTypeQuery {
    /// Parsed value, `default` when absent.
    pub fn resolve(&self, default: UploadType) -> AppResult<UploadType> {
        match self.upload_type.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(default),
        }
    }
}

//! Multipart HTTP uploader.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use ureq::Agent;
use vaultpub_config::UploaderConfig;
use vaultpub_core::{UploadError, Uploader};

use crate::error::HttpUploadError;
use crate::multipart::{content_type_for, file_body, new_boundary};

/// Uploads images to an HTTP endpoint.
pub struct HttpUploader {
    agent: Agent,
    endpoint: String,
    authorization: Option<String>,
    field_name: String,
    url_pointer: String,
}

impl HttpUploader {
    /// Create an uploader from the `[uploader]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`HttpUploadError::MissingEndpoint`] if no endpoint is set.
    pub fn from_config(config: &UploaderConfig) -> Result<Self, HttpUploadError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or(HttpUploadError::MissingEndpoint)?;

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            endpoint: endpoint.to_owned(),
            authorization: config.authorization.clone(),
            field_name: config.field_name.clone(),
            url_pointer: config.url_pointer.clone(),
        })
    }

    /// POST one file and return the URL from the response.
    fn post(&self, data: &[u8], filename: &str) -> Result<String, HttpUploadError> {
        let boundary = new_boundary();
        let body = file_body(
            &boundary,
            &self.field_name,
            filename,
            content_type_for(filename),
            data,
        );

        debug!(endpoint = %self.endpoint, filename, size = data.len(), "Posting image");

        let mut request = self
            .agent
            .post(&self.endpoint)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("Accept", "application/json");
        if let Some(auth) = &self.authorization {
            request = request.header("Authorization", auth);
        }
        let response = request.send(&body[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(HttpUploadError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let response_body = body_reader.read_to_string()?;
        extract_url(&response_body, &self.url_pointer)
    }
}

impl Uploader for HttpUploader {
    fn upload(
        &self,
        data: &[u8],
        filename: &str,
        original_path: &Path,
    ) -> Result<String, UploadError> {
        let url = self.post(data, filename)?;
        info!(path = %original_path.display(), %url, "Upload accepted");
        Ok(url)
    }
}

/// Read the string at `pointer` from a JSON response body.
fn extract_url(body: &str, pointer: &str) -> Result<String, HttpUploadError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    value
        .pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| HttpUploadError::MissingUrl {
            pointer: pointer.to_owned(),
            body: body.to_owned(),
        })
}

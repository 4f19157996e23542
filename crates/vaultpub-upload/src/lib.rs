//! HTTP upload transport for vaultpub.
//!
//! [`HttpUploader`] implements [`vaultpub_core::Uploader`] by POSTing each
//! image as `multipart/form-data` to a configured endpoint and reading the
//! public URL out of the JSON response with a JSON pointer. This matches
//! image hosts such as Imgur, whose response looks like:
//!
//! ```json
//! { "data": { "link": "https://i.imgur.com/abc.png" }, "success": true }
//! ```

mod client;
mod error;
mod multipart;

pub use client::HttpUploader;
pub use error::HttpUploadError;

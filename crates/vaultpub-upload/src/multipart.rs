//! `multipart/form-data` request bodies.

use rand::RngExt;

/// Random boundary unlikely to occur inside image data.
pub(crate) fn new_boundary() -> String {
    format!("----VaultpubFormBoundary{:016x}", rand::rng().random::<u64>())
}

/// Build a body with a single file part.
pub(crate) fn file_body(
    boundary: &str,
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{}\"\r\n",
            escape_quotes(filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// MIME type for an image file name.
pub(crate) fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_file_body_layout() {
        let body = file_body("XYZ", "image", "pic.png", "image/png", b"\x89PNG");

        let mut expected = Vec::new();
        expected.extend_from_slice(b"--XYZ\r\n");
        expected.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"pic.png\"\r\n",
        );
        expected.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        expected.extend_from_slice(b"\x89PNG\r\n--XYZ--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_file_body_escapes_quotes_in_filename() {
        let body = file_body("B", "file", "a\"b.png", "image/png", b"");
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("filename=\"a%22b.png\""));
    }

    #[test]
    fn test_new_boundary_is_random() {
        let a = new_boundary();
        let b = new_boundary();

        assert!(a.starts_with("----VaultpubFormBoundary"));
        assert_eq!(a.len(), "----VaultpubFormBoundary".len() + 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.gif"), "image/gif");
        assert_eq!(content_type_for("a.svg"), "image/svg+xml");
        assert_eq!(content_type_for("Sketch.excalidraw.png"), "image/png");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use thiserror::Error;

const MB: u64 = 1024 * 1024;

/// Client-side upload gates. A file that fails its gate never reaches the
/// network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    PassportPhoto,
    Receipt,
    CsvImport,
}

impl AttachmentKind {
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PassportPhoto => &["jpeg", "jpg", "png", "gif"],
            Self::Receipt => &["jpeg", "jpg", "png", "gif", "pdf"],
            Self::CsvImport => &["csv"],
        }
    }

    pub fn max_bytes(&self) -> u64 {
        match self {
            Self::PassportPhoto => 5 * MB,
            Self::Receipt => 10 * MB,
            Self::CsvImport => 50 * MB,
        }
    }

    /// Form field name the backend expects for this part.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::PassportPhoto => "photo",
            Self::Receipt => "receipt",
            Self::CsvImport => "file",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type .{extension}; allowed: {allowed}")]
    UnsupportedType { extension: String, allowed: String },
    #[error("file is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Pure gate used by [`Attachment::load`] and directly by tests: checks
    /// the extension whitelist and size ceiling for a kind.
    pub fn check(kind: AttachmentKind, file_name: &str, size: u64) -> Result<(), UploadError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !kind.allowed_extensions().contains(&extension.as_str()) {
            return Err(UploadError::UnsupportedType {
                extension,
                allowed: kind.allowed_extensions().join(", "),
            });
        }
        if size > kind.max_bytes() {
            return Err(UploadError::TooLarge {
                size,
                limit: kind.max_bytes(),
            });
        }
        Ok(())
    }

    pub fn load(kind: AttachmentKind, path: &Path) -> Result<Self, UploadError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = std::fs::metadata(path)?.len();
        Self::check(kind, &file_name, size)?;

        let data = std::fs::read(path)?;
        Ok(Self {
            field: kind.field_name().to_string(),
            content_type: content_type_for(&file_name),
            file_name,
            data,
        })
    }
}

fn content_type_for(file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Assemble a multipart/form-data body. The boundary is derived from the
/// part contents, which keeps the builder deterministic for identical input.
pub fn multipart_body(parts: &[Attachment]) -> (String, Vec<u8>) {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.file_name.hash(&mut hasher);
        part.data.hash(&mut hasher);
    }
    let boundary = format!("----tindigwa-{:016x}", hasher.finish());

    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let content_type = format!("multipart/form-data; boundary={boundary}");
    (content_type, body)
}

#[cfg(test)]
mod tests {
    use super::{Attachment, AttachmentKind, UploadError, multipart_body};

    #[test]
    fn photo_rejects_non_image_extensions() {
        let result = Attachment::check(AttachmentKind::PassportPhoto, "portrait.bmp", 1024);
        assert!(matches!(result, Err(UploadError::UnsupportedType { .. })));
    }

    #[test]
    fn photo_rejects_files_over_five_megabytes() {
        let result =
            Attachment::check(AttachmentKind::PassportPhoto, "portrait.jpg", 6 * 1024 * 1024);
        assert!(matches!(result, Err(UploadError::TooLarge { .. })));
    }

    #[test]
    fn receipt_allows_pdf_up_to_ten_megabytes() {
        assert!(Attachment::check(AttachmentKind::Receipt, "scan.pdf", 10 * 1024 * 1024).is_ok());
    }

    #[test]
    fn csv_import_allows_large_files() {
        assert!(Attachment::check(AttachmentKind::CsvImport, "bulk.csv", 49 * 1024 * 1024).is_ok());
        assert!(Attachment::check(AttachmentKind::CsvImport, "bulk.csv", 51 * 1024 * 1024).is_err());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(Attachment::check(AttachmentKind::PassportPhoto, "me.JPG", 1024).is_ok());
    }

    #[test]
    fn multipart_body_carries_each_part_and_terminator() {
        let part = Attachment {
            field: "photo".to_string(),
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        let (content_type, body) = multipart_body(&[part]);
        let text = String::from_utf8_lossy(&body);
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(text.contains("name=\"photo\"; filename=\"me.png\""));
        assert!(text.contains("Content-Type: image/png"));
        assert!(text.trim_end().ends_with("--"));
    }
}

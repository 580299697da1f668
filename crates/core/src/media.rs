//! MediaContent upload rules.
//!
//! The handler collects multipart fields into [`MediaUploadForm`]; this
//! module turns it into validated [`MediaMetadata`] without touching the
//! blob store or the database.

use crate::error::CoreError;
use crate::validation::FieldViolation;

/// Default declared width/height when the client does not send one.
pub const DEFAULT_ORIGINAL_DIMENSION: i32 = 100;

/// Default alt text.
pub const DEFAULT_ALT: &str = "Image Description";

/// Maximum alt text length (characters).
pub const MAX_ALT_LEN: usize = 128;

/// Accepted image file extensions.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Raw multipart fields of an upload, as received.
#[derive(Debug, Clone, Default)]
pub struct MediaUploadForm {
    pub file_name: Option<String>,
    pub file_len: usize,
    pub original_width: Option<String>,
    pub original_height: Option<String>,
    pub alt: Option<String>,
}

/// Validated metadata stored next to the blob reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    pub file_name: String,
    pub extension: String,
    pub original_width: i32,
    pub original_height: i32,
    pub alt: String,
}

impl MediaUploadForm {
    /// Validate every field and report all violations together.
    pub fn validate(self, max_bytes: usize) -> Result<MediaMetadata, CoreError> {
        let mut violations = Vec::new();

        let (file_name, extension) = match self.file_name {
            None => {
                violations.push(FieldViolation::new("file", "This field is required"));
                (String::new(), String::new())
            }
            Some(name) => {
                let extension = name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_lowercase())
                    .unwrap_or_default();
                if !SUPPORTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                    violations.push(FieldViolation::new(
                        "file",
                        format!(
                            "Unsupported image format '.{extension}'. Supported: {}",
                            SUPPORTED_IMAGE_EXTENSIONS.join(", ")
                        ),
                    ));
                } else if self.file_len == 0 {
                    violations.push(FieldViolation::new("file", "File is empty"));
                } else if self.file_len > max_bytes {
                    violations.push(FieldViolation::new(
                        "file",
                        format!("File exceeds the {max_bytes} byte upload limit"),
                    ));
                }
                (name, extension)
            }
        };

        let original_width = parse_dimension("originalWidth", self.original_width, &mut violations);
        let original_height =
            parse_dimension("originalHeight", self.original_height, &mut violations);

        let alt = self.alt.unwrap_or_else(|| DEFAULT_ALT.to_string());
        if alt.chars().count() > MAX_ALT_LEN {
            violations.push(FieldViolation::new(
                "alt",
                format!("Must be at most {MAX_ALT_LEN} characters"),
            ));
        }

        if !violations.is_empty() {
            return Err(CoreError::InvalidFields(violations));
        }

        Ok(MediaMetadata {
            file_name,
            extension,
            original_width,
            original_height,
            alt,
        })
    }
}

fn parse_dimension(
    field: &str,
    raw: Option<String>,
    violations: &mut Vec<FieldViolation>,
) -> i32 {
    match raw.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_ORIGINAL_DIMENSION,
        Some(s) => match s.parse::<i32>() {
            Ok(n) if n > 0 => n,
            _ => {
                violations.push(FieldViolation::new(field, "Must be a positive integer"));
                DEFAULT_ORIGINAL_DIMENSION
            }
        },
    }
}

//! Place image uploads: filename sanitising and the extension allow-list.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Extensions accepted for place images (lower-case, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// URL prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Validation errors for uploaded filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadValidationError {
    /// Nothing usable remained after sanitising.
    EmptyFilename,
    /// Extension outside [`ALLOWED_IMAGE_EXTENSIONS`].
    DisallowedExtension {
        /// Extension as submitted, possibly empty.
        extension: String,
    },
}

impl fmt::Display for UploadValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFilename => write!(f, "image filename is empty after sanitising"),
            Self::DisallowedExtension { extension } => write!(
                f,
                "image extension '{extension}' is not one of {}",
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            ),
        }
    }
}

impl std::error::Error for UploadValidationError {}

static UNSAFE_CHARS_RE: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars_regex() -> &'static Regex {
    UNSAFE_CHARS_RE.get_or_init(|| {
        Regex::new(r"[^A-Za-z0-9_.-]")
            .unwrap_or_else(|error| panic!("filename regex failed to compile: {error}"))
    })
}

/// Flatten a client-supplied filename into a safe single path component.
///
/// Non-ASCII characters are dropped, path separators and whitespace runs
/// become `_`, anything outside `[A-Za-z0-9._-]` is removed, and leading or
/// trailing dots and underscores are stripped.
///
/// # Examples
/// ```
/// use cuceifoods::domain::sanitise_filename;
///
/// assert_eq!(sanitise_filename("../../etc/passwd"), "etc_passwd");
/// assert_eq!(sanitise_filename("mi foto café.png"), "mi_foto_caf.png");
/// ```
#[must_use]
pub fn sanitise_filename(raw: &str) -> String {
    let ascii: String = raw
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars_regex().replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_owned()
}

/// Sanitised filename with an allowed image extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadFilename(String);

impl UploadFilename {
    /// Sanitise and validate a client-supplied filename.
    pub fn from_client(raw: &str) -> Result<Self, UploadValidationError> {
        let sanitised = sanitise_filename(raw);
        if sanitised.is_empty() {
            return Err(UploadValidationError::EmptyFilename);
        }
        let extension = sanitised
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadValidationError::DisallowedExtension { extension });
        }
        Ok(Self(sanitised))
    }

    /// Accept a name from a request path only if it is already sanitary.
    #[must_use]
    pub fn from_stored(raw: &str) -> Option<Self> {
        Self::from_client(raw)
            .ok()
            .filter(|candidate| candidate.0 == raw)
    }

    /// Extension without the dot, as written.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.0.rsplit_once('.').map_or("", |(_, extension)| extension)
    }

    /// MIME type derived from the extension.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self.extension().to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "gif" => "image/gif",
            _ => "image/jpeg",
        }
    }

    /// Public URL under which the stored image is served.
    #[must_use]
    pub fn public_url(&self) -> String {
        format!("{UPLOADS_URL_PREFIX}/{}", self.0)
    }
}

impl AsRef<str> for UploadFilename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Uploaded image awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Sanitised filename.
    pub filename: UploadFilename,
    /// File contents.
    pub bytes: Vec<u8>,
}

pub mod parent;
pub mod response;
pub mod student;

pub use parent::{ChildLink, ParentSubmission};
pub use response::{Registered, RegistrationResponse};
pub use student::{RegistrationSubmission, StudentId};

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

/// Multipart key the optional profile picture travels under.
pub const PROFILE_FIELD: &str = "profile";

/// Trims a control value the way the page's own script does, which also
/// strips the byte order mark.
pub(crate) fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Client-side rejection of a form. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Please fill required fields.")]
    MissingRequired,
    #[error("Please enter a valid email address or leave it empty.")]
    InvalidEmail,
    #[error("Please fill all parent details")]
    MissingParentDetails,
    #[error("Please fill all student fields")]
    IncompleteChild,
    #[error("Duplicate Student ID detected")]
    DuplicateStudent(String),
}

/// A file picked in a form's file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAttachment {
    pub file_name: String,
    /// MIME type reported by the picker, e.g. `image/png`.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ProfileAttachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Transport-neutral multipart body: text parts in append order, then at
/// most one file part. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, ProfileAttachment)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn attach(&mut self, key: impl Into<String>, file: ProfileAttachment) {
        self.file = Some((key.into(), file));
    }

    /// First text value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every text value under `key`, in append order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn has_file(&self, key: &str) -> bool {
        matches!(&self.file, Some((k, _)) if k == key)
    }
}

use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use super::{
    MultipartPayload, PROFILE_FIELD, ProfileAttachment, ValidationError, trim_value,
};
use crate::page::{ElementId, FormElement};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").unwrap()
});

/// `local@domain.tld` shape check. Anything stricter is the server's call.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// One student registration, built from the form at submit time.
///
/// There is no username field: the server assigns the student id and uses it
/// as the login name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSubmission {
    pub name: String,
    pub password: String,
    pub grade: String,
    pub section: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub profile: Option<ProfileAttachment>,
}

impl RegistrationSubmission {
    /// Reads the controls of a student form.
    ///
    /// `name`, `email` and `phone` are trimmed. The password and the selection
    /// values are taken as they are. Missing controls read as empty.
    pub fn from_form(form: &impl FormElement) -> Self {
        let raw = |id| form.value(id).unwrap_or_default();
        let trimmed = |id| trim_value(&raw(id)).to_string();

        Self {
            name: trimmed(ElementId::Name),
            password: raw(ElementId::Password),
            grade: raw(ElementId::Grade),
            section: raw(ElementId::Section),
            email: trimmed(ElementId::Email),
            phone: trimmed(ElementId::Phone),
            dob: raw(ElementId::Dob),
            gender: raw(ElementId::Gender),
            profile: form.file(ElementId::ProfileImage),
        }
    }

    /// Required fields first, then the email shape. Stops at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [&self.name, &self.password, &self.grade, &self.section];
        if required.iter().any(|v| v.is_empty()) {
            return Err(ValidationError::MissingRequired);
        }
        if !self.email.is_empty() && !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// All eight text parts are always present, empty optional ones included.
    pub fn into_payload(self) -> MultipartPayload {
        let mut payload = MultipartPayload::new();
        payload.append("name", self.name);
        payload.append("password", self.password);
        payload.append("grade", self.grade);
        payload.append("section", self.section);
        payload.append("email", self.email);
        payload.append("phone", self.phone);
        payload.append("dob", self.dob);
        payload.append("gender", self.gender);
        if let Some(file) = self.profile {
            payload.attach(PROFILE_FIELD, file);
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStudentIdError {
    #[error("student id must look like GES_<sequence>_<YY>, got {0:?}")]
    Shape(String),
    #[error("invalid sequence number in {0:?}")]
    Sequence(String),
    #[error("invalid year suffix in {0:?}")]
    Year(String),
}

/// Server-assigned identifier, `GES_<sequence>_<YY>` (e.g. `GES_0001_26`).
///
/// A parsed id keeps the digit count of its sequence, so it displays exactly
/// as the server wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId {
    sequence: u32,
    year_suffix: u8,
    width: usize,
}

impl StudentId {
    pub const PREFIX: &'static str = "GES";
    const SEQUENCE_WIDTH: usize = 4;

    /// Sequence zero-padded to four digits, year reduced to two.
    pub fn new(sequence: u32, year_suffix: u8) -> Self {
        Self {
            sequence,
            year_suffix: year_suffix % 100,
            width: Self::SEQUENCE_WIDTH,
        }
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn year_suffix(&self) -> u8 {
        self.year_suffix
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{:0width$}_{:02}",
            Self::PREFIX,
            self.sequence,
            self.year_suffix,
            width = self.width
        )
    }
}

impl FromStr for StudentId {
    type Err = ParseStudentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('_');
        let (Some(prefix), Some(seq), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseStudentIdError::Shape(s.to_string()));
        };
        if prefix != Self::PREFIX {
            return Err(ParseStudentIdError::Shape(s.to_string()));
        }
        if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStudentIdError::Sequence(s.to_string()));
        }
        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStudentIdError::Year(s.to_string()));
        }
        let sequence = seq
            .parse()
            .map_err(|_| ParseStudentIdError::Sequence(s.to_string()))?;
        let year_suffix = year
            .parse()
            .map_err(|_| ParseStudentIdError::Year(s.to_string()))?;
        Ok(Self {
            sequence,
            year_suffix,
            width: seq.len(),
        })
    }
}

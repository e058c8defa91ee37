//! Submit handlers for the registration pages.

pub mod parent;
pub mod student;

pub use parent::ParentFormController;
pub use student::{RegistrationFormController, render_success};

use serde_derive::{Deserialize, Serialize};

use crate::registration::{Registered, ValidationError};

pub const REGISTRATION_FAILED: &str = "Registration failed.";
pub const SERVER_ERROR: &str = "Server error. Check console for details.";

/// What a single submit did. The page has already been updated by the time
/// this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// Rejected client-side, nothing was sent.
    Invalid(ValidationError),
    Registered(Registered),
    /// The server answered with a falsy `success`; holds the text shown.
    Rejected(String),
    /// The request or the body parse failed.
    ServerError(String),
}

impl SubmitOutcome {
    /// Whether a request went out for this submission.
    pub fn reached_server(&self) -> bool {
        !matches!(self, SubmitOutcome::Invalid(_))
    }
}

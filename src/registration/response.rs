use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, Result};

/// Body of a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    /// Server-assigned id, also the student's login name. Empty when the
    /// server left it out.
    pub student_id: String,
    pub username: Option<String>,
    pub profile_image: Option<String>,
    pub parent_id: Option<String>,
    pub parent_user_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationResponse {
    Success(Registered),
    Failure { message: Option<String> },
}

impl RegistrationResponse {
    /// Interprets a registration endpoint's JSON body.
    ///
    /// `success` follows JavaScript truthiness, since that is how the server's
    /// own pages read it. Only a top-level object is accepted; anything else
    /// is an [`Error::UnexpectedResponse`].
    pub fn from_value(value: Value) -> Result<Self> {
        let body = match value {
            Value::Object(body) => body,
            other => {
                return Err(Error::UnexpectedResponse(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };
        let field = |key: &str| body.get(key).and_then(as_text);

        if body.get("success").is_some_and(is_truthy) {
            Ok(RegistrationResponse::Success(Registered {
                student_id: field("studentId").unwrap_or_default(),
                username: field("username"),
                profile_image: field("profileImage"),
                parent_id: field("parentId"),
                parent_user_id: field("parentUserId"),
                message: field("message"),
            }))
        } else {
            Ok(RegistrationResponse::Failure {
                message: field("message"),
            })
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationResponse::Success(_))
    }
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Non-empty strings and numbers render as text; everything else is absent.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

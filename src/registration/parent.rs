use serde_derive::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    MultipartPayload, PROFILE_FIELD, ProfileAttachment, ValidationError, trim_value,
};
use crate::page::{ElementId, FormElement, RowClass};

/// One child row of the parent form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    pub student_id: String,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSubmission {
    pub name: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub children: Vec<ChildLink>,
    pub profile: Option<ProfileAttachment>,
}

impl ParentSubmission {
    /// Every text control is trimmed, password included. Rows are paired by
    /// position; a row without a relationship control reads as empty.
    pub fn from_form(form: &impl FormElement) -> Self {
        let trimmed = |id| trim_value(&form.value(id).unwrap_or_default()).to_string();
        let relationships = form.row_values(RowClass::Relationship);
        let children = form
            .row_values(RowClass::StudentId)
            .into_iter()
            .enumerate()
            .map(|(i, student_id)| ChildLink {
                student_id: trim_value(&student_id).to_string(),
                relationship: relationships.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        Self {
            name: trimmed(ElementId::Name),
            phone: trimmed(ElementId::Phone),
            username: trimmed(ElementId::Username),
            password: trimmed(ElementId::Password),
            children,
            profile: form.file(ElementId::Profile),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let details = [&self.name, &self.phone, &self.username, &self.password];
        if details.iter().any(|v| v.is_empty()) {
            return Err(ValidationError::MissingParentDetails);
        }

        let mut seen = HashSet::new();
        for child in &self.children {
            if child.student_id.is_empty() || child.relationship.is_empty() {
                return Err(ValidationError::IncompleteChild);
            }
            if !seen.insert(child.student_id.as_str()) {
                return Err(ValidationError::DuplicateStudent(child.student_id.clone()));
            }
        }
        Ok(())
    }

    pub fn into_payload(self) -> MultipartPayload {
        let mut payload = MultipartPayload::new();
        payload.append("name", self.name);
        payload.append("phone", self.phone);
        payload.append("username", self.username);
        payload.append("password", self.password);
        for child in self.children {
            payload.append("studentId", child.student_id);
            payload.append("relationship", child.relationship);
        }
        if let Some(file) = self.profile {
            payload.attach(PROFILE_FIELD, file);
        }
        payload
    }
}

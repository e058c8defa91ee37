//! The host page as seen by the form controllers.
//!
//! Controllers never reach for a global document. They are handed a form, an
//! optional result container and a notifier, all behind the traits below, so
//! the same controller runs against a browser binding, a native front end or
//! a test double.

use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::registration::ProfileAttachment;

/// Element identifiers the host page must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementId {
    StudentForm,
    ParentForm,
    Result,
    Name,
    Password,
    Grade,
    Section,
    Email,
    Phone,
    Dob,
    Gender,
    /// File input on the student form.
    ProfileImage,
    Username,
    /// File input on the parent form.
    Profile,
}

impl ElementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::StudentForm => "studentForm",
            ElementId::ParentForm => "parentForm",
            ElementId::Result => "result",
            ElementId::Name => "name",
            ElementId::Password => "password",
            ElementId::Grade => "grade",
            ElementId::Section => "section",
            ElementId::Email => "email",
            ElementId::Phone => "phone",
            ElementId::Dob => "dob",
            ElementId::Gender => "gender",
            ElementId::ProfileImage => "profileImage",
            ElementId::Username => "username",
            ElementId::Profile => "profile",
        }
    }
}

/// Repeated controls, one per row of the parent form's children list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowClass {
    StudentId,
    Relationship,
}

impl RowClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowClass::StudentId => "studentId",
            RowClass::Relationship => "relationship",
        }
    }
}

/// A form element and the controls inside it.
pub trait FormElement {
    /// Raw value of the control, `None` when the page has no such control.
    fn value(&self, id: ElementId) -> Option<String>;

    /// First file chosen in a file input, if any.
    fn file(&self, id: ElementId) -> Option<ProfileAttachment>;

    /// Values of every control carrying `class`, in document order.
    fn row_values(&self, class: RowClass) -> Vec<String>;

    /// Return every control to its initial (empty) state.
    fn reset(&self);
}

/// The container success messages are rendered into.
pub trait ResultContainer {
    fn clear(&self);
    fn set_html(&self, html: &str);
}

/// One-shot user notification. Every failed submission produces exactly one.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Element lookup on the host page.
pub trait Page {
    type Form: FormElement;
    type Result: ResultContainer;

    fn form(&self, id: ElementId) -> Option<Self::Form>;
    fn result_container(&self, id: ElementId) -> Option<Self::Result>;
}

/// Values of a form captured at submit time.
///
/// Hosts that cannot hand out live element handles (a UI thread talking to
/// [`crate::services::RegistrationService`], for instance) copy the controls
/// into a snapshot and submit that instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    values: HashMap<ElementId, String>,
    rows: HashMap<RowClass, Vec<String>>,
    files: HashMap<ElementId, ProfileAttachment>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: ElementId, value: impl Into<String>) -> Self {
        self.values.insert(id, value.into());
        self
    }

    pub fn with_file(mut self, id: ElementId, file: ProfileAttachment) -> Self {
        self.files.insert(id, file);
        self
    }

    /// Append one children row (parent form).
    pub fn with_row(mut self, student_id: impl Into<String>, relationship: impl Into<String>) -> Self {
        self.rows
            .entry(RowClass::StudentId)
            .or_default()
            .push(student_id.into());
        self.rows
            .entry(RowClass::Relationship)
            .or_default()
            .push(relationship.into());
        self
    }
}

impl FormElement for FormSnapshot {
    fn value(&self, id: ElementId) -> Option<String> {
        self.values.get(&id).cloned()
    }

    fn file(&self, id: ElementId) -> Option<ProfileAttachment> {
        self.files.get(&id).cloned()
    }

    fn row_values(&self, class: RowClass) -> Vec<String> {
        self.rows.get(&class).cloned().unwrap_or_default()
    }

    // a snapshot has nothing on screen to reset
    fn reset(&self) {}
}

//! Client side of the school registration pages.
//!
//! [`client::RegistrationFormController`] validates a student registration
//! form, posts it as multipart to `/register/student` and puts the outcome
//! back on the page. The page, the notifier and the HTTP transport are all
//! handed in, see [`page`] and [`api::RegistrationTransport`].

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod page;
pub mod registration;
pub mod services;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, RegistrationTransport};
pub use client::{ParentFormController, RegistrationFormController, SubmitOutcome};
pub use config::{ClientConfig, Configuration};
pub use errors::{Error, Result};
pub use services::{RegistrationCmd, RegistrationService, RegistrationUiCmd};

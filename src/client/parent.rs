use crate::api::RegistrationTransport;
use crate::client::{REGISTRATION_FAILED, SubmitOutcome};
use crate::config::PARENT_REGISTRATION_PATH;
use crate::errors::Result;
use crate::page::{ElementId, FormElement, Notifier, Page};
use crate::registration::{ParentSubmission, RegistrationResponse};

pub const PARENT_REGISTERED: &str = "Parent registered successfully";
pub const PARENT_TRANSPORT_FAILED: &str = "Registration failed. Try again.";

/// Submit handler of the parent registration page.
///
/// Unlike the student page there is no result container: every outcome,
/// success included, is announced through the notifier.
pub struct ParentFormController<F, N, T> {
    form: F,
    notifier: N,
    transport: T,
    endpoint: String,
}

impl<F, N, T> ParentFormController<F, N, T>
where
    F: FormElement,
    N: Notifier,
    T: RegistrationTransport,
{
    pub fn new(form: F, notifier: N, transport: T) -> Self {
        Self {
            form,
            notifier,
            transport,
            endpoint: PARENT_REGISTRATION_PATH.to_string(),
        }
    }

    /// `None` when the page has no `#parentForm`.
    pub fn bind<P>(page: &P, notifier: N, transport: T) -> Option<Self>
    where
        P: Page<Form = F>,
    {
        let form = page.form(ElementId::ParentForm)?;
        Some(Self::new(form, notifier, transport))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let submission = ParentSubmission::from_form(&self.form);
        if let Err(e) = submission.validate() {
            self.notifier.alert(&e.to_string());
            return SubmitOutcome::Invalid(e);
        }

        match self.send(submission).await {
            Ok(RegistrationResponse::Success(registered)) => {
                log::info!("parent registered as {:?}", registered.parent_id);
                self.notifier
                    .alert(registered.message.as_deref().unwrap_or(PARENT_REGISTERED));
                self.form.reset();
                SubmitOutcome::Registered(registered)
            }
            Ok(RegistrationResponse::Failure { message }) => {
                let text = message.unwrap_or_else(|| REGISTRATION_FAILED.to_string());
                self.notifier.alert(&text);
                SubmitOutcome::Rejected(text)
            }
            Err(e) => {
                log::error!("Parent registration error: {}", e);
                self.notifier.alert(PARENT_TRANSPORT_FAILED);
                SubmitOutcome::ServerError(e.to_string())
            }
        }
    }

    async fn send(&self, submission: ParentSubmission) -> Result<RegistrationResponse> {
        let body = self
            .transport
            .post_multipart(&self.endpoint, submission.into_payload())
            .await?;
        RegistrationResponse::from_value(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::page::FormSnapshot;
    use crate::registration::{ProfileAttachment, ValidationError};
    use crate::testing::{RecordingNotifier, RecordingTransport, TestForm, TestPage};
    use serde_json::json;

    fn parent() -> FormSnapshot {
        FormSnapshot::new()
            .with(ElementId::Name, "Grace")
            .with(ElementId::Phone, "0911")
            .with(ElementId::Username, "grace")
            .with(ElementId::Password, "pw")
            .with_row("GES_0001_26", "Mother")
    }

    fn controller(
        snapshot: FormSnapshot,
        transport: RecordingTransport,
    ) -> (
        ParentFormController<TestForm, RecordingNotifier, RecordingTransport>,
        RecordingNotifier,
    ) {
        let notifier = RecordingNotifier::default();
        let controller =
            ParentFormController::new(TestForm::new(snapshot), notifier.clone(), transport);
        (controller, notifier)
    }

    #[test]
    fn bind_needs_parent_form() {
        let student_page = TestPage::with_form(parent());
        assert!(
            ParentFormController::bind(
                &student_page,
                RecordingNotifier::default(),
                RecordingTransport::default()
            )
            .is_none()
        );

        let parent_page = TestPage::with_form_id(ElementId::ParentForm, parent());
        assert!(
            ParentFormController::bind(
                &parent_page,
                RecordingNotifier::default(),
                RecordingTransport::default()
            )
            .is_some()
        );
    }

    #[tokio::test]
    async fn duplicate_children_are_caught_locally() {
        let transport = RecordingTransport::default();
        let (controller, notifier) =
            controller(parent().with_row("GES_0001_26", "Father"), transport.clone());

        let outcome = controller.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(ValidationError::DuplicateStudent("GES_0001_26".into()))
        );
        assert_eq!(notifier.alerts(), vec!["Duplicate Student ID detected"]);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn success_announces_and_resets() {
        let transport = RecordingTransport::replying(json!({
            "success": true,
            "message": "Parent registered successfully",
            "parentId": "-Nabc",
            "parentUserId": "-Nxyz"
        }));
        let photo = ProfileAttachment::new("grace.png", b"png".to_vec());
        let (controller, notifier) =
            controller(parent().with_file(ElementId::Profile, photo), transport.clone());

        let outcome = controller.submit().await;

        let SubmitOutcome::Registered(registered) = outcome else {
            panic!("expected registration");
        };
        assert_eq!(registered.parent_id.as_deref(), Some("-Nabc"));
        assert_eq!(notifier.alerts(), vec!["Parent registered successfully"]);
        assert_eq!(controller.form().resets(), 1);

        let calls = transport.calls();
        assert_eq!(calls[0].0, "/register/parent");
        assert_eq!(calls[0].1.get_all("relationship"), vec!["Mother"]);
        assert!(calls[0].1.has_file("profile"));
    }

    #[tokio::test]
    async fn rejection_shows_server_message() {
        let transport = RecordingTransport::replying(
            json!({"success": false, "message": "Username already exists"}),
        );
        let (controller, notifier) = controller(parent(), transport);

        controller.submit().await;

        assert_eq!(notifier.alerts(), vec!["Username already exists"]);
        assert_eq!(controller.form().resets(), 0);
    }

    #[tokio::test]
    async fn transport_failure_asks_to_retry() {
        let transport = RecordingTransport::failing(|| Error::Internal("offline".into()));
        let (controller, notifier) = controller(parent(), transport);

        let outcome = controller.submit().await;

        assert!(matches!(outcome, SubmitOutcome::ServerError(_)));
        assert_eq!(notifier.alerts(), vec!["Registration failed. Try again."]);
    }
}

use crate::api::RegistrationTransport;
use crate::client::{REGISTRATION_FAILED, SERVER_ERROR, SubmitOutcome};
use crate::config::STUDENT_REGISTRATION_PATH;
use crate::errors::Result;
use crate::page::{ElementId, FormElement, Notifier, Page, ResultContainer};
use crate::registration::{RegistrationResponse, RegistrationSubmission};

/// Submit handler of the student registration page.
///
/// Holds the form, the result container, a notifier and the transport it was
/// bound with; nothing else survives between submissions. Concurrent calls
/// to [`submit`](Self::submit) are not serialised, each one sends its own
/// request.
pub struct RegistrationFormController<F, R, N, T> {
    form: F,
    result: Option<R>,
    notifier: N,
    transport: T,
    endpoint: String,
}

impl<F, R, N, T> RegistrationFormController<F, R, N, T>
where
    F: FormElement,
    R: ResultContainer,
    N: Notifier,
    T: RegistrationTransport,
{
    pub fn new(form: F, result: Option<R>, notifier: N, transport: T) -> Self {
        Self {
            form,
            result,
            notifier,
            transport,
            endpoint: STUDENT_REGISTRATION_PATH.to_string(),
        }
    }

    /// Look up `#studentForm` and `#result` on `page`.
    ///
    /// Returns `None` when the page has no student form, in which case there
    /// is nothing to handle. A missing result container only means success
    /// messages have nowhere to go.
    pub fn bind<P>(page: &P, notifier: N, transport: T) -> Option<Self>
    where
        P: Page<Form = F, Result = R>,
    {
        let Some(form) = page.form(ElementId::StudentForm) else {
            log::debug!("no #{} on page, nothing to bind", ElementId::StudentForm.as_str());
            return None;
        };
        let result = page.result_container(ElementId::Result);
        Some(Self::new(form, result, notifier, transport))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Handle one submit event.
    ///
    /// The host must suppress its native form navigation and call this
    /// instead. Validation failures and server rejections each raise exactly
    /// one notification; a successful registration resets the form and
    /// renders the assigned id.
    pub async fn submit(&self) -> SubmitOutcome {
        if let Some(result) = &self.result {
            result.clear();
        }

        let submission = RegistrationSubmission::from_form(&self.form);
        if let Err(e) = submission.validate() {
            self.notifier.alert(&e.to_string());
            return SubmitOutcome::Invalid(e);
        }

        match self.send(submission).await {
            Ok(RegistrationResponse::Success(registered)) => {
                log::info!("student registered as {:?}", registered.student_id);
                self.form.reset();
                if let Some(result) = &self.result {
                    result.set_html(&render_success(&registered.student_id));
                }
                SubmitOutcome::Registered(registered)
            }
            Ok(RegistrationResponse::Failure { message }) => {
                let text = message.unwrap_or_else(|| REGISTRATION_FAILED.to_string());
                self.notifier.alert(&text);
                SubmitOutcome::Rejected(text)
            }
            Err(e) => {
                log::error!("Registration error: {}", e);
                self.notifier.alert(SERVER_ERROR);
                SubmitOutcome::ServerError(e.to_string())
            }
        }
    }

    async fn send(&self, submission: RegistrationSubmission) -> Result<RegistrationResponse> {
        let body = self
            .transport
            .post_multipart(&self.endpoint, submission.into_payload())
            .await?;
        RegistrationResponse::from_value(body)
    }
}

/// Success message for the result container. The id is HTML-escaped.
pub fn render_success(student_id: &str) -> String {
    format!(
        "<div class=\"success\">\n  \
         <strong>Registration successful.</strong><br>\n  \
         Assigned studentId (also used as username): <code>{}</code>\n  \
         <br>Please save this ID for login.\n\
         </div>",
        escape_html(student_id)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

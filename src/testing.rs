//! In-memory page, notifier and transport doubles for unit tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::RegistrationTransport;
use crate::errors::{Error, Result};
use crate::page::{ElementId, FormElement, FormSnapshot, Notifier, Page, ResultContainer, RowClass};
use crate::registration::{MultipartPayload, ProfileAttachment};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Default)]
pub struct TestForm {
    values: Arc<Mutex<FormSnapshot>>,
    resets: Arc<AtomicUsize>,
}

impl TestForm {
    pub fn new(snapshot: FormSnapshot) -> Self {
        Self {
            values: Arc::new(Mutex::new(snapshot)),
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl FormElement for TestForm {
    fn value(&self, id: ElementId) -> Option<String> {
        self.values.lock().unwrap().value(id)
    }

    fn file(&self, id: ElementId) -> Option<ProfileAttachment> {
        self.values.lock().unwrap().file(id)
    }

    fn row_values(&self, class: RowClass) -> Vec<String> {
        self.values.lock().unwrap().row_values(class)
    }

    fn reset(&self) {
        *self.values.lock().unwrap() = FormSnapshot::default();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestResult {
    html: Arc<Mutex<String>>,
    clears: Arc<AtomicUsize>,
}

impl TestResult {
    pub fn html(&self) -> String {
        self.html.lock().unwrap().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl ResultContainer for TestResult {
    fn clear(&self) {
        self.html.lock().unwrap().clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn set_html(&self, html: &str) {
        *self.html.lock().unwrap() = html.to_string();
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

type Reply = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// Records every POST and answers with a canned reply.
#[derive(Clone)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<(String, MultipartPayload)>>>,
    reply: Reply,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::replying(json!({"success": false}))
    }
}

impl RecordingTransport {
    pub fn replying(body: Value) -> Self {
        Self {
            calls: Arc::default(),
            reply: Arc::new(move || Ok(body.clone())),
        }
    }

    pub fn failing(error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::default(),
            reply: Arc::new(move || Err(error())),
        }
    }

    pub fn calls(&self) -> Vec<(String, MultipartPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrationTransport for RecordingTransport {
    async fn post_multipart(&self, path: &str, payload: MultipartPayload) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), payload));
        (self.reply)()
    }
}

/// A page holding at most one form.
#[derive(Debug, Clone)]
pub struct TestPage {
    form: Option<(ElementId, TestForm)>,
    result: Option<TestResult>,
}

impl TestPage {
    pub fn empty() -> Self {
        Self {
            form: None,
            result: Some(TestResult::default()),
        }
    }

    pub fn with_form(snapshot: FormSnapshot) -> Self {
        Self::with_form_id(ElementId::StudentForm, snapshot)
    }

    pub fn with_form_id(id: ElementId, snapshot: FormSnapshot) -> Self {
        Self {
            form: Some((id, TestForm::new(snapshot))),
            result: Some(TestResult::default()),
        }
    }

    pub fn without_result(mut self) -> Self {
        self.result = None;
        self
    }
}

impl Page for TestPage {
    type Form = TestForm;
    type Result = TestResult;

    fn form(&self, id: ElementId) -> Option<TestForm> {
        self.form
            .as_ref()
            .filter(|(form_id, _)| *form_id == id)
            .map(|(_, form)| form.clone())
    }

    fn result_container(&self, id: ElementId) -> Option<TestResult> {
        if id == ElementId::Result {
            self.result.clone()
        } else {
            None
        }
    }
}

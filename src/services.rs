use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::api::RegistrationTransport;
use crate::client::{ParentFormController, RegistrationFormController, SubmitOutcome};
use crate::config::{ClientConfig, Configuration};
use crate::page::{ElementId, FormElement, FormSnapshot, Notifier, ResultContainer, RowClass};
use crate::registration::ProfileAttachment;

#[derive(Debug, Clone)]
pub enum RegistrationCmd {
    Submit(Uuid, FormSnapshot),
    SubmitParent(Uuid, FormSnapshot),
}

/// Page updates for the UI thread, tagged with the submission they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationUiCmd {
    ClearResult(Uuid),
    ShowResult(Uuid, String),
    ResetForm(Uuid),
    Alert(Uuid, String),
    /// Always the last event of a submission.
    Finished(Uuid, SubmitOutcome),
}

impl RegistrationUiCmd {
    pub fn submission(&self) -> Uuid {
        match self {
            RegistrationUiCmd::ClearResult(id)
            | RegistrationUiCmd::ShowResult(id, _)
            | RegistrationUiCmd::ResetForm(id)
            | RegistrationUiCmd::Alert(id, _)
            | RegistrationUiCmd::Finished(id, _) => *id,
        }
    }
}

/// Runs the form controllers off the UI thread.
///
/// The UI thread copies the form into a [`FormSnapshot`], hands it to
/// [`submit`](Self::submit) and drains [`try_recv`](Self::try_recv) to apply
/// the resulting page updates. Every submission runs in its own task, so two
/// submissions in flight do not wait on each other.
pub struct RegistrationService {
    service_handle: tokio::task::JoinHandle<()>,
    cmd_tx: UnboundedSender<RegistrationCmd>,
    ui_rx: UnboundedReceiver<RegistrationUiCmd>,
}

impl RegistrationService {
    pub fn new<T>(handle: &tokio::runtime::Handle, transport: T, config: ClientConfig) -> Self
    where
        T: RegistrationTransport + 'static,
    {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let transport = Arc::new(transport);
        let service_handle = handle.spawn(registration_service(cmd_rx, ui_tx, transport, config));
        Self {
            service_handle,
            cmd_tx,
            ui_rx,
        }
    }

    pub fn tx(&self) -> &UnboundedSender<RegistrationCmd> {
        &self.cmd_tx
    }

    /// Queue a student registration and return its submission id.
    pub fn submit(
        &self,
        snapshot: FormSnapshot,
    ) -> Result<Uuid, mpsc::error::SendError<RegistrationCmd>> {
        let id = Uuid::new_v4();
        self.cmd_tx.send(RegistrationCmd::Submit(id, snapshot))?;
        Ok(id)
    }

    pub fn submit_parent(
        &self,
        snapshot: FormSnapshot,
    ) -> Result<Uuid, mpsc::error::SendError<RegistrationCmd>> {
        let id = Uuid::new_v4();
        self.cmd_tx.send(RegistrationCmd::SubmitParent(id, snapshot))?;
        Ok(id)
    }

    pub fn try_recv(&mut self) -> Option<RegistrationUiCmd> {
        self.ui_rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<RegistrationUiCmd> {
        self.ui_rx.recv().await
    }
}

impl Drop for RegistrationService {
    fn drop(&mut self) {
        self.service_handle.abort();
    }
}

/// Forwards page updates of one submission to the UI thread.
#[derive(Debug, Clone)]
struct UiChannel {
    id: Uuid,
    ui_tx: UnboundedSender<RegistrationUiCmd>,
}

impl UiChannel {
    fn send(&self, cmd: RegistrationUiCmd) {
        if let Err(e) = self.ui_tx.send(cmd) {
            log::warn!("ui channel closed, dropping {:?}", e.0);
        }
    }
}

impl Notifier for UiChannel {
    fn alert(&self, message: &str) {
        self.send(RegistrationUiCmd::Alert(self.id, message.to_string()));
    }
}

impl ResultContainer for UiChannel {
    fn clear(&self) {
        self.send(RegistrationUiCmd::ClearResult(self.id));
    }

    fn set_html(&self, html: &str) {
        self.send(RegistrationUiCmd::ShowResult(self.id, html.to_string()));
    }
}

/// A snapshot whose reset is replayed on the real form by the UI thread.
struct SnapshotForm {
    snapshot: FormSnapshot,
    channel: UiChannel,
}

impl FormElement for SnapshotForm {
    fn value(&self, id: ElementId) -> Option<String> {
        self.snapshot.value(id)
    }

    fn file(&self, id: ElementId) -> Option<ProfileAttachment> {
        self.snapshot.file(id)
    }

    fn row_values(&self, class: RowClass) -> Vec<String> {
        self.snapshot.row_values(class)
    }

    fn reset(&self) {
        self.channel.send(RegistrationUiCmd::ResetForm(self.channel.id));
    }
}

async fn registration_service<T>(
    mut cmd_rx: UnboundedReceiver<RegistrationCmd>,
    ui_tx: UnboundedSender<RegistrationUiCmd>,
    transport: Arc<T>,
    config: ClientConfig,
) where
    T: RegistrationTransport + 'static,
{
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            RegistrationCmd::Submit(id, snapshot) => {
                log::debug!("student submission {}", id);
                let channel = UiChannel {
                    id,
                    ui_tx: ui_tx.clone(),
                };
                let form = SnapshotForm {
                    snapshot,
                    channel: channel.clone(),
                };
                let controller = RegistrationFormController::new(
                    form,
                    Some(channel.clone()),
                    channel.clone(),
                    transport.clone(),
                )
                .with_endpoint(config.student_endpoint());
                tokio::spawn(async move {
                    let outcome = controller.submit().await;
                    channel.send(RegistrationUiCmd::Finished(id, outcome));
                });
            }
            RegistrationCmd::SubmitParent(id, snapshot) => {
                log::debug!("parent submission {}", id);
                let channel = UiChannel {
                    id,
                    ui_tx: ui_tx.clone(),
                };
                let form = SnapshotForm {
                    snapshot,
                    channel: channel.clone(),
                };
                let controller =
                    ParentFormController::new(form, channel.clone(), transport.clone())
                        .with_endpoint(config.parent_endpoint());
                tokio::spawn(async move {
                    let outcome = controller.submit().await;
                    channel.send(RegistrationUiCmd::Finished(id, outcome));
                });
            }
        }
    }
    log::debug!("registration service stopped");
}

//! Roster view: the remote snapshot merged with local drafts, and the draft
//! lifecycle from creation until the backend has accepted each record.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use futures::future::join_all;
use shared::{
    domain::EmployeeId,
    protocol::{Employee, NewEmployee},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{
    client::EmployeeStore,
    error::ClientError,
    form::{CreationDialog, EmployeeForm, FormError},
};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load employees";
pub const SAVE_SUCCESS_MESSAGE: &str = "Employees saved successfully!";
pub const SAVE_ERROR_MESSAGE: &str = "Failed to save employees. Please try again.";

const SUCCESS_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);
const ERROR_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to load employees: {0}")]
    Load(#[source] ClientError),
    #[error("creation dialog failed: {0}")]
    Dialog(anyhow::Error),
    #[error("invalid employee form: {0}")]
    Form(#[from] FormError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Hidden,
    Loading,
    NoRows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            duration: SUCCESS_NOTIFICATION_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            duration: ERROR_NOTIFICATION_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Notification(Notification),
    OverlayChanged(Overlay),
    TableChanged { rows: usize, drafts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Employee),
    Failed(String),
}

/// Per-draft result of one save, keyed by the draft's placeholder id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    outcomes: BTreeMap<EmployeeId, SaveOutcome>,
    reloaded: bool,
    reload_error: Option<String>,
}

impl SaveReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, draft_id: EmployeeId) -> Option<&SaveOutcome> {
        self.outcomes.get(&draft_id)
    }

    pub fn saved_ids(&self) -> Vec<EmployeeId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SaveOutcome::Saved(_)))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn failed_ids(&self) -> Vec<EmployeeId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SaveOutcome::Failed(_)))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .values()
            .any(|outcome| matches!(outcome, SaveOutcome::Failed(_)))
    }

    /// True when the remote snapshot was refreshed after the batch.
    pub fn reloaded(&self) -> bool {
        self.reloaded
    }

    /// Why the post-save refresh failed; the visible remote rows are stale then.
    pub fn reload_error(&self) -> Option<&str> {
        self.reload_error.as_deref()
    }
}

/// State owned by a [`RosterView`].
///
/// Drafts always carry a negative placeholder id, `status = Unsaved` and the
/// unsaved flag. Placeholder ids come from a counter that only ever decreases,
/// so an id is never reused within one view.
#[derive(Debug, Clone, Default)]
pub struct RosterState {
    remote: Vec<Employee>,
    drafts: Vec<Employee>,
    selection: Vec<EmployeeId>,
    last_placeholder: i64,
    overlay: Overlay,
}

impl RosterState {
    /// Visible table: remote snapshot followed by drafts.
    pub fn rows(&self) -> impl Iterator<Item = &Employee> {
        self.remote.iter().chain(self.drafts.iter())
    }

    pub fn table(&self) -> Vec<Employee> {
        self.rows().cloned().collect()
    }

    pub fn row_count(&self) -> usize {
        self.remote.len() + self.drafts.len()
    }

    pub fn remote(&self) -> &[Employee] {
        &self.remote
    }

    pub fn drafts(&self) -> &[Employee] {
        &self.drafts
    }

    pub fn selection(&self) -> &[EmployeeId] {
        &self.selection
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn has_unsaved(&self) -> bool {
        !self.drafts.is_empty()
    }

    fn is_selected(&self, employee: &Employee) -> bool {
        employee
            .id
            .is_some_and(|id| self.selection.contains(&id))
    }

    fn selected_drafts(&self) -> impl Iterator<Item = &Employee> {
        self.drafts.iter().filter(|draft| self.is_selected(draft))
    }

    pub fn save_label(&self) -> String {
        let selected = self.selected_drafts().count();
        if selected > 0 {
            return format!("Save Selected ({selected})");
        }
        if !self.drafts.is_empty() {
            return format!("Save All ({})", self.drafts.len());
        }
        "Save (0)".to_string()
    }

    /// Selected drafts when any are selected, otherwise every draft, with the
    /// local-only fields already stripped.
    fn save_targets(&self) -> Vec<(EmployeeId, NewEmployee)> {
        let selected: Vec<&Employee> = self.selected_drafts().collect();
        let targets = if selected.is_empty() {
            self.drafts.iter().collect()
        } else {
            selected
        };
        targets
            .into_iter()
            .filter_map(|draft| draft.id.map(|id| (id, draft.to_payload())))
            .collect()
    }

    fn add_draft(&mut self, payload: NewEmployee) -> EmployeeId {
        self.last_placeholder -= 1;
        let id = EmployeeId(self.last_placeholder);
        self.drafts.push(Employee::draft(id, payload));
        id
    }

    /// Replaces the remote snapshot; returns how many remote records were kept.
    fn replace_remote(&mut self, employees: Vec<Employee>) -> usize {
        let drafts = &self.drafts;
        let mut kept = Vec::with_capacity(employees.len());
        for mut employee in employees {
            let collides = employee
                .id
                .is_some_and(|id| drafts.iter().any(|draft| draft.id == Some(id)));
            if collides {
                warn!(id = ?employee.id, "dropping remote record that shares a draft placeholder id");
                continue;
            }
            employee.is_unsaved = false;
            kept.push(employee);
        }
        self.remote = kept;
        self.remote.len()
    }

    fn remove_drafts(&mut self, ids: &[EmployeeId]) {
        self.drafts
            .retain(|draft| !draft.id.is_some_and(|id| ids.contains(&id)));
    }

    /// Drops selected ids whose row is no longer visible.
    fn prune_selection(&mut self) {
        let visible: Vec<EmployeeId> = self.rows().filter_map(|row| row.id).collect();
        self.selection.retain(|id| visible.contains(id));
    }
}

pub struct RosterView {
    store: Arc<dyn EmployeeStore>,
    state: RosterState,
    events: broadcast::Sender<ViewEvent>,
}

impl RosterView {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            state: RosterState::default(),
            events,
        }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub fn save_label(&self) -> String {
        self.state.save_label()
    }

    pub fn has_unsaved(&self) -> bool {
        self.state.has_unsaved()
    }

    /// Refreshes the remote part of the table. Drafts are kept either way; on
    /// failure the previous rows stay and the overlay switches to "no rows".
    pub async fn load(&mut self) -> Result<usize, ViewError> {
        self.set_overlay(Overlay::Loading);
        match self.store.list().await {
            Ok(employees) => {
                let count = self.state.replace_remote(employees);
                self.state.prune_selection();
                self.set_overlay(Overlay::Hidden);
                self.emit_table_changed();
                info!(
                    remote = count,
                    drafts = self.state.drafts.len(),
                    "loaded employees"
                );
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "failed to load employees");
                self.set_overlay(Overlay::NoRows);
                self.notify(Notification::error(LOAD_ERROR_MESSAGE));
                Err(ViewError::Load(err))
            }
        }
    }

    /// Opens the creation dialog and appends a draft if the user confirms.
    pub fn begin_creation<D>(&mut self, dialog: &mut D) -> Result<Option<EmployeeId>, ViewError>
    where
        D: CreationDialog + ?Sized,
    {
        let Some(form) = dialog.open().map_err(ViewError::Dialog)? else {
            debug!("employee creation cancelled");
            return Ok(None);
        };
        self.add_draft(&form).map(Some).map_err(ViewError::from)
    }

    pub fn add_draft(&mut self, form: &EmployeeForm) -> Result<EmployeeId, FormError> {
        let payload = form.validate()?;
        let id = self.state.add_draft(payload);
        debug!(%id, "added unsaved employee");
        self.emit_table_changed();
        Ok(id)
    }

    /// Replaces the row selection. Ids without a visible row are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = EmployeeId>) {
        let mut selection: Vec<EmployeeId> = Vec::new();
        for id in ids {
            if selection.contains(&id) {
                continue;
            }
            if self.state.rows().any(|row| row.id == Some(id)) {
                selection.push(id);
            } else {
                debug!(%id, "ignoring selection of unknown row");
            }
        }
        self.state.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    /// Persists the selected drafts, or all drafts when none are selected.
    ///
    /// Every create request is issued before any is awaited. Each draft whose
    /// create succeeds leaves local state; failed drafts stay for a later save.
    /// The remote snapshot is reloaded once anything was saved; the report says
    /// whether that reload succeeded.
    pub async fn save(&mut self) -> SaveReport {
        let targets = self.state.save_targets();
        if targets.is_empty() {
            debug!("save requested with no unsaved employees");
            return SaveReport::default();
        }

        info!(count = targets.len(), "saving unsaved employees");
        self.set_overlay(Overlay::Loading);

        let requests = targets.iter().map(|(_, payload)| {
            let store = Arc::clone(&self.store);
            async move { store.create(payload).await }
        });
        let results = join_all(requests).await;

        let mut report = SaveReport::default();
        for ((draft_id, _), result) in targets.iter().zip(results) {
            let outcome = match result {
                Ok(created) => {
                    debug!(%draft_id, created_id = ?created.id, "employee saved");
                    SaveOutcome::Saved(created)
                }
                Err(err) => {
                    warn!(%draft_id, error = %err, "failed to save employee");
                    SaveOutcome::Failed(err.to_string())
                }
            };
            report.outcomes.insert(*draft_id, outcome);
        }

        let saved = report.saved_ids();
        self.state.remove_drafts(&saved);
        self.set_overlay(Overlay::Hidden);

        if report.has_failures() {
            error!(
                saved = saved.len(),
                failed = report.failed_ids().len(),
                "batch save incomplete"
            );
            self.notify(Notification::error(SAVE_ERROR_MESSAGE));
        } else {
            self.notify(Notification::success(SAVE_SUCCESS_MESSAGE));
        }

        if !saved.is_empty() {
            match self.load().await {
                Ok(_) => report.reloaded = true,
                Err(err) => {
                    report.reload_error = Some(err.to_string());
                    self.emit_table_changed();
                }
            }
        }

        if report.has_failures() {
            self.state.prune_selection();
        } else {
            self.clear_selection();
        }
        report
    }

    fn set_overlay(&mut self, overlay: Overlay) {
        if self.state.overlay != overlay {
            self.state.overlay = overlay;
            let _ = self.events.send(ViewEvent::OverlayChanged(overlay));
        }
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(ViewEvent::Notification(notification));
    }

    fn emit_table_changed(&self) {
        let _ = self.events.send(ViewEvent::TableChanged {
            rows: self.state.row_count(),
            drafts: self.state.drafts.len(),
        });
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;

//! Revisión de preferencias pendientes (HOD).

use std::sync::Arc;

use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{info, warn};

use super::report_failure;
use crate::api_json::{Approval, ApprovalRequest, PendingPreference};
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::StatusMessage;
use crate::session::{Authenticated, Session};
use crate::ui::{Latest, ListState, OptionItem, SelectControl, Shell, load_list, render};

pub const SELECT_AT_LEAST_ONE: &str = "Select at least one subject to approve";
pub const APPROVED: &str = "Preferences approved";
pub const APPROVE_FAILED: &str = "Failed to approve preferences";
pub const DELETE_FAILED: &str = "Failed to delete preference";

/// Preferencia pendiente + el ramo que el HOD eligió asignar.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub preference: PendingPreference,
    pub choice: SelectControl,
}

impl From<PendingPreference> for ReviewRow {
    fn from(preference: PendingPreference) -> Self {
        let items = preference.choices().into_iter().map(|s| OptionItem::new(&s, &s)).collect();
        Self {
            choice: SelectControl::with_items("Select Subject", items),
            preference,
        }
    }
}

pub struct PreferenceReviewPage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    rows: Latest<ListState<ReviewRow>>,
    message: Mutex<Option<StatusMessage>>,
}

impl<B: Backend> PreferenceReviewPage<B> {
    pub fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        Ok(Self {
            backend,
            shell,
            auth,
            rows: Latest::new(ListState::default()),
            message: Mutex::new(None),
        })
    }

    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }

    pub fn rows(&self) -> ListState<ReviewRow> {
        self.rows.snapshot()
    }

    pub fn message(&self) -> Option<StatusMessage> {
        self.message.lock().clone()
    }

    pub async fn load(&self) -> Result<usize, ClientError> {
        let backend = &self.backend;
        let fetch = async {
            backend
                .pending_preferences()
                .await
                .map(|pending| pending.into_iter().map(ReviewRow::from).collect::<Vec<_>>())
        };
        load_list(&self.rows, &self.shell, "Failed to load preferences", fetch).await
    }

    /// Elige el ramo asignado de una fila; sólo vale uno de sus preferidos.
    pub fn choose(&self, preference_id: i64, subject: &str) -> Result<(), ClientError> {
        self.rows.update(|state| match state {
            ListState::Loaded(rows) => rows
                .iter_mut()
                .find(|r| r.preference.id == preference_id)
                .ok_or_else(|| ClientError::validation(format!("no pending preference {preference_id}")))
                .and_then(|r| r.choice.select(subject)),
            _ => Err(ClientError::validation("preferences not loaded")),
        })
    }

    /// Filas con un ramo elegido, en el orden de la tabla.
    pub fn approvals(&self) -> Vec<Approval> {
        self.rows.read(|state| {
            state
                .rows()
                .iter()
                .filter_map(|r| {
                    r.choice.value().map(|subject| Approval {
                        preference_id: r.preference.id,
                        allocated_subject: subject.to_string(),
                    })
                })
                .collect()
        })
    }

    pub async fn approve(&self) -> Result<(), ClientError> {
        let approvals = self.approvals();
        if approvals.is_empty() {
            self.shell.alert(SELECT_AT_LEAST_ONE);
            return Err(ClientError::validation(SELECT_AT_LEAST_ONE));
        }

        let count = approvals.len();
        match self.backend.approve_preferences(&ApprovalRequest { approvals }).await {
            Ok(reply) => {
                info!("{count} preferences approved");
                let text = reply.message.unwrap_or_else(|| APPROVED.to_string());
                *self.message.lock() = Some(StatusMessage::success(text));
                self.load().await?;
                Ok(())
            }
            Err(e) => {
                report_failure(&self.shell, &self.message, &e, APPROVE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, preference_id: i64) -> Result<(), ClientError> {
        if let Err(e) = self.backend.delete_preference(preference_id).await {
            warn!("delete preference {preference_id} failed: {e}");
            self.shell.alert(DELETE_FAILED);
            return Err(e);
        }
        info!("preference {preference_id} deleted");
        self.load().await?;
        Ok(())
    }

    pub fn render(&self) -> Markup {
        let state = self.rows();
        html! {
            tbody id="preferenceTable" {
                @match &state {
                    ListState::NotLoaded => {}
                    ListState::Loading => { (render::info_row(6, "Loading...")) }
                    ListState::Failed => { (render::info_row(6, "Error")) }
                    ListState::Loaded(rows) => {
                        @if rows.is_empty() {
                            (render::info_row(6, "No pending preferences"))
                        }
                        @for row in rows {
                            @let p = &row.preference;
                            tr {
                                td { (p.faculty_name) }
                                td { (p.year_level) }
                                td { (p.semester) }
                                td { (p.choices().join(", ")) }
                                td { (render::select("allocated_subject", &row.choice)) }
                                td { button data-preference=(p.id) { "Delete" } }
                            }
                        }
                    }
                }
            }
            (render::status_message("msg", self.message().as_ref()))
        }
    }
}

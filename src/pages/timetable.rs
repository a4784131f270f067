use std::sync::Arc;

use maud::{Markup, html};

use crate::api_json::TimetableEntry;
use crate::backend::Backend;
use crate::error::ClientError;
use crate::session::{Authenticated, Session};
use crate::ui::{Latest, ListState, Shell, load_list, render};

pub const NO_ENTRIES: &str = "No timetable entries";

/// Horario generado del profesor con sesión.
pub struct TimetablePage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    entries: Latest<ListState<TimetableEntry>>,
}

impl<B: Backend> TimetablePage<B> {
    pub fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        Ok(Self { backend, shell, auth, entries: Latest::new(ListState::default()) })
    }

    pub async fn load(&self) -> Result<usize, ClientError> {
        load_list(
            &self.entries,
            &self.shell,
            "Failed to load timetable",
            self.backend.timetable(self.auth.user_id()),
        )
        .await
    }

    pub fn entries(&self) -> ListState<TimetableEntry> {
        self.entries.snapshot()
    }

    pub fn render(&self) -> Markup {
        let state = self.entries();
        html! {
            tbody id="timetable" {
                @match &state {
                    ListState::NotLoaded => {}
                    ListState::Loading => { (render::info_row(6, "Loading...")) }
                    ListState::Failed => { (render::info_row(6, "Error")) }
                    ListState::Loaded(entries) => {
                        @if entries.is_empty() {
                            (render::info_row(6, NO_ENTRIES))
                        }
                        @for e in entries {
                            tr {
                                td { (e.day) }
                                td { (e.start_time) " - " (e.end_time) }
                                td { (e.subject) }
                                td { (e.class) }
                                td { (e.kind) }
                                td { (e.batch.as_deref().unwrap_or("-")) }
                            }
                        }
                    }
                }
            }
        }
    }
}

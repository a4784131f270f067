use std::sync::Arc;

use maud::{Markup, html};
use tracing::debug;

use crate::api_json::ClassSlot;
use crate::backend::Backend;
use crate::error::ClientError;
use crate::session::{Authenticated, Session};
use crate::ui::{Cascade, DependentSelect, Latest, ListState, Shell, load_list, render};

pub const NO_SLOTS: &str = "No timetable generated for this class";

/// Horario generado de una clase (vista del HOD). Cambiar de clase descarta
/// la respuesta de la clase anterior si llega tarde.
pub struct ClassTimetablePage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    classes: DependentSelect,
    slots: Latest<ListState<ClassSlot>>,
}

impl<B: Backend> ClassTimetablePage<B> {
    pub async fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        let page = Self {
            backend,
            shell,
            auth,
            classes: DependentSelect::placeholder("Select Class"),
            slots: Latest::new(ListState::default()),
        };

        let backend = &page.backend;
        let outcome = Cascade::new(&page.shell, &[&page.classes])
            .on_failure("Failed to load classes")
            .load(Some(()), |_| backend.classes(None))
            .await;
        debug!("classes loaded: {outcome:?}");

        Ok(page)
    }

    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }

    pub fn classes(&self) -> &DependentSelect {
        &self.classes
    }

    /// Elige la clase y carga su horario. El valor vacío limpia la tabla.
    pub async fn select_class(&self, class_id: &str) -> Result<usize, ClientError> {
        self.classes.select(class_id)?;
        let Some(class_id) = self.classes.value() else {
            self.slots.invalidate(|s| *s = ListState::NotLoaded);
            return Ok(0);
        };
        load_list(
            &self.slots,
            &self.shell,
            "Failed to load timetable",
            self.backend.class_timetable(&class_id),
        )
        .await
    }

    pub fn slots(&self) -> ListState<ClassSlot> {
        self.slots.snapshot()
    }

    pub fn render(&self) -> Markup {
        let state = self.slots();
        html! {
            (render::select("class_id", &self.classes.snapshot()))
            tbody id="classTimetable" {
                @match &state {
                    ListState::NotLoaded => {}
                    ListState::Loading => { (render::info_row(3, "Loading...")) }
                    ListState::Failed => { (render::info_row(3, "Error")) }
                    ListState::Loaded(slots) => {
                        @if slots.is_empty() {
                            (render::info_row(3, NO_SLOTS))
                        }
                        @for slot in slots {
                            tr {
                                td { (slot.day) }
                                td { (slot.start_time) " - " (slot.end_time) }
                                td {
                                    @for (i, line) in slot.lines().into_iter().enumerate() {
                                        @if i > 0 { br; }
                                        (line)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

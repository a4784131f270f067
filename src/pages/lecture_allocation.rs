use std::sync::Arc;

use futures_util::future::join3;
use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api_json::LectureAllocation;
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::StatusMessage;
use crate::session::{Authenticated, Session};
use crate::ui::{Cascade, DependentSelect, Latest, Shell, render};

pub const ALLOCATED: &str = "Lecture allocated";
pub const ALLOCATE_FAILED: &str = "Failed to allocate lecture";

/// Asignación de clases teóricas (HOD): clase + ramo + profesor, con la
/// carga semanal del ramo a la vista.
pub struct LectureAllocationPage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    classes: DependentSelect,
    subjects: DependentSelect,
    teachers: DependentSelect,
    current_load: Latest<Option<i64>>,
    message: Mutex<Option<StatusMessage>>,
}

impl<B: Backend> LectureAllocationPage<B> {
    /// Pasa la guardia y carga en paralelo las tres listas.
    pub async fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        let page = Self {
            backend,
            shell,
            auth,
            classes: DependentSelect::placeholder("Select Class"),
            subjects: DependentSelect::placeholder("Select Subject"),
            teachers: DependentSelect::placeholder("Select Teacher"),
            current_load: Latest::new(None),
            message: Mutex::new(None),
        };

        let backend = &page.backend;
        let classes = Cascade::new(&page.shell, &[&page.classes])
            .on_failure("Failed to load classes")
            .load(Some(()), |_| backend.classes(None));
        let subjects = Cascade::new(&page.shell, &[&page.subjects])
            .on_failure("Failed to load subjects")
            .load(Some(()), |_| backend.all_subjects());
        let teachers = Cascade::new(&page.shell, &[&page.teachers])
            .on_failure("Failed to load teachers")
            .load(Some(()), |_| backend.teachers());
        let outcomes = join3(classes, subjects, teachers).await;
        debug!("lecture allocation lists loaded: {outcomes:?}");

        Ok(page)
    }

    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }

    pub fn classes(&self) -> &DependentSelect {
        &self.classes
    }

    pub fn subjects(&self) -> &DependentSelect {
        &self.subjects
    }

    pub fn teachers(&self) -> &DependentSelect {
        &self.teachers
    }

    /// Carga semanal mostrada; `None` mientras falte clase o ramo.
    pub fn current_load(&self) -> Option<i64> {
        self.current_load.snapshot()
    }

    pub fn message(&self) -> Option<StatusMessage> {
        self.message.lock().clone()
    }

    pub async fn select_class(&self, class_id: &str) -> Result<(), ClientError> {
        self.classes.select(class_id)?;
        self.refresh_load().await
    }

    pub async fn select_subject(&self, subject_id: &str) -> Result<(), ClientError> {
        self.subjects.select(subject_id)?;
        self.refresh_load().await
    }

    pub fn select_teacher(&self, teacher_id: &str) -> Result<(), ClientError> {
        self.teachers.select(teacher_id)
    }

    async fn refresh_load(&self) -> Result<(), ClientError> {
        let (Some(subject_id), Some(class_id)) = (self.subjects.value(), self.classes.value()) else {
            self.current_load.invalidate(|l| *l = None);
            return Ok(());
        };

        let ticket = self.current_load.issue(|_| {});
        match self.backend.subject_load(&subject_id, &class_id).await {
            Ok(load) => {
                if !self.current_load.apply(ticket, |l| *l = Some(load.theory_or_zero())) {
                    debug!("discarding stale subject load for {subject_id}/{class_id}");
                }
                Ok(())
            }
            Err(e) => {
                warn!("subject load failed: {e}");
                if self.current_load.apply(ticket, |l| *l = None) {
                    self.shell.toast("Failed to load current load");
                }
                Err(e)
            }
        }
    }

    /// Envía los tres valores crudos, sin validación previa.
    pub async fn submit(&self) -> Result<(), ClientError> {
        let allocation = LectureAllocation {
            class_id: self.classes.read(|c| c.raw_value()),
            subject_id: self.subjects.read(|c| c.raw_value()),
            teacher_id: self.teachers.read(|c| c.raw_value()),
        };

        match self.backend.lecture_allocation(&allocation).await {
            Ok(reply) => {
                info!("lecture allocated: {allocation:?}");
                let text = reply.message.unwrap_or_else(|| ALLOCATED.to_string());
                *self.message.lock() = Some(StatusMessage::success(text));
                Ok(())
            }
            Err(e) => {
                warn!("lecture allocation failed: {e}");
                *self.message.lock() = Some(StatusMessage::error(ALLOCATE_FAILED));
                Err(e)
            }
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            (render::select("class_id", &self.classes.snapshot()))
            (render::select("subject_id", &self.subjects.snapshot()))
            (render::select("teacher_id", &self.teachers.snapshot()))
            span id="currentLoad" {
                @if let Some(load) = self.current_load() { (load) }
            }
            (render::status_message("msg", self.message().as_ref()))
        }
    }
}

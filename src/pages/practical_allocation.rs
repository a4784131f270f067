//! Asignación de prácticos (HOD).
//!
//! Cascada año → semestre → ramo de laboratorio, y en paralelo año → clase
//! → lote. Los profesores disponibles (aprobados y dispuestos a dictar
//! prácticos) se cargan una sola vez al abrir la página.

use std::sync::Arc;

use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::report_failure;
use crate::allocation::parse_id;
use crate::api_json::PracticalAllotment;
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::{SelectionContext, StatusMessage, YearLevel};
use crate::session::{Authenticated, Session};
use crate::ui::{Cascade, DependentSelect, LoadOutcome, SelectControl, Shell, render};

pub const SELECT_ALL_FIELDS: &str = "Select subject, faculty, class and batch";
pub const ALLOTTED: &str = "Practical allotted successfully";
pub const ALLOT_FAILED: &str = "Failed to allot practical";
pub const NO_LAB_SUBJECTS: &str = "No lab subjects";
pub const NO_WILLING_FACULTY: &str = "No willing faculty";
pub const NO_BATCHES: &str = "No batches";

pub struct PracticalAllocationPage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    ctx: Mutex<SelectionContext>,
    semesters: Mutex<SelectControl>,
    subjects: DependentSelect,
    faculty: DependentSelect,
    classes: DependentSelect,
    batches: DependentSelect,
    message: Mutex<Option<StatusMessage>>,
}

impl<B: Backend> PracticalAllocationPage<B> {
    /// Pasa la guardia y carga la lista de profesores.
    pub async fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        let page = Self {
            backend,
            shell,
            auth,
            ctx: Mutex::new(SelectionContext::default()),
            semesters: Mutex::new(SelectControl::semesters_for(None)),
            subjects: DependentSelect::placeholder("Select Subject"),
            faculty: DependentSelect::placeholder("Select Faculty"),
            classes: DependentSelect::placeholder("Select Class"),
            batches: DependentSelect::placeholder("Select Batch"),
            message: Mutex::new(None),
        };

        let backend = &page.backend;
        let outcome = Cascade::new(&page.shell, &[&page.faculty])
            .when_empty(NO_WILLING_FACULTY)
            .on_failure("Failed to load faculty")
            .load(Some(()), |_| backend.willing_practical_faculty())
            .await;
        debug!("willing faculty loaded: {outcome:?}");

        Ok(page)
    }

    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }

    pub fn semesters(&self) -> SelectControl {
        self.semesters.lock().clone()
    }

    pub fn subjects(&self) -> &DependentSelect {
        &self.subjects
    }

    pub fn faculty(&self) -> &DependentSelect {
        &self.faculty
    }

    pub fn classes(&self) -> &DependentSelect {
        &self.classes
    }

    pub fn batches(&self) -> &DependentSelect {
        &self.batches
    }

    pub fn message(&self) -> Option<StatusMessage> {
        self.message.lock().clone()
    }

    /// Cambio de año: limpia semestre, ramos y lotes, y recarga las clases
    /// del año. Devuelve el resultado de la carga de clases.
    pub async fn select_year(&self, year: Option<YearLevel>) -> LoadOutcome {
        self.ctx.lock().set_year(year);
        *self.semesters.lock() = SelectControl::semesters_for(year);
        self.subjects.reset();
        self.batches.reset();

        let backend = &self.backend;
        Cascade::new(&self.shell, &[&self.classes])
            .on_failure("Failed to load classes")
            .load(year, |y| backend.classes(Some(y)))
            .await
    }

    /// Cambio de semestre: recarga los ramos de laboratorio del año/semestre.
    pub async fn select_semester(&self, semester: Option<u8>) -> Result<LoadOutcome, ClientError> {
        let ctx = {
            let mut ctx = self.ctx.lock();
            ctx.set_semester(semester)?;
            *ctx
        };
        self.semesters
            .lock()
            .select(&semester.map(|s| s.to_string()).unwrap_or_default())?;

        let backend = &self.backend;
        Ok(Cascade::new(&self.shell, &[&self.subjects])
            .when_empty(NO_LAB_SUBJECTS)
            .on_failure("Failed to load lab subjects")
            .load(ctx.complete(), |(y, s)| backend.lab_subjects(y, s))
            .await)
    }

    pub fn select_subject(&self, subject_id: &str) -> Result<(), ClientError> {
        self.subjects.select(subject_id)
    }

    pub fn select_faculty(&self, faculty_id: &str) -> Result<(), ClientError> {
        self.faculty.select(faculty_id)
    }

    /// Cambio de clase: recarga sus lotes. El valor vacío deja los lotes en
    /// el placeholder.
    pub async fn select_class(&self, class_id: &str) -> Result<LoadOutcome, ClientError> {
        self.classes.select(class_id)?;
        let class = self.classes.value();

        let backend = &self.backend;
        Ok(Cascade::new(&self.shell, &[&self.batches])
            .when_empty(NO_BATCHES)
            .on_failure("Failed to load batches")
            .load(class.as_deref(), |c| backend.class_batches(c))
            .await)
    }

    pub fn select_batch(&self, batch_id: &str) -> Result<(), ClientError> {
        self.batches.select(batch_id)
    }

    /// Arma la asignación; exige los cuatro selectores.
    pub fn allotment(&self) -> Result<PracticalAllotment, ClientError> {
        let (Some(subject), Some(faculty), Some(class), Some(batch)) = (
            self.subjects.value(),
            self.faculty.value(),
            self.classes.value(),
            self.batches.value(),
        ) else {
            return Err(ClientError::validation(SELECT_ALL_FIELDS));
        };

        Ok(PracticalAllotment {
            faculty_id: parse_id(&faculty)?,
            subject_id: parse_id(&subject)?,
            class_id: parse_id(&class)?,
            batch_id: parse_id(&batch)?,
        })
    }

    /// Envía la asignación. "Already allotted" también llega con 200 y se
    /// muestra como respuesta normal.
    pub async fn submit(&self) -> Result<String, ClientError> {
        let allotment = match self.allotment() {
            Ok(a) => a,
            Err(e) => {
                self.shell.alert(e.to_string());
                return Err(e);
            }
        };

        match self.backend.allot_practical(&allotment).await {
            Ok(reply) => {
                let text = reply.message.unwrap_or_else(|| ALLOTTED.to_string());
                info!("practical allotted: {allotment:?} ({text})");
                *self.message.lock() = Some(StatusMessage::success(text.clone()));
                Ok(text)
            }
            Err(e) => {
                report_failure(&self.shell, &self.message, &e, ALLOT_FAILED);
                Err(e)
            }
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            section id="allotPracticals" {
                (render::select("semester", &self.semesters()))
                (render::select("subject_id", &self.subjects.snapshot()))
                (render::select("faculty_id", &self.faculty.snapshot()))
                (render::select("class_id", &self.classes.snapshot()))
                (render::select("batch_id", &self.batches.snapshot()))
                (render::status_message("practicalMsg", self.message().as_ref()))
            }
        }
    }
}

//! Página de ingreso de datos del HOD.
//!
//! Dos secciones: configuración de carga (alta de ramos + listado) y
//! asignación de divisiones (la tabla de [`AllocationBoard`]).

use std::sync::Arc;

use futures_util::future::join;
use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::allocation::{AllocationBoard, SELECT_YEAR_AND_SEMESTER};
use crate::api_json::{NewSubject, SubjectSummary};
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::{SelectionContext, SubjectType, YearLevel};
use crate::session::{Authenticated, Session};
use crate::ui::{Latest, ListState, SelectControl, Shell, load_list, render};

pub const ENTER_SUBJECT_NAME: &str = "Enter subject name";
pub const INVALID_LOAD: &str = "Enter a valid weekly load";
pub const ADD_FAILED: &str = "Failed to add subject";
pub const NO_SUBJECTS_CONFIGURED: &str = "No subjects";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    LoadConfig,
    DivisionAllocation,
}

/// Campos del alta de ramo.
#[derive(Debug, Clone, Default)]
pub struct SubjectForm {
    pub name: String,
    pub subject_type: SubjectType,
    pub lecture_load: String,
    pub practical_load: String,
}

impl SubjectForm {
    /// Sólo se muestra el input de carga que corresponde al tipo de ramo.
    pub fn visible_load_input(&self) -> &'static str {
        if self.subject_type.is_lab() { "practical_load" } else { "lecture_load" }
    }

    fn load_value(&self) -> Result<u32, ClientError> {
        let raw = if self.subject_type.is_lab() { &self.practical_load } else { &self.lecture_load };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse().map_err(|_| ClientError::validation(INVALID_LOAD))
    }
}

pub struct DataInputPage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    section: Mutex<Section>,
    load_ctx: Mutex<SelectionContext>,
    load_semesters: Mutex<SelectControl>,
    form: Mutex<SubjectForm>,
    listing: Latest<ListState<SubjectSummary>>,
    alloc_ctx: Mutex<SelectionContext>,
    alloc_semesters: Mutex<SelectControl>,
    board: AllocationBoard<B>,
}

impl<B: Backend> DataInputPage<B> {
    pub fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        Ok(Self {
            board: AllocationBoard::new(backend.clone(), shell.clone()),
            backend,
            shell,
            auth,
            section: Mutex::new(Section::default()),
            load_ctx: Mutex::new(SelectionContext::default()),
            load_semesters: Mutex::new(SelectControl::semesters_for(None)),
            form: Mutex::new(SubjectForm::default()),
            listing: Latest::new(ListState::default()),
            alloc_ctx: Mutex::new(SelectionContext::default()),
            alloc_semesters: Mutex::new(SelectControl::semesters_for(None)),
        })
    }

    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }

    // ---- secciones ----

    pub fn show_load_config(&self) {
        *self.section.lock() = Section::LoadConfig;
    }

    pub fn show_division_allocation(&self) {
        *self.section.lock() = Section::DivisionAllocation;
    }

    pub fn section(&self) -> Section {
        *self.section.lock()
    }

    // ---- configuración de carga ----

    /// Cambio de año: el selector de semestre vuelve a placeholder + los
    /// semestres del año, y el listado queda vacío.
    pub fn set_load_year(&self, year: Option<YearLevel>) {
        self.load_ctx.lock().set_year(year);
        *self.load_semesters.lock() = SelectControl::semesters_for(year);
        self.listing.invalidate(|l| *l = ListState::NotLoaded);
    }

    /// Cambio de semestre: valida contra el año y recarga el listado.
    pub async fn set_load_semester(&self, semester: Option<u8>) -> Result<(), ClientError> {
        self.load_ctx.lock().set_semester(semester)?;
        self.load_semesters
            .lock()
            .select(&semester.map(|s| s.to_string()).unwrap_or_default())?;
        self.reload_subject_listing().await.map(|_| ())
    }

    pub fn load_semesters(&self) -> SelectControl {
        self.load_semesters.lock().clone()
    }

    pub fn load_context(&self) -> SelectionContext {
        *self.load_ctx.lock()
    }

    pub fn set_subject_name(&self, name: impl Into<String>) {
        self.form.lock().name = name.into();
    }

    pub fn set_subject_type(&self, subject_type: SubjectType) {
        self.form.lock().subject_type = subject_type;
    }

    pub fn set_lecture_load(&self, load: impl Into<String>) {
        self.form.lock().lecture_load = load.into();
    }

    pub fn set_practical_load(&self, load: impl Into<String>) {
        self.form.lock().practical_load = load.into();
    }

    pub fn form(&self) -> SubjectForm {
        self.form.lock().clone()
    }

    /// Arma el alta de ramo desde el estado actual del formulario.
    pub fn new_subject(&self) -> Result<NewSubject, ClientError> {
        let ctx = *self.load_ctx.lock();
        let Some((year, semester)) = ctx.complete() else {
            return Err(ClientError::validation(SELECT_YEAR_AND_SEMESTER));
        };
        let form = self.form.lock().clone();
        let name = form.name.trim();
        if name.is_empty() {
            return Err(ClientError::validation(ENTER_SUBJECT_NAME));
        }
        let load = form.load_value()?;
        let is_lab = form.subject_type.is_lab();

        Ok(NewSubject {
            subject_name: name.to_string(),
            is_lab,
            year_level: year,
            semester,
            weekly_theory_load: if is_lab { 0 } else { load },
            weekly_practical_load: if is_lab { load } else { 0 },
        })
    }

    /// Alta de ramo. Con éxito se limpia el formulario y se recargan sólo las
    /// vistas que dependen del año/semestre del ramo. Una vez aceptado el alta
    /// devuelve `Ok` aunque alguna de esas recargas falle.
    pub async fn add_subject(&self) -> Result<(), ClientError> {
        let subject = match self.new_subject() {
            Ok(s) => s,
            Err(e) => {
                self.shell.alert(e.to_string());
                return Err(e);
            }
        };

        if let Err(e) = self.backend.add_subject(&subject).await {
            warn!("add subject '{}' failed: {e}", subject.subject_name);
            self.shell.alert(ADD_FAILED);
            return Err(e);
        }
        info!("subject '{}' added to {} semester {}", subject.subject_name, subject.year_level, subject.semester);

        {
            let mut form = self.form.lock();
            form.name.clear();
            form.lecture_load.clear();
            form.practical_load.clear();
        }
        // las dos recargas son independientes; sus fallos ya se notifican
        let (listing, table) = join(
            self.reload_subject_listing(),
            self.board.rebuild_if_showing(subject.year_level, subject.semester),
        )
        .await;
        if let Err(e) = listing {
            warn!("subject listing refresh failed after add: {e}");
        }
        if let Err(e) = table {
            warn!("allocation table rebuild failed after add: {e}");
        }
        Ok(())
    }

    /// Invalida y recarga el listado de ramos del año/semestre actual.
    pub async fn reload_subject_listing(&self) -> Result<usize, ClientError> {
        let ctx = *self.load_ctx.lock();
        let Some((year, semester)) = ctx.complete() else {
            self.listing.invalidate(|l| *l = ListState::NotLoaded);
            return Ok(0);
        };
        load_list(
            &self.listing,
            &self.shell,
            "Failed to load subjects",
            self.backend.subjects_by_semester(year, semester),
        )
        .await
    }

    pub fn subject_listing(&self) -> ListState<SubjectSummary> {
        self.listing.snapshot()
    }

    // ---- asignación de divisiones ----

    pub fn set_alloc_year(&self, year: Option<YearLevel>) {
        self.alloc_ctx.lock().set_year(year);
        *self.alloc_semesters.lock() = SelectControl::semesters_for(year);
    }

    pub fn set_alloc_semester(&self, semester: Option<u8>) -> Result<(), ClientError> {
        self.alloc_ctx.lock().set_semester(semester)?;
        self.alloc_semesters
            .lock()
            .select(&semester.map(|s| s.to_string()).unwrap_or_default())
    }

    pub fn alloc_semesters(&self) -> SelectControl {
        self.alloc_semesters.lock().clone()
    }

    pub async fn build_allocation_table(&self) -> Result<usize, ClientError> {
        let ctx = *self.alloc_ctx.lock();
        self.board.build(ctx.year(), ctx.semester()).await
    }

    pub fn allocation(&self) -> &AllocationBoard<B> {
        &self.board
    }

    pub fn select_row_teacher(&self, subject_id: i64, teacher_id: &str) -> Result<(), ClientError> {
        self.board.select_teacher(subject_id, teacher_id)
    }

    pub fn select_row_division(&self, subject_id: i64, class_id: &str) -> Result<(), ClientError> {
        self.board.select_division(subject_id, class_id)
    }

    pub async fn save_allocation(&self, subject_id: i64) -> Result<String, ClientError> {
        self.board.save(subject_id).await
    }

    // ---- vistas ----

    pub fn render_subject_listing(&self) -> Markup {
        let listing = self.subject_listing();
        html! {
            tbody id="subjectList" {
                @match &listing {
                    ListState::NotLoaded => {}
                    ListState::Loading => { (render::info_row(4, "Loading...")) }
                    ListState::Failed => { (render::info_row(4, "Error")) }
                    ListState::Loaded(rows) => {
                        @if rows.is_empty() {
                            (render::info_row(4, NO_SUBJECTS_CONFIGURED))
                        }
                        @for s in rows {
                            tr {
                                td { (s.subject_name) }
                                td { @if s.is_lab.unwrap_or(false) { "Lab" } @else { "Lecture" } }
                                td { (s.weekly_theory_load.unwrap_or(0)) }
                                td { (s.weekly_practical_load.unwrap_or(0)) }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn render(&self) -> Markup {
        let form = self.form();
        html! {
            @match self.section() {
                Section::LoadConfig => {
                    section id="loadConfig" {
                        (render::select("semester", &self.load_semesters()))
                        input name="subject_name" value=(form.name);
                        input name=(form.visible_load_input()) type="number";
                        table { (self.render_subject_listing()) }
                    }
                }
                Section::DivisionAllocation => {
                    section id="divisionAllocation" {
                        (render::select("semester", &self.alloc_semesters()))
                        table { (self.board.render()) }
                    }
                }
            }
        }
    }
}

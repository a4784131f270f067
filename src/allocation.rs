//! Tabla de asignación de divisiones (HOD).
//!
//! Para un año/semestre se piden los ramos pendientes de asignación y se crea
//! una fila por ramo. Cada fila carga por separado sus profesores aprobados y
//! las divisiones del año; las dos cargas se resuelven en cualquier orden.

use std::sync::Arc;

use futures_util::future::{join, join_all};
use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api_json::{AllocationSubject, DivisionAllocation};
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::YearLevel;
use crate::ui::{Cascade, DependentSelect, Latest, Shell, render};

pub const SELECT_YEAR_AND_SEMESTER: &str = "Select year and semester";
pub const NO_SUBJECTS: &str = "No subjects";
pub const NO_TEACHERS: &str = "No teachers";
pub const SELECT_A_TEACHER: &str = "Select a teacher";
pub const SAVED: &str = "Saved";
pub const SAVE_FAILED: &str = "Failed to save allocation";

const COLUMNS: usize = 4;

/// Fila de la tabla. El id del ramo queda fijo al crearla.
#[derive(Debug)]
pub struct AllocationRow {
    subject_id: i64,
    subject_name: String,
    pub teacher: DependentSelect,
    pub division: DependentSelect,
}

impl AllocationRow {
    fn new(subject: &AllocationSubject) -> Self {
        let teacher = DependentSelect::placeholder("Select Teacher");
        let division = DependentSelect::placeholder("Select Division");
        Self {
            subject_id: subject.subject_id,
            subject_name: subject.subject_name.clone(),
            teacher,
            division,
        }
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }
}

#[derive(Debug, Clone, Default)]
pub enum AllocationTable {
    #[default]
    NotBuilt,
    Loading,
    /// El servidor no devolvió ramos: una sola fila informativa.
    NoSubjects,
    Rows(Vec<Arc<AllocationRow>>),
    Failed,
}

impl AllocationTable {
    pub fn rows(&self) -> &[Arc<AllocationRow>] {
        match self {
            AllocationTable::Rows(rows) => rows,
            _ => &[],
        }
    }
}

pub struct AllocationBoard<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    table: Latest<AllocationTable>,
    built_for: Mutex<Option<(YearLevel, u8)>>,
}

impl<B: Backend> AllocationBoard<B> {
    pub fn new(backend: Arc<B>, shell: Arc<Shell>) -> Self {
        Self {
            backend,
            shell,
            table: Latest::new(AllocationTable::NotBuilt),
            built_for: Mutex::new(None),
        }
    }

    pub fn table(&self) -> AllocationTable {
        self.table.snapshot()
    }

    /// Año/semestre de la última tabla construida.
    pub fn built_for(&self) -> Option<(YearLevel, u8)> {
        *self.built_for.lock()
    }

    pub fn row(&self, subject_id: i64) -> Option<Arc<AllocationRow>> {
        self.table
            .read(|t| t.rows().iter().find(|r| r.subject_id == subject_id).cloned())
    }

    /// Construye la tabla y espera a que terminen las cargas por fila.
    /// Devuelve el número de filas creadas (0 si no hubo ramos o si otra
    /// construcción más nueva la reemplazó).
    pub async fn build(&self, year: Option<YearLevel>, semester: Option<u8>) -> Result<usize, ClientError> {
        let (Some(year), Some(semester)) = (year, semester) else {
            self.shell.alert(SELECT_YEAR_AND_SEMESTER);
            return Err(ClientError::validation(SELECT_YEAR_AND_SEMESTER));
        };

        let ticket = self.table.issue(|t| *t = AllocationTable::Loading);
        info!("building allocation table for {year} semester {semester}");

        let subjects = match self.backend.subjects_for_allocation(year, semester).await {
            Ok(s) => s,
            Err(e) => {
                warn!("subjects-for-allocation failed: {e}");
                if self.table.apply(ticket, |t| *t = AllocationTable::Failed) {
                    self.shell.toast("Failed to load subjects");
                }
                return Err(e);
            }
        };

        if subjects.is_empty() {
            if self.table.apply(ticket, |t| *t = AllocationTable::NoSubjects) {
                *self.built_for.lock() = Some((year, semester));
            }
            return Ok(0);
        }

        // filas creadas de forma síncrona, en el orden de la respuesta
        let rows: Vec<Arc<AllocationRow>> = subjects.iter().map(|s| Arc::new(AllocationRow::new(s))).collect();
        for row in &rows {
            row.teacher.update(|c| c.set_loading());
            row.division.update(|c| c.set_loading());
        }

        if !self.table.apply(ticket, |t| *t = AllocationTable::Rows(rows.clone())) {
            debug!("discarding stale allocation table ({} subjects)", rows.len());
            return Ok(0);
        }
        *self.built_for.lock() = Some((year, semester));

        join_all(rows.iter().map(|row| self.load_row(year, semester, row))).await;
        Ok(rows.len())
    }

    /// Reconstruye la tabla sólo si está mostrando `year`/`semester`.
    pub async fn rebuild_if_showing(&self, year: YearLevel, semester: u8) -> Result<bool, ClientError> {
        if self.built_for() != Some((year, semester)) {
            return Ok(false);
        }
        self.build(Some(year), Some(semester)).await?;
        Ok(true)
    }

    async fn load_row(&self, year: YearLevel, semester: u8, row: &AllocationRow) {
        let backend = &self.backend;
        let teachers = Cascade::new(&self.shell, &[&row.teacher])
            .when_empty(NO_TEACHERS)
            .on_failure("Failed to load teachers")
            .load(Some(row.subject_name.as_str()), |subject| {
                backend.approved_teachers(year, semester, subject)
            });
        let divisions = Cascade::new(&self.shell, &[&row.division])
            .on_failure("Failed to load divisions")
            .load(Some(year), |y| backend.classes(Some(y)));

        let (t, d) = join(teachers, divisions).await;
        debug!("row {} loaded: teachers {t:?}, divisions {d:?}", row.subject_id);
    }

    pub fn select_teacher(&self, subject_id: i64, teacher_id: &str) -> Result<(), ClientError> {
        self.require_row(subject_id)?.teacher.select(teacher_id)
    }

    pub fn select_division(&self, subject_id: i64, class_id: &str) -> Result<(), ClientError> {
        self.require_row(subject_id)?.division.select(class_id)
    }

    /// Guarda la asignación de una fila. Devuelve el mensaje mostrado.
    pub async fn save(&self, subject_id: i64) -> Result<String, ClientError> {
        let row = self.require_row(subject_id)?;

        let Some(teacher) = row.teacher.value() else {
            self.shell.alert(SELECT_A_TEACHER);
            return Err(ClientError::validation(SELECT_A_TEACHER));
        };
        let allocation = DivisionAllocation {
            teacher_id: parse_id(&teacher)?,
            subject_id: row.subject_id,
            class_id: row.division.value().map(|v| parse_id(&v)).transpose()?,
        };

        match self.backend.save_division_allocation(&allocation).await {
            Ok(reply) => {
                let text = reply.message.unwrap_or_else(|| SAVED.to_string());
                info!("allocation saved for subject {subject_id}");
                self.shell.alert(text.clone());
                Ok(text)
            }
            Err(e) => {
                warn!("division allocation failed for subject {subject_id}: {e}");
                self.shell.alert(SAVE_FAILED);
                Err(e)
            }
        }
    }

    fn require_row(&self, subject_id: i64) -> Result<Arc<AllocationRow>, ClientError> {
        self.row(subject_id)
            .ok_or_else(|| ClientError::validation(format!("no allocation row for subject {subject_id}")))
    }

    pub fn render(&self) -> Markup {
        let table = self.table();
        html! {
            tbody id="allocationTable" {
                @match &table {
                    AllocationTable::NotBuilt => {}
                    AllocationTable::Loading => { (render::info_row(COLUMNS, "Loading...")) }
                    AllocationTable::NoSubjects => { (render::info_row(COLUMNS, NO_SUBJECTS)) }
                    AllocationTable::Failed => { (render::info_row(COLUMNS, "Error")) }
                    AllocationTable::Rows(rows) => {
                        @for row in rows {
                            tr {
                                td { (row.subject_name) }
                                td { (render::select("teacher", &row.teacher.snapshot())) }
                                td { (render::select("division", &row.division.snapshot())) }
                                td { button data-subject=(row.subject_id) { "Save" } }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Los ids llegan como texto en las opciones; el contrato los quiere enteros.
pub(crate) fn parse_id(value: &str) -> Result<i64, ClientError> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::validation(format!("'{value}' is not a valid id")))
}

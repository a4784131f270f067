//! Formulario de preferencias del profesor.
//!
//! Tres bloques (SE/TE/BE), cada uno con su selector de semestre y tres
//! selectores de preferencia que dependen del semestre elegido.

use std::sync::Arc;

use maud::{Markup, html};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::report_failure;
use crate::api_json::{PreferencePayload, YearPreferences};
use crate::backend::Backend;
use crate::error::ClientError;
use crate::models::{StatusMessage, YearLevel};
use crate::session::{Authenticated, Session};
use crate::ui::select::SELECT;
use crate::ui::{Cascade, DependentSelect, LoadOutcome, SelectControl, Shell, render};

pub const REQUIRED_FIELDS: &str = "Please fill all required fields";
pub const SUBMITTED: &str = "Preferences submitted successfully";
pub const SUBMIT_FAILED: &str = "Failed to submit preferences";

#[derive(Debug, Clone, Default)]
struct Identity {
    faculty_name: String,
    short_name: String,
    designation: String,
    willing_for_practical: bool,
}

#[derive(Debug)]
pub struct YearBlock {
    year: YearLevel,
    semester: Mutex<SelectControl>,
    prefs: [DependentSelect; 3],
}

impl YearBlock {
    fn new(year: YearLevel) -> Self {
        Self {
            year,
            semester: Mutex::new(SelectControl::semesters_for(Some(year))),
            prefs: std::array::from_fn(|_| DependentSelect::placeholder(SELECT)),
        }
    }

    pub fn year(&self) -> YearLevel {
        self.year
    }

    pub fn semester(&self) -> SelectControl {
        self.semester.lock().clone()
    }

    pub fn preference(&self, slot: usize) -> Option<SelectControl> {
        self.prefs.get(slot).map(DependentSelect::snapshot)
    }

    fn payload(&self) -> YearPreferences {
        YearPreferences {
            semester: self.semester.lock().raw_value(),
            prefs: std::array::from_fn(|i| self.prefs[i].read(SelectControl::raw_value)),
        }
    }

    fn reset(&self) {
        self.semester.lock().clear_selection();
        for p in &self.prefs {
            p.reset();
        }
    }
}

pub struct FacultyPage<B> {
    backend: Arc<B>,
    shell: Arc<Shell>,
    auth: Authenticated,
    identity: Mutex<Identity>,
    blocks: [YearBlock; 3],
    message: Mutex<Option<StatusMessage>>,
}

impl<B: Backend> FacultyPage<B> {
    /// Inicializa la página; sin sesión no se construye.
    pub fn init(backend: Arc<B>, session: &Session, shell: Arc<Shell>) -> Result<Self, ClientError> {
        let auth = session.guard(&shell)?;
        Ok(Self {
            backend,
            shell,
            auth,
            identity: Mutex::new(Identity::default()),
            blocks: YearLevel::ALL.map(YearBlock::new),
            message: Mutex::new(None),
        })
    }

    pub fn block(&self, year: YearLevel) -> &YearBlock {
        match year {
            YearLevel::SE => &self.blocks[0],
            YearLevel::TE => &self.blocks[1],
            YearLevel::BE => &self.blocks[2],
        }
    }

    pub fn message(&self) -> Option<StatusMessage> {
        self.message.lock().clone()
    }

    pub fn set_faculty_name(&self, value: impl Into<String>) {
        self.identity.lock().faculty_name = value.into();
    }

    pub fn set_short_name(&self, value: impl Into<String>) {
        self.identity.lock().short_name = value.into();
    }

    pub fn set_designation(&self, value: impl Into<String>) {
        self.identity.lock().designation = value.into();
    }

    pub fn set_willing_for_practical(&self, willing: bool) {
        self.identity.lock().willing_for_practical = willing;
    }

    /// Cambio del semestre de un bloque: recarga sus tres preferencias.
    /// `None` las deja en placeholder sin pedir nada.
    pub async fn select_semester(&self, year: YearLevel, semester: Option<u8>) -> Result<LoadOutcome, ClientError> {
        let block = self.block(year);
        let value = semester.map(|s| s.to_string()).unwrap_or_default();
        block.semester.lock().select(&value)?;

        let [a, b, c] = &block.prefs;
        let outcome = Cascade::new(&self.shell, &[a, b, c])
            .on_failure("Failed to load subjects")
            .load(semester, |s| self.backend.subjects_by_semester(year, s))
            .await;
        debug!("{year} preferences for semester {value:?}: {outcome:?}");
        Ok(outcome)
    }

    pub fn select_preference(&self, year: YearLevel, slot: usize, subject: &str) -> Result<(), ClientError> {
        let pref = self
            .block(year)
            .prefs
            .get(slot)
            .ok_or_else(|| ClientError::validation(format!("preference slot {slot} out of range")))?;
        pref.select(subject)
    }

    /// Arma el payload completo en un solo paso a partir del estado actual.
    pub fn payload(&self) -> Result<PreferencePayload, ClientError> {
        let id = self.identity.lock().clone();
        let faculty_name = id.faculty_name.trim();
        let short_name = id.short_name.trim();
        let designation = id.designation.trim();
        if faculty_name.is_empty() || short_name.is_empty() || designation.is_empty() {
            return Err(ClientError::validation(REQUIRED_FIELDS));
        }

        Ok(PreferencePayload {
            faculty_id: self.auth.user_id().to_string(),
            faculty_name: faculty_name.to_string(),
            short_name: short_name.to_string(),
            designation: designation.to_string(),
            willing_for_practical: id.willing_for_practical,
            se: self.block(YearLevel::SE).payload(),
            te: self.block(YearLevel::TE).payload(),
            be: self.block(YearLevel::BE).payload(),
        })
    }

    pub async fn submit(&self) -> Result<(), ClientError> {
        let payload = match self.payload() {
            Ok(p) => p,
            Err(e) => {
                self.shell.alert(REQUIRED_FIELDS);
                return Err(e);
            }
        };

        match self.backend.submit_preferences(&payload).await {
            Ok(reply) => {
                info!("preferences submitted for faculty {}", payload.faculty_id);
                let text = reply.message.unwrap_or_else(|| SUBMITTED.to_string());
                *self.message.lock() = Some(StatusMessage::success(text));
                self.reset();
                Ok(())
            }
            Err(e) => {
                report_failure(&self.shell, &self.message, &e, SUBMIT_FAILED);
                Err(e)
            }
        }
    }

    fn reset(&self) {
        *self.identity.lock() = Identity::default();
        for block in &self.blocks {
            block.reset();
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            @for block in &self.blocks {
                fieldset id=(block.year.as_str()) {
                    legend { (block.year) }
                    (render::select("semester", &block.semester()))
                    @for pref in &block.prefs {
                        (render::select("pref", &pref.snapshot()))
                    }
                }
            }
            (render::status_message("msg", self.message().as_ref()))
        }
    }
}

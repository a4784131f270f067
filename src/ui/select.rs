//! Modelo de vista de un `<select>`.
//!
//! Invariante: la lista de opciones siempre empieza con la opción centinela
//! de valor vacío ("no seleccionado"). El texto de la centinela cambia según
//! el estado (placeholder, "Loading...", "Error", "No teachers", ...).

use crate::api_json::{Batch, ClassInfo, SubjectRef, SubjectSummary, Teacher, WillingFaculty};
use crate::error::ClientError;
use crate::models::YearLevel;

pub const SELECT: &str = "Select";
pub const LOADING: &str = "Loading...";
pub const LOAD_ERROR: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// Conversión de una fila del backend a una opción.
pub trait AsOption {
    fn as_option(&self) -> OptionItem;
}

impl AsOption for OptionItem {
    fn as_option(&self) -> OptionItem {
        self.clone()
    }
}

impl AsOption for Teacher {
    fn as_option(&self) -> OptionItem {
        OptionItem::new(&self.teacher_id, &self.teacher_name)
    }
}

impl AsOption for ClassInfo {
    fn as_option(&self) -> OptionItem {
        OptionItem::new(&self.class_id, &self.class_name)
    }
}

impl AsOption for SubjectRef {
    fn as_option(&self) -> OptionItem {
        OptionItem::new(&self.subject_id, &self.subject_name)
    }
}

impl AsOption for Batch {
    fn as_option(&self) -> OptionItem {
        OptionItem::new(&self.batch_id, &self.batch_name)
    }
}

impl AsOption for WillingFaculty {
    fn as_option(&self) -> OptionItem {
        match self.short_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(short) => OptionItem::new(&self.faculty_id, format!("{} ({short})", self.faculty_name)),
            None => OptionItem::new(&self.faculty_id, &self.faculty_name),
        }
    }
}

// los selectores de preferencia usan el nombre del ramo como valor
impl AsOption for SubjectSummary {
    fn as_option(&self) -> OptionItem {
        OptionItem::new(&self.subject_name, &self.subject_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    placeholder: String,
    sentinel: String,
    items: Vec<OptionItem>,
    selected: Option<String>,
    status: SelectStatus,
}

impl SelectControl {
    pub fn new(placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        Self {
            sentinel: placeholder.clone(),
            placeholder,
            items: Vec::new(),
            selected: None,
            status: SelectStatus::Idle,
        }
    }

    pub fn with_items(placeholder: impl Into<String>, items: Vec<OptionItem>) -> Self {
        let mut control = Self::new(placeholder);
        control.fill(items);
        control
    }

    /// Selector de semestres derivado del año: placeholder + semestres en orden
    /// ascendente; sin año queda sólo el placeholder.
    pub fn semesters_for(year: Option<YearLevel>) -> Self {
        let items = year
            .map(|y| {
                y.semesters()
                    .iter()
                    .map(|s| OptionItem::new(s.to_string(), format!("Semester {s}")))
                    .collect()
            })
            .unwrap_or_default();
        let mut control = Self::new(SELECT);
        if year.is_some() {
            control.fill(items);
        }
        control
    }

    pub fn reset(&mut self) {
        self.sentinel = self.placeholder.clone();
        self.items.clear();
        self.selected = None;
        self.status = SelectStatus::Idle;
    }

    pub fn set_loading(&mut self) {
        self.sentinel = LOADING.to_string();
        self.items.clear();
        self.selected = None;
        self.status = SelectStatus::Loading;
    }

    /// Reemplaza las opciones por `items` (orden del servidor, sin mezclar con
    /// resultados anteriores).
    pub fn fill(&mut self, items: Vec<OptionItem>) {
        self.sentinel = self.placeholder.clone();
        self.items = items;
        self.selected = None;
        self.status = SelectStatus::Ready;
    }

    /// Como `fill`, pero con una centinela distinta si no llegó nada.
    pub fn fill_or(&mut self, items: Vec<OptionItem>, empty_label: Option<&str>) {
        let empty = items.is_empty();
        self.fill(items);
        if let (true, Some(label)) = (empty, empty_label) {
            self.sentinel = label.to_string();
        }
    }

    pub fn fail(&mut self) {
        self.sentinel = LOAD_ERROR.to_string();
        self.items.clear();
        self.selected = None;
        self.status = SelectStatus::Failed;
    }

    /// Selecciona `value`; el valor vacío deselecciona.
    pub fn select(&mut self, value: &str) -> Result<(), ClientError> {
        if value.is_empty() {
            self.selected = None;
            return Ok(());
        }
        if !self.items.iter().any(|o| o.value == value) {
            return Err(ClientError::validation(format!("'{value}' is not an available option")));
        }
        self.selected = Some(value.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Valor como lo leería el DOM: cadena vacía si no hay selección.
    pub fn raw_value(&self) -> String {
        self.selected.clone().unwrap_or_default()
    }

    pub fn selected_label(&self) -> Option<&str> {
        let value = self.selected.as_deref()?;
        self.items.iter().find(|o| o.value == value).map(|o| o.label.as_str())
    }

    pub fn items(&self) -> &[OptionItem] {
        &self.items
    }

    /// Todas las opciones renderizables, centinela primero.
    pub fn options(&self) -> Vec<OptionItem> {
        let mut all = Vec::with_capacity(self.items.len() + 1);
        all.push(OptionItem::new("", &self.sentinel));
        all.extend(self.items.iter().cloned());
        all
    }

    pub fn sentinel_label(&self) -> &str {
        &self.sentinel
    }

    pub fn status(&self) -> SelectStatus {
        self.status
    }

    pub fn is_placeholder(&self) -> bool {
        self.items.is_empty()
    }
}

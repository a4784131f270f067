// Estructuras de datos principales del portal

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Nivel de año académico (Second, Third y Final Year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearLevel {
    SE,
    TE,
    BE,
}

impl YearLevel {
    pub const ALL: [YearLevel; 3] = [YearLevel::SE, YearLevel::TE, YearLevel::BE];

    /// Semestres válidos para el año, en orden ascendente.
    pub fn semesters(self) -> [u8; 2] {
        match self {
            YearLevel::SE => [3, 4],
            YearLevel::TE => [5, 6],
            YearLevel::BE => [7, 8],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YearLevel::SE => "SE",
            YearLevel::TE => "TE",
            YearLevel::BE => "BE",
        }
    }

    pub fn allows(self, semester: u8) -> bool {
        self.semesters().contains(&semester)
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SE" => Ok(YearLevel::SE),
            "TE" => Ok(YearLevel::TE),
            "BE" => Ok(YearLevel::BE),
            other => Err(ClientError::validation(format!("unknown year level '{other}'"))),
        }
    }
}

/// Año + semestre seleccionados en un par de selectores en cascada.
///
/// Cambiar el año siempre limpia el semestre; el semestre sólo puede tomar
/// uno de los valores del año (o quedar vacío).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionContext {
    year: Option<YearLevel>,
    semester: Option<u8>,
}

impl SelectionContext {
    pub fn year(&self) -> Option<YearLevel> {
        self.year
    }

    pub fn semester(&self) -> Option<u8> {
        self.semester
    }

    pub fn set_year(&mut self, year: Option<YearLevel>) {
        self.year = year;
        self.semester = None;
    }

    pub fn set_semester(&mut self, semester: Option<u8>) -> Result<(), ClientError> {
        match (self.year, semester) {
            (_, None) => {
                self.semester = None;
                Ok(())
            }
            (Some(year), Some(s)) if year.allows(s) => {
                self.semester = Some(s);
                Ok(())
            }
            (Some(year), Some(s)) => Err(ClientError::validation(format!(
                "semester {s} does not belong to {year}"
            ))),
            (None, Some(_)) => Err(ClientError::validation("Select year first")),
        }
    }

    /// Devuelve `(año, semestre)` sólo si ambos están seleccionados.
    pub fn complete(&self) -> Option<(YearLevel, u8)> {
        Some((self.year?, self.semester?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubjectType {
    #[default]
    Lecture,
    Lab,
}

impl SubjectType {
    pub fn is_lab(self) -> bool {
        matches!(self, SubjectType::Lab)
    }
}

impl FromStr for SubjectType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lecture" => Ok(SubjectType::Lecture),
            "lab" => Ok(SubjectType::Lab),
            other => Err(ClientError::validation(format!("unknown subject type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// Contenido de la región de mensajes de una página.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        StatusMessage { text: text.into(), tone: Tone::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage { text: text.into(), tone: Tone::Error }
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::YearLevel;

/// Acepta ids que el servidor entrega como número o como texto y los guarda
/// siempre como `String` (igual que el valor de un `<option>`).
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn semester_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSemester {
        Num(i64),
        Text(String),
        Missing(()),
    }

    Ok(match RawSemester::deserialize(deserializer)? {
        RawSemester::Num(n) => n.to_string(),
        RawSemester::Text(s) => s,
        RawSemester::Missing(()) => String::new(),
    })
}

/// Cuerpo de `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub user_id: String,
    pub redirect: String,
}

/// Respuesta genérica `{ "message": ... }` / `{ "error": ... }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerMessage {
    /// Texto a mostrar: `error` tiene prioridad sobre `message`.
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Preferencias de un nivel (SE/TE/BE): semestre + 3 ramos en orden.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearPreferences {
    pub semester: String,
    pub prefs: [String; 3],
}

/// Payload de `POST /api/faculty/preferences`.
///
/// # Estructura del JSON enviado:
/// ```json
/// {
///   "faculty_id": "17",
///   "faculty_name": "Anita Kulkarni",
///   "short_name": "AK",
///   "designation": "Assistant Professor",
///   "willing_for_practical": true,
///   "SE": { "semester": "3", "prefs": ["DSA", "OOP", ""] },
///   "TE": { "semester": "", "prefs": ["", "", ""] },
///   "BE": { "semester": "7", "prefs": ["ML", "", ""] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencePayload {
    pub faculty_id: String,
    pub faculty_name: String,
    pub short_name: String,
    pub designation: String,
    pub willing_for_practical: bool,
    #[serde(rename = "SE")]
    pub se: YearPreferences,
    #[serde(rename = "TE")]
    pub te: YearPreferences,
    #[serde(rename = "BE")]
    pub be: YearPreferences,
}

/// Fila de `GET /api/hod/subjects-by-semester`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectSummary {
    #[serde(default, deserialize_with = "opt_id_as_string")]
    pub subject_id: Option<String>,
    pub subject_name: String,
    #[serde(default)]
    pub is_lab: Option<bool>,
    #[serde(default)]
    pub weekly_theory_load: Option<i64>,
    #[serde(default)]
    pub weekly_practical_load: Option<i64>,
}

fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "id_as_string")] String);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|Wrap(s)| s))
}

/// Payload de `POST /api/hod/add-subject-with-load`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubject {
    pub subject_name: String,
    pub is_lab: bool,
    pub year_level: YearLevel,
    pub semester: u8,
    pub weekly_theory_load: u32,
    pub weekly_practical_load: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationSubject {
    pub subject_id: i64,
    pub subject_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Teacher {
    #[serde(deserialize_with = "id_as_string")]
    pub teacher_id: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassInfo {
    #[serde(deserialize_with = "id_as_string")]
    pub class_id: String,
    pub class_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRef {
    #[serde(deserialize_with = "id_as_string")]
    pub subject_id: String,
    pub subject_name: String,
}

/// Payload de `POST /api/hod/division-allocation`. `class_id` viaja como
/// `null` cuando no hay división seleccionada.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionAllocation {
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectLoad {
    #[serde(default)]
    pub weekly_theory_load: Option<i64>,
}

impl SubjectLoad {
    pub fn theory_or_zero(&self) -> i64 {
        self.weekly_theory_load.unwrap_or(0)
    }
}

/// Payload de `POST /api/hod/lecture-allocation`: los valores crudos de los
/// tres selectores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureAllocation {
    pub class_id: String,
    pub subject_id: String,
    pub teacher_id: String,
}

/// Fila de `GET /api/hod/preferences` (preferencias en estado PENDING).
#[derive(Debug, Clone, Deserialize)]
pub struct PendingPreference {
    pub id: i64,
    #[serde(deserialize_with = "id_as_string")]
    pub faculty_id: String,
    pub faculty_name: String,
    pub year_level: String,
    #[serde(default, deserialize_with = "semester_as_string")]
    pub semester: String,
    #[serde(default)]
    pub preferences: Vec<Option<String>>,
}

impl PendingPreference {
    /// Ramos preferidos no vacíos, en el orden de preferencia.
    pub fn choices(&self) -> Vec<String> {
        self.preferences
            .iter()
            .flatten()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Approval {
    pub preference_id: i64,
    pub allocated_subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRequest {
    pub approvals: Vec<Approval>,
}

/// Fila de `GET /api/timetable?teacher_id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableEntry {
    pub class: String,
    pub subject: String,
    pub teacher: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub batch: Option<String>,
}

/// Fila de `GET /api/hod/willing-practical-faculty`: profesores aprobados
/// que aceptan dictar prácticos.
#[derive(Debug, Clone, Deserialize)]
pub struct WillingFaculty {
    #[serde(deserialize_with = "id_as_string")]
    pub faculty_id: String,
    pub faculty_name: String,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    #[serde(deserialize_with = "id_as_string")]
    pub batch_id: String,
    pub batch_name: String,
}

/// Payload de `POST /api/hod/allot-practical`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticalAllotment {
    pub faculty_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub batch_id: i64,
}

/// Celda de `GET /api/hod/timetable?class_id=`. `display` trae
/// "Ramo (SIGLA)" y, en laboratorios, `<br>` seguido del lote.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassSlot {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub display: String,
}

impl ClassSlot {
    /// Líneas de `display`, separadas por el `<br>` que agrega el servidor.
    pub fn lines(&self) -> Vec<&str> {
        self.display.split("<br>").map(str::trim).filter(|l| !l.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preference_payload_uses_year_keys() {
        let payload = PreferencePayload {
            faculty_id: "17".into(),
            faculty_name: "Anita Kulkarni".into(),
            short_name: "AK".into(),
            designation: "Assistant Professor".into(),
            willing_for_practical: true,
            se: YearPreferences { semester: "3".into(), prefs: ["DSA".into(), "OOP".into(), String::new()] },
            te: YearPreferences::default(),
            be: YearPreferences { semester: "7".into(), prefs: ["ML".into(), String::new(), String::new()] },
        };

        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["SE"]["prefs"], json!(["DSA", "OOP", ""]));
        assert_eq!(v["TE"]["semester"], json!(""));
        assert_eq!(v["BE"]["semester"], json!("7"));
        assert_eq!(v["willing_for_practical"], json!(true));
        assert!(v.get("se").is_none());
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let t: Teacher = serde_json::from_value(json!({"teacher_id": 4, "teacher_name": "R. Patil"})).unwrap();
        assert_eq!(t.teacher_id, "4");
        let c: ClassInfo = serde_json::from_value(json!({"class_id": "12", "class_name": "SE-A"})).unwrap();
        assert_eq!(c.class_id, "12");
        let login: LoginResponse =
            serde_json::from_value(json!({"user_id": 9, "redirect": "/hod/dashboard"})).unwrap();
        assert_eq!(login.user_id, "9");
    }

    #[test]
    fn test_division_allocation_without_class_is_null() {
        let a = DivisionAllocation { teacher_id: 3, subject_id: 11, class_id: None };
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({"teacher_id": 3, "subject_id": 11, "class_id": null})
        );
    }

    #[test]
    fn test_subject_summary_optional_fields() {
        let rows: Vec<SubjectSummary> = serde_json::from_value(json!([
            {"subject_name": "DBMS"},
            {"subject_id": 2, "subject_name": "CN Lab", "is_lab": true, "weekly_theory_load": 0, "weekly_practical_load": 2}
        ]))
        .unwrap();
        assert!(rows[0].subject_id.is_none());
        assert_eq!(rows[1].subject_id.as_deref(), Some("2"));
        assert_eq!(rows[1].weekly_practical_load, Some(2));
    }

    #[test]
    fn test_pending_preference_choices_skip_blanks() {
        let p: PendingPreference = serde_json::from_value(json!({
            "id": 5, "faculty_id": 2, "faculty_name": "S. Joshi",
            "year_level": "TE", "semester": 5,
            "preferences": ["CN", null, " "]
        }))
        .unwrap();
        assert_eq!(p.semester, "5");
        assert_eq!(p.choices(), vec!["CN".to_string()]);
    }

    #[test]
    fn test_server_message_prefers_error() {
        let m: ServerMessage = serde_json::from_value(json!({"error": "Invalid credentials"})).unwrap();
        assert_eq!(m.text(), Some("Invalid credentials"));
        let m: ServerMessage = serde_json::from_value(json!({"message": "Saved"})).unwrap();
        assert_eq!(m.text(), Some("Saved"));
    }

    #[test]
    fn test_practical_rows_and_slot_lines() {
        let f: WillingFaculty =
            serde_json::from_value(json!({"faculty_id": 7, "faculty_name": "M. Deshmukh", "short_name": "MD"})).unwrap();
        assert_eq!(f.faculty_id, "7");
        let b: Batch = serde_json::from_value(json!({"batch_id": 3, "batch_name": "T1"})).unwrap();
        assert_eq!(b.batch_id, "3");

        let lab: ClassSlot = serde_json::from_value(json!({
            "day": "Monday", "start_time": "10:30:00", "end_time": "12:30:00",
            "display": "CN Lab (MD)<br>T1"
        }))
        .unwrap();
        assert_eq!(lab.lines(), vec!["CN Lab (MD)", "T1"]);
    }
}

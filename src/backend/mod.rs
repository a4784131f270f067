//! Contrato con el backend REST.
//!
//! Las páginas son genéricas sobre [`Backend`]; en producción se usa
//! [`HttpBackend`] (reqwest) y en los tests un backend falso en memoria.

mod http;

pub use http::HttpBackend;

use crate::api_json::{
    AllocationSubject, ApprovalRequest, Batch, ClassInfo, ClassSlot, DivisionAllocation,
    LectureAllocation, LoginRequest, LoginResponse, NewSubject, PendingPreference,
    PracticalAllotment, PreferencePayload, ServerMessage, SubjectLoad, SubjectRef, SubjectSummary,
    Teacher, TimetableEntry, WillingFaculty,
};
use crate::error::ClientError;
use crate::models::YearLevel;

pub type ApiResult<T> = Result<T, ClientError>;

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// POST /api/login
    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse>;

    /// POST /api/faculty/preferences
    async fn submit_preferences(&self, payload: &PreferencePayload) -> ApiResult<ServerMessage>;

    /// GET /api/hod/subjects-by-semester?year&semester
    async fn subjects_by_semester(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectSummary>>;

    /// POST /api/hod/add-subject-with-load
    async fn add_subject(&self, subject: &NewSubject) -> ApiResult<ServerMessage>;

    /// GET /api/hod/subjects-for-allocation?year&semester
    async fn subjects_for_allocation(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<AllocationSubject>>;

    /// GET /api/hod/approved-teachers?year&semester&subject
    async fn approved_teachers(&self, year: YearLevel, semester: u8, subject: &str) -> ApiResult<Vec<Teacher>>;

    /// GET /api/classes (opcionalmente filtrado por `?year=`)
    async fn classes(&self, year: Option<YearLevel>) -> ApiResult<Vec<ClassInfo>>;

    /// POST /api/hod/division-allocation
    async fn save_division_allocation(&self, allocation: &DivisionAllocation) -> ApiResult<ServerMessage>;

    /// GET /api/subjects/all
    async fn all_subjects(&self) -> ApiResult<Vec<SubjectRef>>;

    /// GET /api/teachers
    async fn teachers(&self) -> ApiResult<Vec<Teacher>>;

    /// GET /api/hod/subject-load?subject_id&class_id
    async fn subject_load(&self, subject_id: &str, class_id: &str) -> ApiResult<SubjectLoad>;

    /// POST /api/hod/lecture-allocation
    async fn lecture_allocation(&self, allocation: &LectureAllocation) -> ApiResult<ServerMessage>;

    /// GET /api/hod/preferences
    async fn pending_preferences(&self) -> ApiResult<Vec<PendingPreference>>;

    /// POST /api/hod/approve-preferences
    async fn approve_preferences(&self, req: &ApprovalRequest) -> ApiResult<ServerMessage>;

    /// DELETE /api/hod/delete-preference/{id}
    async fn delete_preference(&self, preference_id: i64) -> ApiResult<ServerMessage>;

    /// GET /api/timetable?teacher_id
    async fn timetable(&self, teacher_id: &str) -> ApiResult<Vec<TimetableEntry>>;

    /// GET /api/hod/lab-subjects?year&semester
    async fn lab_subjects(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectRef>>;

    /// GET /api/hod/willing-practical-faculty
    async fn willing_practical_faculty(&self) -> ApiResult<Vec<WillingFaculty>>;

    /// GET /api/class-batches?class_id
    async fn class_batches(&self, class_id: &str) -> ApiResult<Vec<Batch>>;

    /// POST /api/hod/allot-practical
    async fn allot_practical(&self, allotment: &PracticalAllotment) -> ApiResult<ServerMessage>;

    /// GET /api/hod/timetable?class_id
    async fn class_timetable(&self, class_id: &str) -> ApiResult<Vec<ClassSlot>>;
}

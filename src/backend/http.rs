use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::{ApiResult, Backend};
use crate::api_json::{
    AllocationSubject, ApprovalRequest, Batch, ClassInfo, ClassSlot, DivisionAllocation,
    LectureAllocation, LoginRequest, LoginResponse, NewSubject, PendingPreference,
    PracticalAllotment, PreferencePayload, ServerMessage, SubjectLoad, SubjectRef, SubjectSummary,
    Teacher, TimetableEntry, WillingFaculty,
};
use crate::config::Config;
use crate::error::ClientError;
use crate::models::YearLevel;

/// Backend real: JSON sobre HTTP con `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.api_url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let mut req = self.request(Method::GET, path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(path, req).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.send(path, self.request(Method::POST, path).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, req: RequestBuilder) -> ApiResult<T> {
        debug!("-> {path}");
        let res = req.send().await.map_err(|e| {
            warn!("{path}: transport failure: {e}");
            ClientError::from(e)
        })?;

        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            // el cuerpo suele traer {"error": ...}; cualquier otra cosa es sin mensaje
            let message = serde_json::from_str::<ServerMessage>(&text)
                .ok()
                .and_then(|m| m.text().map(str::to_string));
            warn!("{path}: server responded {status}");
            return Err(ClientError::Server { status: status.as_u16(), message });
        }

        debug!("<- {path} {status}");
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post_json("/api/login", req).await
    }

    async fn submit_preferences(&self, payload: &PreferencePayload) -> ApiResult<ServerMessage> {
        self.post_json("/api/faculty/preferences", payload).await
    }

    async fn subjects_by_semester(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectSummary>> {
        self.get_json(
            "/api/hod/subjects-by-semester",
            &[("year", year.to_string()), ("semester", semester.to_string())],
        )
        .await
    }

    async fn add_subject(&self, subject: &NewSubject) -> ApiResult<ServerMessage> {
        self.post_json("/api/hod/add-subject-with-load", subject).await
    }

    async fn subjects_for_allocation(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<AllocationSubject>> {
        self.get_json(
            "/api/hod/subjects-for-allocation",
            &[("year", year.to_string()), ("semester", semester.to_string())],
        )
        .await
    }

    async fn approved_teachers(&self, year: YearLevel, semester: u8, subject: &str) -> ApiResult<Vec<Teacher>> {
        self.get_json(
            "/api/hod/approved-teachers",
            &[
                ("year", year.to_string()),
                ("semester", semester.to_string()),
                ("subject", subject.to_string()),
            ],
        )
        .await
    }

    async fn classes(&self, year: Option<YearLevel>) -> ApiResult<Vec<ClassInfo>> {
        match year {
            Some(y) => self.get_json("/api/classes", &[("year", y.to_string())]).await,
            None => self.get_json("/api/classes", &[]).await,
        }
    }

    async fn save_division_allocation(&self, allocation: &DivisionAllocation) -> ApiResult<ServerMessage> {
        self.post_json("/api/hod/division-allocation", allocation).await
    }

    async fn all_subjects(&self) -> ApiResult<Vec<SubjectRef>> {
        self.get_json("/api/subjects/all", &[]).await
    }

    async fn teachers(&self) -> ApiResult<Vec<Teacher>> {
        self.get_json("/api/teachers", &[]).await
    }

    async fn subject_load(&self, subject_id: &str, class_id: &str) -> ApiResult<SubjectLoad> {
        self.get_json(
            "/api/hod/subject-load",
            &[("subject_id", subject_id.to_string()), ("class_id", class_id.to_string())],
        )
        .await
    }

    async fn lecture_allocation(&self, allocation: &LectureAllocation) -> ApiResult<ServerMessage> {
        self.post_json("/api/hod/lecture-allocation", allocation).await
    }

    async fn pending_preferences(&self) -> ApiResult<Vec<PendingPreference>> {
        self.get_json("/api/hod/preferences", &[]).await
    }

    async fn approve_preferences(&self, req: &ApprovalRequest) -> ApiResult<ServerMessage> {
        self.post_json("/api/hod/approve-preferences", req).await
    }

    async fn delete_preference(&self, preference_id: i64) -> ApiResult<ServerMessage> {
        let path = format!("/api/hod/delete-preference/{preference_id}");
        self.send(&path, self.request(Method::DELETE, &path)).await
    }

    async fn timetable(&self, teacher_id: &str) -> ApiResult<Vec<TimetableEntry>> {
        self.get_json("/api/timetable", &[("teacher_id", teacher_id.to_string())]).await
    }

    async fn lab_subjects(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectRef>> {
        self.get_json(
            "/api/hod/lab-subjects",
            &[("year", year.to_string()), ("semester", semester.to_string())],
        )
        .await
    }

    async fn willing_practical_faculty(&self) -> ApiResult<Vec<WillingFaculty>> {
        self.get_json("/api/hod/willing-practical-faculty", &[]).await
    }

    async fn class_batches(&self, class_id: &str) -> ApiResult<Vec<Batch>> {
        self.get_json("/api/class-batches", &[("class_id", class_id.to_string())]).await
    }

    async fn allot_practical(&self, allotment: &PracticalAllotment) -> ApiResult<ServerMessage> {
        self.post_json("/api/hod/allot-practical", allotment).await
    }

    async fn class_timetable(&self, class_id: &str) -> ApiResult<Vec<ClassSlot>> {
        self.get_json("/api/hod/timetable", &[("class_id", class_id.to_string())]).await
    }
}

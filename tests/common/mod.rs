#![allow(dead_code)]

//! Backend falso en memoria para los tests de páginas.
//!
//! Cada llamada se registra como una cadena ("subjects_by_semester SE 3") y
//! responde con lo que se haya cargado para esa cadena exacta o, si no hay,
//! para el nombre del método. Sin respuesta cargada se devuelve `[]` (o `{}`).
//! Un `gate` retiene la respuesta hasta que el test llame `notify_one`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Notify;

use timetable_portal::api_json::{
    AllocationSubject, ApprovalRequest, Batch, ClassInfo, ClassSlot, DivisionAllocation,
    LectureAllocation, LoginRequest, LoginResponse, NewSubject, PendingPreference,
    PracticalAllotment, PreferencePayload, ServerMessage, SubjectLoad, SubjectRef, SubjectSummary,
    Teacher, TimetableEntry, WillingFaculty,
};
use timetable_portal::backend::{ApiResult, Backend};
use timetable_portal::models::YearLevel;
use timetable_portal::{ClientError, Session};
use timetable_portal::ui::Shell;

#[derive(Debug, Clone)]
pub enum Canned {
    Json(Value),
    Transport,
    Server(u16, Option<String>),
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, Value)>>,
    responses: Mutex<HashMap<String, Canned>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, key: &str, value: Value) {
        self.responses.lock().insert(key.to_string(), Canned::Json(value));
    }

    pub fn fail_transport(&self, key: &str) {
        self.responses.lock().insert(key.to_string(), Canned::Transport);
    }

    pub fn fail_server(&self, key: &str, status: u16, error: Option<&str>) {
        self.responses
            .lock()
            .insert(key.to_string(), Canned::Server(status, error.map(str::to_string)));
    }

    /// La llamada `key` espera a `notify_one` antes de responder.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    pub fn bodies(&self, method: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, b)| b.clone())
            .collect()
    }

    async fn reply<T: DeserializeOwned>(&self, call: String) -> ApiResult<T> {
        self.calls.lock().push(call.clone());

        let gate = self.gates.lock().get(&call).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let method = call.split(' ').next().unwrap_or_default().to_string();
        let canned = {
            let responses = self.responses.lock();
            responses.get(&call).or_else(|| responses.get(&method)).cloned()
        };

        match canned {
            Some(Canned::Json(v)) => Ok(serde_json::from_value(v)?),
            Some(Canned::Transport) => Err(ClientError::Transport(format!("{call}: connection refused"))),
            Some(Canned::Server(status, message)) => Err(ClientError::Server { status, message }),
            None => Ok(serde_json::from_value(json!([])).or_else(|_| serde_json::from_value(json!({})))?),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> ApiResult<T> {
        let value = serde_json::to_value(body)?;
        self.bodies.lock().push((method.to_string(), value));
        self.reply(method.to_string()).await
    }
}

impl Backend for FakeBackend {
    async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post("login", req).await
    }

    async fn submit_preferences(&self, payload: &PreferencePayload) -> ApiResult<ServerMessage> {
        self.post("submit_preferences", payload).await
    }

    async fn subjects_by_semester(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectSummary>> {
        self.reply(format!("subjects_by_semester {year} {semester}")).await
    }

    async fn add_subject(&self, subject: &NewSubject) -> ApiResult<ServerMessage> {
        self.post("add_subject", subject).await
    }

    async fn subjects_for_allocation(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<AllocationSubject>> {
        self.reply(format!("subjects_for_allocation {year} {semester}")).await
    }

    async fn approved_teachers(&self, year: YearLevel, semester: u8, subject: &str) -> ApiResult<Vec<Teacher>> {
        self.reply(format!("approved_teachers {year} {semester} {subject}")).await
    }

    async fn classes(&self, year: Option<YearLevel>) -> ApiResult<Vec<ClassInfo>> {
        match year {
            Some(y) => self.reply(format!("classes {y}")).await,
            None => self.reply("classes".to_string()).await,
        }
    }

    async fn save_division_allocation(&self, allocation: &DivisionAllocation) -> ApiResult<ServerMessage> {
        self.post("save_division_allocation", allocation).await
    }

    async fn all_subjects(&self) -> ApiResult<Vec<SubjectRef>> {
        self.reply("all_subjects".to_string()).await
    }

    async fn teachers(&self) -> ApiResult<Vec<Teacher>> {
        self.reply("teachers".to_string()).await
    }

    async fn subject_load(&self, subject_id: &str, class_id: &str) -> ApiResult<SubjectLoad> {
        self.reply(format!("subject_load {subject_id} {class_id}")).await
    }

    async fn lecture_allocation(&self, allocation: &LectureAllocation) -> ApiResult<ServerMessage> {
        self.post("lecture_allocation", allocation).await
    }

    async fn pending_preferences(&self) -> ApiResult<Vec<PendingPreference>> {
        self.reply("pending_preferences".to_string()).await
    }

    async fn approve_preferences(&self, req: &ApprovalRequest) -> ApiResult<ServerMessage> {
        self.post("approve_preferences", req).await
    }

    async fn delete_preference(&self, preference_id: i64) -> ApiResult<ServerMessage> {
        self.reply(format!("delete_preference {preference_id}")).await
    }

    async fn timetable(&self, teacher_id: &str) -> ApiResult<Vec<TimetableEntry>> {
        self.reply(format!("timetable {teacher_id}")).await
    }

    async fn lab_subjects(&self, year: YearLevel, semester: u8) -> ApiResult<Vec<SubjectRef>> {
        self.reply(format!("lab_subjects {year} {semester}")).await
    }

    async fn willing_practical_faculty(&self) -> ApiResult<Vec<WillingFaculty>> {
        self.reply("willing_practical_faculty".to_string()).await
    }

    async fn class_batches(&self, class_id: &str) -> ApiResult<Vec<Batch>> {
        self.reply(format!("class_batches {class_id}")).await
    }

    async fn allot_practical(&self, allotment: &PracticalAllotment) -> ApiResult<ServerMessage> {
        self.post("allot_practical", allotment).await
    }

    async fn class_timetable(&self, class_id: &str) -> ApiResult<Vec<ClassSlot>> {
        self.reply(format!("class_timetable {class_id}")).await
    }
}

/// Sesión en memoria ya iniciada como `user_id`.
pub fn logged_in(user_id: &str) -> Session {
    let session = Session::in_memory();
    session.begin(user_id).expect("memory store never fails");
    session
}

pub fn shell() -> Arc<Shell> {
    Arc::new(Shell::new())
}

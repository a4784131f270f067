//! `HttpBackend` contra un backend de prueba levantado con actix-web.

use std::collections::HashMap;
use std::net::TcpListener;

use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::{Value, json};

use timetable_portal::api_json::{DivisionAllocation, LoginRequest, PracticalAllotment};
use timetable_portal::backend::{Backend, HttpBackend};
use timetable_portal::error::ErrorKind;
use timetable_portal::models::YearLevel;
use timetable_portal::ClientError;

type Query = web::Query<HashMap<String, String>>;

async fn login_handler(body: web::Json<Value>) -> impl Responder {
    if body["password"] == "secret" {
        HttpResponse::Ok().json(json!({"user_id": 17, "redirect": "/faculty/preferences"}))
    } else {
        HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}))
    }
}

async fn subjects_handler(q: Query) -> impl Responder {
    let name = format!("{}-{}", q.get("year").cloned().unwrap_or_default(), q.get("semester").cloned().unwrap_or_default());
    HttpResponse::Ok().json(json!([{"subject_id": 1, "subject_name": name, "is_lab": false}]))
}

async fn approved_teachers_handler(q: Query) -> impl Responder {
    // devuelve el nombre del ramo tal como llegó, para verificar el encoding
    let subject = q.get("subject").cloned().unwrap_or_default();
    HttpResponse::Ok().json(json!([{"teacher_id": "4", "teacher_name": subject}]))
}

async fn classes_handler(q: Query) -> impl Responder {
    match q.get("year") {
        Some(year) => HttpResponse::Ok().json(json!([{"class_id": 1, "class_name": format!("{year}-A")}])),
        None => HttpResponse::Ok().json(json!([
            {"class_id": 1, "class_name": "SE-A"},
            {"class_id": 2, "class_name": "TE-A"}
        ])),
    }
}

async fn division_allocation_handler(body: web::Json<Value>) -> impl Responder {
    HttpResponse::Ok().json(json!({"message": body.into_inner().to_string()}))
}

async fn delete_handler(path: web::Path<i64>) -> impl Responder {
    HttpResponse::Ok().json(json!({"message": format!("deleted {}", path.into_inner())}))
}

async fn lab_subjects_handler(q: Query) -> impl Responder {
    let name = format!("Lab {}-{}", q.get("year").cloned().unwrap_or_default(), q.get("semester").cloned().unwrap_or_default());
    HttpResponse::Ok().json(json!([{"subject_id": 21, "subject_name": name}]))
}

async fn class_batches_handler(q: Query) -> impl Responder {
    let class = q.get("class_id").cloned().unwrap_or_default();
    HttpResponse::Ok().json(json!([{"batch_id": 4, "batch_name": format!("{class}-T1")}]))
}

async fn allot_practical_handler(body: web::Json<Value>) -> impl Responder {
    if body["batch_id"] == 4 {
        HttpResponse::Ok().json(json!({"message": "Already allotted"}))
    } else {
        HttpResponse::InternalServerError().json(json!({"error": "Failed to allot practical"}))
    }
}

async fn class_timetable_handler(q: Query) -> impl Responder {
    let class = q.get("class_id").cloned().unwrap_or_default();
    HttpResponse::Ok().json(json!([
        {"day": "Monday", "start_time": "10:30:00", "end_time": "12:30:00", "display": format!("CN Lab (MD)<br>{class}-T1")}
    ]))
}

async fn broken_handler() -> impl Responder {
    HttpResponse::InternalServerError().body("Traceback (most recent call last)")
}

async fn wrong_shape_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({"unexpected": true}))
}

/// Levanta el backend de prueba en un puerto efímero y devuelve su URL base.
fn spawn_mock_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    std::thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            HttpServer::new(|| {
                App::new()
                    .route("/api/login", web::post().to(login_handler))
                    .route("/api/hod/subjects-by-semester", web::get().to(subjects_handler))
                    .route("/api/hod/approved-teachers", web::get().to(approved_teachers_handler))
                    .route("/api/classes", web::get().to(classes_handler))
                    .route("/api/hod/division-allocation", web::post().to(division_allocation_handler))
                    .route("/api/hod/delete-preference/{id}", web::delete().to(delete_handler))
                    .route("/api/hod/lab-subjects", web::get().to(lab_subjects_handler))
                    .route("/api/class-batches", web::get().to(class_batches_handler))
                    .route("/api/hod/allot-practical", web::post().to(allot_practical_handler))
                    .route("/api/hod/timetable", web::get().to(class_timetable_handler))
                    .route("/api/teachers", web::get().to(broken_handler))
                    .route("/api/subjects/all", web::get().to(wrong_shape_handler))
            })
            .workers(1)
            .disable_signals()
            .listen(listener)?
            .run()
            .await
        })
    });

    format!("http://{addr}/")
}

fn backend() -> HttpBackend {
    HttpBackend::new(&spawn_mock_backend(), None).unwrap()
}

#[tokio::test]
async fn test_login_success_and_rejection() {
    let backend = backend();

    let ok = backend
        .login(&LoginRequest { email: "a@college.edu".into(), password: "secret".into(), role: "faculty".into() })
        .await
        .unwrap();
    assert_eq!(ok.user_id, "17");
    assert_eq!(ok.redirect, "/faculty/preferences");

    let err = backend
        .login(&LoginRequest { email: "a@college.edu".into(), password: "nope".into(), role: "faculty".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert!(matches!(err, ClientError::Server { status: 401, .. }));
}

#[tokio::test]
async fn test_query_parameters_are_sent_and_encoded() {
    let backend = backend();

    let subjects = backend.subjects_by_semester(YearLevel::TE, 5).await.unwrap();
    assert_eq!(subjects[0].subject_name, "TE-5");
    assert_eq!(subjects[0].subject_id.as_deref(), Some("1"));

    let subject = "Data Structures & Algorithms";
    let teachers = backend.approved_teachers(YearLevel::SE, 3, subject).await.unwrap();
    assert_eq!(teachers[0].teacher_name, subject);

    assert_eq!(backend.classes(Some(YearLevel::BE)).await.unwrap()[0].class_name, "BE-A");
    assert_eq!(backend.classes(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_division_allocation_sends_null_division() {
    let backend = backend();

    let reply = backend
        .save_division_allocation(&DivisionAllocation { teacher_id: 4, subject_id: 31, class_id: None })
        .await
        .unwrap();
    let echoed: Value = serde_json::from_str(reply.message.as_deref().unwrap()).unwrap();
    assert_eq!(echoed, json!({"teacher_id": 4, "subject_id": 31, "class_id": null}));

    let deleted = backend.delete_preference(9).await.unwrap();
    assert_eq!(deleted.message.as_deref(), Some("deleted 9"));
}

#[tokio::test]
async fn test_practical_and_class_timetable_endpoints() {
    let backend = backend();

    assert_eq!(backend.lab_subjects(YearLevel::TE, 5).await.unwrap()[0].subject_name, "Lab TE-5");
    assert_eq!(backend.class_batches("2").await.unwrap()[0].batch_name, "2-T1");

    let reply = backend
        .allot_practical(&PracticalAllotment { faculty_id: 7, subject_id: 21, class_id: 2, batch_id: 4 })
        .await
        .unwrap();
    assert_eq!(reply.message.as_deref(), Some("Already allotted"));
    let err = backend
        .allot_practical(&PracticalAllotment { faculty_id: 7, subject_id: 21, class_id: 2, batch_id: 5 })
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Failed to allot practical"));

    let slots = backend.class_timetable("2").await.unwrap();
    assert_eq!(slots[0].lines(), vec!["CN Lab (MD)", "2-T1"]);
}

#[tokio::test]
async fn test_error_mapping() {
    let backend = backend();

    let err = backend.teachers().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, message: None }));

    let err = backend.all_subjects().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));

    // puerto cerrado: falla de transporte
    let closed = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap()
    };
    let offline = HttpBackend::new(&format!("http://{closed}"), None).unwrap();
    let err = offline.teachers().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

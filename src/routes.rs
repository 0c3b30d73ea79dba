// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, school, student, teacher},
    state::AppState,
    utils::jwt::{auth_middleware, student_middleware, teacher_middleware},
};

/// Assembles the main application router.
///
/// * Public: school directory, registration and logins.
/// * Student routes: syllabus, quizzes, own report.
/// * Teacher routes: roster, grades, reset, reports.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let school_routes = Router::new()
        .route("/", get(school::list_schools))
        .route("/{sekolah_id}/kelas", get(school::list_classes));

    // Layers run bottom-up: auth first, then the role check.
    let student_routes = Router::new()
        .route("/bab/topik", get(student::list_syllabus))
        .route("/quiz/{topik_id}", get(student::get_quiz))
        .route("/quiz/{topik_id}/submit", post(student::submit_quiz))
        .route("/peserta-didik/laporan", get(student::my_report))
        .route_layer(middleware::from_fn(student_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let teacher_routes = Router::new()
        .route(
            "/guru/peserta-didik/kelas/{kelas_id}",
            get(teacher::list_class_students),
        )
        .route(
            "/guru/peserta-didik/{id}/nilai",
            get(teacher::student_grades).delete(teacher::reset_student_grades),
        )
        .route(
            "/guru/peserta-didik/{id}/laporan",
            get(teacher::student_report),
        )
        .route(
            "/guru/peserta-didik/{id}/laporan/cetak",
            get(teacher::print_student_report),
        )
        .route_layer(middleware::from_fn(teacher_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/sekolah", school_routes)
        .route("/peserta-didik/register", post(auth::register_student))
        .route("/peserta-didik/login", post(auth::login_student))
        .route("/guru/login", post(auth::login_teacher))
        .merge(student_routes)
        .merge(teacher_routes);

    Router::new()
        .nest("/api", api)
        // Global middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

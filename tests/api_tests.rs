// tests/api_tests.rs

use std::sync::Arc;

use petualangan_backend::{
    config::Config,
    models::teacher::NewTeacher,
    progress::grading::GradingScale,
    routes,
    state::AppState,
    store::{LearningStore, MemoryStore},
    utils::hash::hash_password,
};
use serde_json::{Value, json};

const TEACHER_NIP: &str = "198001012005012001";
const TEACHER_PASSWORD: &str = "rahasia123";

struct TestApp {
    address: String,
    client: reqwest::Client,
    school_id: i64,
    other_school_id: i64,
    class_id: i64,
    other_class_id: i64,
    /// Chapter 1 [A, B], chapter 2 [A].
    topics: [i64; 3],
    /// Four question ids per topic; the right answer is always "A".
    questions: Vec<Vec<i64>>,
}

/// Spawns the app on a random port, backed by a seeded in-memory store.
async fn spawn_app() -> TestApp {
    let store = MemoryStore::new();

    let school = store
        .add_school("SD Negeri 1 Palangka Raya", Some("ganjil"), Some("2025/2026"))
        .await;
    let other_school = store.add_school("SD Negeri 2", None, None).await;
    let class = store.add_class(school.id, "4A").await;
    let other_class = store.add_class(other_school.id, "4B").await;
    let ch1 = store.add_chapter(class.id, "1", "Makhluk Hidup").await;
    let ch2 = store.add_chapter(class.id, "2", "Energi").await;
    let t1a = store.add_topic(ch1.id, "A", "Tumbuhan").await;
    let t1b = store.add_topic(ch1.id, "B", "Hewan").await;
    let t2a = store.add_topic(ch2.id, "A", "Sumber Energi").await;

    let mut questions = Vec::new();
    for topic in [t1a.id, t1b.id, t2a.id] {
        let mut ids = Vec::new();
        for n in 0..4 {
            ids.push(store.add_question(topic, &format!("Soal {}", n), "A").await.id);
        }
        questions.push(ids);
    }

    store
        .create_teacher(NewTeacher {
            full_name: "Ibu Rina".to_string(),
            nip: TEACHER_NIP.to_string(),
            password_hash: hash_password(TEACHER_PASSWORD).unwrap(),
            school_id: school.id,
        })
        .await
        .unwrap();

    let config = Config {
        database_url: String::new(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        grading: GradingScale::default(),
        seed_teacher: None,
    };

    let state = AppState::new(Arc::new(store), config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        school_id: school.id,
        other_school_id: other_school.id,
        class_id: class.id,
        other_class_id: other_class.id,
        topics: [t1a.id, t1b.id, t2a.id],
        questions,
    }
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a fresh student and returns (student id, token).
    async fn student(&self) -> (i64, String) {
        let nisn = uuid::Uuid::new_v4().simple().to_string()[..10].to_string();

        let response = self
            .client
            .post(self.url("/api/peserta-didik/register"))
            .json(&json!({ "nama": "Budi", "nisn": nisn, "kelas_id": self.class_id }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        let id = body["id"].as_i64().unwrap();

        let response = self
            .client
            .post(self.url("/api/peserta-didik/login"))
            .json(&json!({ "nisn": nisn }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();

        (id, body["token"].as_str().unwrap().to_string())
    }

    async fn teacher_token(&self) -> String {
        let response = self
            .client
            .post(self.url("/api/guru/login"))
            .json(&json!({
                "nip": TEACHER_NIP,
                "password": TEACHER_PASSWORD,
                "sekolah_id": self.school_id
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Submits answers for `topic`, answering the first `correct` questions right.
    async fn submit(&self, token: &str, topic: usize, correct: usize) -> reqwest::Response {
        let answers: Vec<Value> = self.questions[topic]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let jawaban = if i < correct { "A" } else { "B" };
                json!({ "quiz_id": id, "jawaban": jawaban })
            })
            .collect();

        self.client
            .post(self.url(&format!("/api/quiz/{}/submit", self.topics[topic])))
            .bearer_auth(token)
            .json(&json!({ "hasil_quiz": answers }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn get_json(&self, path: &str, token: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

#[tokio::test]
async fn health_check_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn school_directory_is_public() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/api/sekolah")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let schools: Value = response.json().await.unwrap();
    assert_eq!(schools.as_array().unwrap().len(), 2);

    let response = app
        .client
        .get(app.url(&format!("/api/sekolah/{}/kelas", app.school_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let classes: Value = response.json().await.unwrap();
    assert_eq!(classes[0]["name"], "4A");

    let response = app
        .client
        .get(app.url("/api/sekolah/999999/kelas"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let app = spawn_app().await;

    let cases = [
        (json!({ "nama": "", "nisn": "0011223344", "kelas_id": app.class_id }), 400),
        (json!({ "nama": "   ", "nisn": "0011223344", "kelas_id": app.class_id }), 400),
        (json!({ "nama": "Ani", "nisn": "0011223344", "kelas_id": 999999 }), 404),
    ];

    for (body, expected) in cases {
        let response = app
            .client
            .post(app.url("/api/peserta-didik/register"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), expected, "body: {}", body);
    }
}

#[tokio::test]
async fn register_duplicate_nisn_conflicts() {
    let app = spawn_app().await;
    let body = json!({ "nama": "Ani", "nisn": "0011223344", "kelas_id": app.class_id });

    let first = app
        .client
        .post(app.url("/api/peserta-didik/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = app
        .client
        .post(app.url("/api/peserta-didik/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn login_unknown_nisn_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/peserta-didik/login"))
        .json(&json!({ "nisn": "does-not-exist" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/api/bab/topik")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .client
        .get(app.url("/api/bab/topik"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn roles_are_enforced() {
    let app = spawn_app().await;
    let (student_id, student_token) = app.student().await;
    let teacher_token = app.teacher_token().await;

    let (status, _) = app
        .get_json(&format!("/api/guru/peserta-didik/{}/nilai", student_id), &student_token)
        .await;
    assert_eq!(status, 403);

    let (status, _) = app.get_json("/api/bab/topik", &teacher_token).await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn progression_unlocks_next_chapter() {
    let app = spawn_app().await;
    let (_, token) = app.student().await;

    // Fresh student: chapter 1 open, chapter 2 locked.
    let (status, syllabus) = app.get_json("/api/bab/topik", &token).await;
    assert_eq!(status, 200);
    assert_eq!(syllabus[0]["unlocked"], true);
    assert_eq!(syllabus[0]["topics"][0]["unlocked"], true);
    assert_eq!(syllabus[0]["topics"][0]["completed"], false);
    assert_eq!(syllabus[1]["unlocked"], false);
    assert_eq!(syllabus[1]["topics"][0]["unlocked"], false);

    let (status, _) = app
        .get_json(&format!("/api/quiz/{}", app.topics[2]), &token)
        .await;
    assert_eq!(status, 403);

    let response = app.submit(&token, 2, 4).await;
    assert_eq!(response.status().as_u16(), 403);

    // 3 of 4 correct.
    let response = app.submit(&token, 0, 3).await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nilai"], 75);
    assert!(body["attempt_id"].as_i64().is_some());

    // One topic of chapter 1 is not enough.
    let (_, syllabus) = app.get_json("/api/bab/topik", &token).await;
    assert_eq!(syllabus[0]["topics"][0]["completed"], true);
    assert_eq!(syllabus[1]["unlocked"], false);

    let response = app.submit(&token, 1, 4).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nilai"], 100);

    let (_, syllabus) = app.get_json("/api/bab/topik", &token).await;
    assert_eq!(syllabus[1]["unlocked"], true);
    assert_eq!(syllabus[1]["topics"][0]["unlocked"], true);

    let (status, quiz) = app
        .get_json(&format!("/api/quiz/{}", app.topics[2]), &token)
        .await;
    assert_eq!(status, 200);
    let quiz = quiz.as_array().unwrap();
    assert_eq!(quiz.len(), 4);
    assert!(quiz.iter().all(|q| q.get("answer").is_none()));
}

#[tokio::test]
async fn submit_rejects_questions_of_another_topic() {
    let app = spawn_app().await;
    let (_, token) = app.student().await;

    let foreign = app.questions[1][0];
    let response = app
        .client
        .post(app.url(&format!("/api/quiz/{}/submit", app.topics[0])))
        .bearer_auth(&token)
        .json(&json!({ "hasil_quiz": [{ "quiz_id": foreign, "jawaban": "A" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .client
        .post(app.url(&format!("/api/quiz/{}/submit", app.topics[0])))
        .bearer_auth(&token)
        .json(&json!({ "hasil_quiz": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Nothing was written.
    let (_, syllabus) = app.get_json("/api/bab/topik", &token).await;
    assert_eq!(syllabus[0]["topics"][0]["completed"], false);
}

#[tokio::test]
async fn student_report_keeps_best_attempt() {
    let app = spawn_app().await;
    let (_, token) = app.student().await;

    app.submit(&token, 0, 4).await;
    app.submit(&token, 0, 1).await;
    app.submit(&token, 1, 3).await;

    let (status, report) = app.get_json("/api/peserta-didik/laporan", &token).await;
    assert_eq!(status, 200);

    let chapter = &report["chapters"][0];
    assert_eq!(chapter["topics"][0]["best_score"], 100);
    assert_eq!(chapter["topics"][0]["predicate"], "A");
    assert_eq!(chapter["topics"][1]["best_score"], 75);
    assert_eq!(chapter["average_score"], 88);
    assert_eq!(chapter["status"], "LULUS");
    assert_eq!(report["chapters"][1]["status"], "-");

    let summary = &report["summary"];
    assert_eq!(summary["progress_percent"], 67);
    assert_eq!(summary["stars_collected"], 2);
    assert_eq!(summary["stars_total"], 3);
    // Mean of 100 and 75 is 87.5, just under the top band.
    assert_eq!(summary["overall_predicate"], "BAIK");
    assert!(report["teacher"].is_null());
}

#[tokio::test]
async fn teacher_login_checks_school() {
    let app = spawn_app().await;

    let cases = [
        (json!({ "nip": TEACHER_NIP, "password": TEACHER_PASSWORD, "sekolah_id": app.other_school_id }), 401),
        (json!({ "nip": TEACHER_NIP, "password": "salah", "sekolah_id": app.school_id }), 401),
        (json!({ "nip": "000", "password": TEACHER_PASSWORD, "sekolah_id": app.school_id }), 401),
    ];

    for (body, expected) in cases {
        let response = app
            .client
            .post(app.url("/api/guru/login"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), expected, "body: {}", body);
    }

    let response = app
        .client
        .post(app.url("/api/guru/login"))
        .json(&json!({ "nip": TEACHER_NIP, "password": TEACHER_PASSWORD, "sekolah_id": app.school_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["guru"]["nip"], TEACHER_NIP);
    assert!(body["guru"].get("password").is_none());
}

#[tokio::test]
async fn teacher_views_and_resets_student() {
    let app = spawn_app().await;
    let (student_id, student_token) = app.student().await;
    let token = app.teacher_token().await;

    app.submit(&student_token, 0, 4).await;
    app.submit(&student_token, 1, 2).await;

    let (status, roster) = app
        .get_json(
            &format!("/api/guru/peserta-didik/kelas/{}?limit=10", app.class_id),
            &token,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(roster["limit"], 10);
    assert_eq!(roster["data"][0]["id"], student_id);

    let (status, _) = app
        .get_json(
            &format!("/api/guru/peserta-didik/kelas/{}?limit=500", app.class_id),
            &token,
        )
        .await;
    assert_eq!(status, 400);

    let (status, grades) = app
        .get_json(&format!("/api/guru/peserta-didik/{}/nilai", student_id), &token)
        .await;
    assert_eq!(status, 200);
    assert_eq!(grades[0]["topics"][0]["best_score"], 100);
    assert!(grades[0]["topics"][0]["best_attempt"]["id"].as_i64().is_some());
    assert_eq!(grades[0]["topics"][1]["best_score"], 50);
    assert!(grades[1]["topics"][0]["best_attempt"].is_null());

    let (status, report) = app
        .get_json(&format!("/api/guru/peserta-didik/{}/laporan", student_id), &token)
        .await;
    assert_eq!(status, 200);
    assert_eq!(report["teacher"]["nip"], TEACHER_NIP);
    assert_eq!(report["class_name"], "4A");

    let response = app
        .client
        .get(app.url(&format!("/api/guru/peserta-didik/{}/laporan/cetak", student_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.contains("LAPORAN HASIL PETUALANGAN BELAJAR"));
    assert!(html.contains("Rina"));
    assert!(html.contains(TEACHER_NIP));

    let response = app
        .client
        .delete(app.url(&format!("/api/guru/peserta-didik/{}/nilai", student_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["deleted"], 2);

    let (_, syllabus) = app.get_json("/api/bab/topik", &student_token).await;
    assert_eq!(syllabus[0]["topics"][0]["completed"], false);
    assert_eq!(syllabus[1]["unlocked"], false);
}

#[tokio::test]
async fn teacher_is_scoped_to_own_school() {
    let app = spawn_app().await;
    let token = app.teacher_token().await;

    let (status, _) = app
        .get_json(
            &format!("/api/guru/peserta-didik/kelas/{}", app.other_class_id),
            &token,
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = app
        .get_json("/api/guru/peserta-didik/999999/nilai", &token)
        .await;
    assert_eq!(status, 404);

    let (status, _) = app
        .get_json("/api/guru/peserta-didik/kelas/999999", &token)
        .await;
    assert_eq!(status, 404);
}

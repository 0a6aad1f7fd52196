use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc, Mutex};

/// In-memory notes backend, most recently touched note first
#[derive(Default)]
struct Store {
    notes: Vec<Value>,
    next_id: i64,
}

type Shared = Arc<Mutex<Store>>;

/// Test fixture serving the notes REST API on an ephemeral local port
#[allow(dead_code)]
pub struct TestBackend {
    pub base_url: String,
    store: Shared,
}

#[allow(dead_code)]
impl TestBackend {
    /// Working `/notes` CRUD backend with an empty collection
    pub fn spawn() -> Self {
        let store = Shared::default();
        let app = Router::new()
            .route("/notes", get(list_notes).post(create_note))
            .route("/notes/{id}", put(update_note).delete(delete_note))
            .with_state(store.clone());
        Self {
            base_url: serve(app),
            store,
        }
    }

    /// Backend answering every request with the same canned response
    pub fn failing(status: u16, content_type: &'static str, body: &'static str) -> Self {
        let app = Router::new().fallback(move || async move {
            let status = StatusCode::from_u16(status).expect("valid status code");
            (status, [(header::CONTENT_TYPE, content_type)], body)
        });
        Self {
            base_url: serve(app),
            store: Shared::default(),
        }
    }

    pub fn note_count(&self) -> usize {
        self.store.lock().expect("store lock").notes.len()
    }
}

/// Base URL of a port nothing listens on
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{}", addr)
}

fn serve(app: Router) -> String {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind test backend");
            tx.send(listener.local_addr().expect("backend address"))
                .expect("report backend address");
            axum::serve(listener, app).await.expect("serve test backend");
        });
    });
    let addr = rx.recv().expect("backend did not start");
    format!("http://{}", addr)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Note not found"}))).into_response()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

async fn list_notes(State(store): State<Shared>) -> Json<Vec<Value>> {
    Json(store.lock().expect("store lock").notes.clone())
}

async fn create_note(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().expect("store lock");
    store.next_id += 1;
    let stamp = now();
    let note = json!({
        "id": store.next_id,
        "title": body["title"],
        "content": body["content"],
        "created_at": stamp,
        "updated_at": stamp,
    });
    store.notes.insert(0, note.clone());
    (StatusCode::CREATED, Json(note)).into_response()
}

async fn update_note(
    State(store): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().expect("store lock");
    let Some(pos) = store.notes.iter().position(|n| n["id"] == json!(id)) else {
        return not_found();
    };
    let mut note = store.notes.remove(pos);
    note["title"] = body["title"].clone();
    note["content"] = body["content"].clone();
    note["updated_at"] = json!(now());
    store.notes.insert(0, note.clone());
    Json(note).into_response()
}

async fn delete_note(State(store): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut store = store.lock().expect("store lock");
    let before = store.notes.len();
    store.notes.retain(|n| n["id"] != json!(id));
    if store.notes.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

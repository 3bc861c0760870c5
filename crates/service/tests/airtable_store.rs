use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use models::{FreelancerPatch, InsertFreelancer};
use serde_json::{json, Value};
use service::errors::ServiceError;
use service::storage::{AirtableCredentials, AirtableStore, Backend, FreelancerStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TOKEN: &str = "test-token";

#[derive(Default)]
struct MockTable {
    records: BTreeMap<String, Value>,
    next: u32,
    last_query: BTreeMap<String, String>,
    last_body: Option<Value>,
}

type Shared = Arc<Mutex<MockTable>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": {"type": "AUTHENTICATION_REQUIRED"}})))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "NOT_FOUND"})))
}

async fn list(
    State(db): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<BTreeMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let mut db = db.lock().unwrap();
    db.last_query = q;
    let records: Vec<Value> = db
        .records
        .iter()
        .map(|(id, fields)| json!({"id": id, "fields": fields, "createdTime": "2024-01-01T00:00:00.000Z"}))
        .collect();
    (StatusCode::OK, Json(json!({"records": records, "offset": "itrNext/rec9"})))
}

async fn create(State(db): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let mut db = db.lock().unwrap();
    db.next += 1;
    let id = format!("rec{:03}", db.next);
    let fields = body["fields"].clone();
    db.records.insert(id.clone(), fields.clone());
    db.last_body = Some(body);
    (StatusCode::OK, Json(json!({"id": id, "fields": fields})))
}

async fn get_one(State(db): State<Shared>, headers: HeaderMap, Path((_, _, id)): Path<(String, String, String)>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let db = db.lock().unwrap();
    match db.records.get(&id) {
        Some(fields) => (StatusCode::OK, Json(json!({"id": id, "fields": fields}))),
        None => not_found(),
    }
}

async fn patch_one(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((_, _, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let mut db = db.lock().unwrap();
    db.last_body = Some(body.clone());
    let Some(existing) = db.records.get_mut(&id) else { return not_found() };
    if let (Some(obj), Some(changes)) = (existing.as_object_mut(), body["fields"].as_object()) {
        for (k, v) in changes {
            obj.insert(k.clone(), v.clone());
        }
    }
    let fields = existing.clone();
    (StatusCode::OK, Json(json!({"id": id, "fields": fields})))
}

async fn delete_one(State(db): State<Shared>, headers: HeaderMap, Path((_, _, id)): Path<(String, String, String)>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) { return unauthorized(); }
    let mut db = db.lock().unwrap();
    match db.records.remove(&id) {
        Some(_) => (StatusCode::OK, Json(json!({"id": id, "deleted": true}))),
        None => not_found(),
    }
}

async fn start_mock() -> anyhow::Result<(String, Shared)> {
    let db: Shared = Arc::new(Mutex::new(MockTable::default()));
    let app = Router::new()
        .route("/v0/:base/:table", get(list).post(create))
        .route("/v0/:base/:table/:id", get(get_one).patch(patch_one).delete(delete_one))
        .with_state(db.clone());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("mock airtable error: {}", e); }
    });
    Ok((format!("http://{}/v0", addr), db))
}

fn store(api_url: &str, token: &str) -> anyhow::Result<AirtableStore> {
    Ok(AirtableStore::new(AirtableCredentials {
        token: token.into(),
        base_id: "appTest".into(),
        table: "Freelancers".into(),
        api_url: api_url.into(),
        page_size: 50,
        request_timeout: Duration::from_secs(5),
    })?)
}

#[tokio::test]
async fn create_sends_defaults_and_normalizes() -> anyhow::Result<()> {
    let (url, db) = start_mock().await?;
    let store = store(&url, TOKEN)?;
    assert_eq!(store.backend(), Backend::Airtable);

    let created = store.create(InsertFreelancer::new("Ana", "Design")).await?;
    assert_eq!(created.id, "rec001");
    assert_eq!(created.fields.nome, "Ana");
    assert_eq!(created.fields.email, "");
    assert_eq!(created.fields.preco_hora, 0.0);

    let body = db.lock().unwrap().last_body.clone().expect("body captured");
    let sent = body["fields"].as_object().expect("fields object");
    assert_eq!(sent.len(), 5);
    assert_eq!(sent["localizacao"], "");
    Ok(())
}

#[tokio::test]
async fn list_uses_page_size_and_passes_offset_through() -> anyhow::Result<()> {
    let (url, db) = start_mock().await?;
    db.lock().unwrap().records.insert("recX".into(), json!({"nome": "Ana"}));
    let store = store(&url, TOKEN)?;

    let page = store.list(None).await?;
    assert_eq!(page.list.len(), 1);
    assert_eq!(page.offset.as_deref(), Some("itrNext/rec9"));
    let first = &page.list[0];
    assert_eq!(first.id, "recX");
    assert_eq!(first.fields.servico, "");
    assert_eq!(first.fields.localizacao, "");
    assert_eq!(db.lock().unwrap().last_query.get("pageSize").map(String::as_str), Some("50"));
    assert!(!db.lock().unwrap().last_query.contains_key("offset"));

    store.list(Some("itrNext/rec9".into())).await?;
    assert_eq!(db.lock().unwrap().last_query.get("offset").map(String::as_str), Some("itrNext/rec9"));
    Ok(())
}

#[tokio::test]
async fn update_sends_only_present_fields() -> anyhow::Result<()> {
    let (url, db) = start_mock().await?;
    let store = store(&url, TOKEN)?;
    let created = store
        .create(InsertFreelancer { preco_hora: Some(90.0), ..InsertFreelancer::new("Ana", "Design") })
        .await?;

    let patch = FreelancerPatch { nome: Some("Ana Paula".into()), ..Default::default() };
    let updated = store.update(&created.id, patch).await?;
    assert_eq!(updated.fields.nome, "Ana Paula");
    assert_eq!(updated.fields.servico, "Design");
    assert_eq!(updated.fields.preco_hora, 90.0);

    let body = db.lock().unwrap().last_body.clone().expect("body captured");
    assert_eq!(body, json!({"fields": {"nome": "Ana Paula"}}));
    Ok(())
}

#[tokio::test]
async fn get_and_delete_roundtrip() -> anyhow::Result<()> {
    let (url, _db) = start_mock().await?;
    let store = store(&url, TOKEN)?;
    let created = store.create(InsertFreelancer::new("Rui", "Dev")).await?;

    assert_eq!(store.get(&created.id).await?, Some(created.clone()));
    assert!(store.delete(&created.id).await?);
    assert!(store.get(&created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn remote_failures_carry_status_and_body() -> anyhow::Result<()> {
    let (url, _db) = start_mock().await?;
    let store = store(&url, TOKEN)?;

    match store.delete("recMissing").await {
        Err(ServiceError::Remote { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("NOT_FOUND"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }

    let res = store.update("recMissing", FreelancerPatch::default()).await;
    assert!(matches!(res, Err(ServiceError::Remote { status: 404, .. })));

    let bad = store_with_wrong_token(&url)?;
    match bad.list(None).await {
        Err(e @ ServiceError::Remote { status: 401, .. }) => {
            assert!(e.to_string().starts_with("Airtable API error: 401 "));
        }
        other => panic!("expected 401, got {other:?}"),
    }
    Ok(())
}

fn store_with_wrong_token(url: &str) -> anyhow::Result<AirtableStore> {
    store(url, "wrong")
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let store = store(&format!("http://{}/v0", addr), TOKEN)?;
    let res = store.list(None).await;
    assert!(matches!(res, Err(ServiceError::Http(_))));
    Ok(())
}

#[tokio::test]
async fn truncated_error_body_is_an_http_error() -> anyhow::Result<()> {
    // answers 500 with a body shorter than its Content-Length, then hangs up
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 64\r\n\r\n{\"error\"")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let store = store(&format!("http://{}/v0", addr), TOKEN)?;
    match store.list(None).await {
        Err(ServiceError::Http(detail)) => assert!(detail.contains("500")),
        other => panic!("expected http error, got {other:?}"),
    }
    Ok(())
}

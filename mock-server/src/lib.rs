use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Top-level key every envelope is nested under.
pub const ENVELOPE_KEY: &str = "data";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/echo", get(echo).post(echo))
        .route("/scenarios/{name}", get(scenario))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// Wrap `results` in a status envelope under [`ENVELOPE_KEY`].
pub fn envelope(code: StatusCode, description: &str, results: Option<Value>) -> Value {
    let mut inner = json!({
        "status": {"code": code.as_u16(), "description": description}
    });
    if let Some(results) = results {
        inner["results"] = results;
    }
    json!({ ENVELOPE_KEY: inner })
}

fn reply(code: StatusCode, description: &str, results: Option<Value>) -> Response {
    (code, Json(envelope(code, description, results))).into_response()
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("key").and_then(|v| v.to_str().ok()) {
        Some(key) if key == &*state.api_key => Ok(()),
        _ => Err(reply(StatusCode::UNAUTHORIZED, "invalid api key", None)),
    }
}

async fn list_items(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let items = state.db.read().await;
    let mut items: Vec<Item> = items.values().cloned().collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    reply(StatusCode::OK, "OK", Some(json!(items)))
}

async fn create_item(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let input: NewItem = match serde_json::from_str(&body) {
        Ok(input) => input,
        Err(e) => return reply(StatusCode::BAD_REQUEST, &e.to_string(), None),
    };
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        quantity: input.quantity,
    };
    state.db.write().await.insert(item.id, item.clone());
    reply(StatusCode::OK, "created", Some(json!(item)))
}

async fn get_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Ok(id) = id.parse::<Uuid>() else {
        return reply(StatusCode::BAD_REQUEST, "malformed item id", None);
    };
    match state.db.read().await.get(&id) {
        Some(item) => reply(StatusCode::OK, "OK", Some(json!(item))),
        None => reply(StatusCode::NOT_FOUND, "item not found", None),
    }
}

/// Reflect the request back as `results`: headers, url parameters and the
/// JSON body (null when absent or not JSON).
async fn echo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: String,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    reply(
        StatusCode::OK,
        "OK",
        Some(json!({"headers": headers, "query": query, "body": body})),
    )
}

/// Canned responses that break the envelope contract in specific ways.
async fn scenario(Path(name): Path<String>) -> Response {
    let body = match name.as_str() {
        "empty" => json!({ ENVELOPE_KEY: null }),
        "empty-object" => json!({ ENVELOPE_KEY: {} }),
        "missing-status" => json!({ ENVELOPE_KEY: {"results": [1, 2, 3]} }),
        "bad-status" => envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "backend exploded",
            Some(json!([1, 2, 3])),
        ),
        "no-data" => json!({"payload": {"status": {"code": 200}}}),
        "null-results" => envelope(StatusCode::OK, "OK", Some(Value::Null)),
        "not-json" => {
            return (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response()
        }
        _ => return reply(StatusCode::NOT_FOUND, "unknown scenario", None),
    };
    Json(body).into_response()
}

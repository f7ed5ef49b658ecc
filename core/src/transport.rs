//! Request/response adapter for the HTTP boundary.
//!
//! Framework-free: a host server hands over the method and parsed JSON body
//! and writes back the status, headers, and JSON body this returns.
//!
//!   OPTIONS -> 200, empty (CORS preflight)
//!   GET     -> today's leaderboard
//!   POST    -> score submission
//!   other   -> 405

use crate::{
    clock::DayClock,
    engine::ScoreEngine,
    error::ScoreError,
    store::RecordStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const ALLOW_METHODS: &str = "GET,POST,OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: &str, body: Option<Value>) -> Self {
        Self {
            method: method.to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn handle<S: RecordStore, C: DayClock>(engine: &ScoreEngine<S, C>, request: &Request) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = request.method.to_ascii_uppercase();

    let (status, body) = match method.as_str() {
        "OPTIONS" => (200, Value::Null),
        "GET" => match engine.query_today() {
            Ok(data) => (200, json!({ "status": "success", "data": data })),
            Err(e) => error_body(&e),
        },
        "POST" => {
            let submitted = match &request.body {
                Some(body) => engine.submit_json(body),
                None => Err(ScoreError::invalid("body", "is required")),
            };
            match submitted {
                Ok(outcome) => (
                    200,
                    json!({
                        "status": "success",
                        "message": outcome.message(),
                        "outcome": outcome,
                    }),
                ),
                Err(e) => error_body(&e),
            }
        }
        _ => {
            log::warn!("[{request_id}] Method not allowed: {}", request.method);
            (405, json!({ "status": "error", "message": "Method not allowed" }))
        }
    };

    log::info!("[{request_id}] {method} -> {status}");
    Response {
        status,
        headers: cors_headers(&engine.config().cors_allow_origin),
        body,
    }
}

fn error_body(e: &ScoreError) -> (u16, Value) {
    (
        e.status_code(),
        json!({ "status": "error", "message": e.public_message() }),
    )
}

fn cors_headers(origin: &str) -> Vec<(String, String)> {
    vec![
        ("Access-Control-Allow-Origin".into(), origin.into()),
        ("Access-Control-Allow-Methods".into(), ALLOW_METHODS.into()),
        ("Access-Control-Allow-Headers".into(), ALLOW_HEADERS.into()),
    ]
}

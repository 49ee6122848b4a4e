//! Shared test helpers: an in-memory DeltaMemory server behind wiremock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use deltamemory::{ClientConfig, DeltaMemory};
use serde_json::{json, Value};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Default)]
struct State {
    next_id: u64,
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<(String, String, Value)>,
}

/// Stateful fake of the memory server's HTTP surface.
///
/// Recall returns the collection's memories newest first, truncated to
/// `limit`; there is no ranking.
#[derive(Clone, Default)]
pub struct FakeMemoryServer {
    state: Arc<Mutex<State>>,
}

impl FakeMemoryServer {
    pub async fn start() -> (MockServer, FakeMemoryServer) {
        let server = MockServer::start().await;
        let fake = FakeMemoryServer::default();
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    /// Number of memories stored in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.collections.get(collection).map_or(0, Vec::len)
    }

    /// Every request as `(method, path, body)`.
    pub fn requests(&self) -> Vec<(String, String, Value)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Bodies of requests sent to `path`.
    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|(_, p, _)| p == path)
            .map(|(_, _, body)| body)
            .collect()
    }

    /// Store the memory described by a store or ingest request body.
    fn insert(state: &mut State, body: &Value, memory_type: &str) -> String {
        state.next_id += 1;
        let collection = body["collection"].as_str().unwrap_or_default();
        let metadata = match &body["metadata"] {
            Value::Object(_) => body["metadata"].clone(),
            _ => json!({}),
        };
        let id = format!("mem-{}", state.next_id);
        let memory = json!({
            "id": id,
            "collection": collection,
            "content": body["content"],
            "memory_type": memory_type,
            "salience": 1.0,
            "timestamp": 1_700_000_000 + state.next_id as i64,
            "metadata": metadata,
        });
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(memory);
        id
    }
}

fn not_found(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": format!("Memory not found: {id}"),
        "code": "MEMORY_NOT_FOUND",
    }))
}

fn query_collection(request: &Request) -> String {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == "collection")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

impl Respond for FakeMemoryServer {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.to_string();
        let path = request.url.path().to_string();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push((method.clone(), path.clone(), body.clone()));

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let field = |key: &str| body[key].as_str().unwrap_or_default().to_string();

        match (method.as_str(), segments.as_slice()) {
            ("POST", ["v1", "store"]) => {
                let memory_type = body["memory_type"].as_str().unwrap_or("Conversation");
                let id = Self::insert(&mut state, &body, memory_type);
                ResponseTemplate::new(200).set_body_json(json!({ "id": id }))
            }
            ("POST", ["v1", "ingest"]) => {
                let id = Self::insert(&mut state, &body, "Conversation");
                ResponseTemplate::new(200).set_body_json(json!({
                    "memory_ids": [id],
                    "facts": [{ "fact": field("content"), "confidence": 0.9 }],
                    "concepts": [],
                }))
            }
            ("POST", ["v1", "recall"]) => {
                let limit = body["limit"].as_u64().unwrap_or(10) as usize;
                let memories = state
                    .collections
                    .get(&field("collection"))
                    .cloned()
                    .unwrap_or_default();
                let results: Vec<Value> = memories
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|m| {
                        json!({
                            "memory": m,
                            "similarity": 0.9,
                            "recency": 0.8,
                            "salience": 1.0,
                            "cognitive_score": 0.9,
                        })
                    })
                    .collect();
                let context = results
                    .iter()
                    .filter_map(|r| r["memory"]["content"].as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                let mut response = json!({ "results": results, "concepts": [] });
                if !context.is_empty() {
                    response["context"] = json!(context);
                }
                ResponseTemplate::new(200).set_body_json(response)
            }
            ("GET", ["v1", "memory", collection, id]) => {
                let found = state
                    .collections
                    .get(*collection)
                    .and_then(|ms| ms.iter().find(|m| m["id"] == *id))
                    .cloned();
                match found {
                    Some(memory) => ResponseTemplate::new(200).set_body_json(memory),
                    None => not_found(id),
                }
            }
            ("DELETE", ["v1", "memory", collection, id]) => {
                let memories = state.collections.entry(collection.to_string()).or_default();
                let before = memories.len();
                memories.retain(|m| m["id"] != *id);
                if memories.len() < before {
                    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
                } else {
                    not_found(id)
                }
            }
            ("GET", ["v1", "stats"]) => {
                let count = state
                    .collections
                    .get(&query_collection(request))
                    .map_or(0, Vec::len);
                ResponseTemplate::new(200).set_body_json(json!({
                    "memory_count": count,
                    "fact_count": count,
                    "concept_count": 0,
                    "relation_count": 0,
                    "vector_count": count,
                    "profile_count": 0,
                    "event_count": 0,
                }))
            }
            ("DELETE", ["v1", "purge"]) => {
                let removed = state
                    .collections
                    .remove(&query_collection(request))
                    .map_or(0, |ms| ms.len());
                ResponseTemplate::new(200).set_body_json(json!({ "deleted_count": removed }))
            }
            ("GET", ["v1", "health"]) => {
                let health = json!({ "healthy": true, "version": "0.1.0-test" });
                ResponseTemplate::new(200).set_body_json(health)
            }
            _ => ResponseTemplate::new(400).set_body_json(json!({
                "error": format!("Unsupported route {method} {path}"),
                "code": "INVALID_REQUEST",
            })),
        }
    }
}

/// Client pointed at `server` with a generous timeout.
pub fn client_for(server: &MockServer) -> DeltaMemory {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build();
    DeltaMemory::new(config).expect("client should build")
}

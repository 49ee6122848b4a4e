//! DeltaMemory protocol client.
//!
//! Every operation goes through one request path: build the URL, attach the
//! default headers, race the request against the configured timeout, then
//! either decode the typed body or map the error body through
//! [`DeltaMemoryError::from_response`]. There is no retry: `ingest` is not
//! idempotent, so retrying is left to the caller.

pub mod http;

use std::time::Instant;

use reqwest::header::HeaderMap;
use reqwest::{Request, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ConfigError, DeltaMemoryError, ErrorBody, Result};
use crate::types::responses::DeleteResponse;
use crate::types::*;
use crate::util::timeout::with_timeout;

pub const DEFAULT_RECALL_LIMIT: u32 = 10;
pub const DEFAULT_DECAY_RATE: f64 = 0.1;
pub const DEFAULT_CONSOLIDATE_THRESHOLD: f64 = 0.8;
pub const DEFAULT_REFLECT_WINDOW: u32 = 10;

#[derive(Serialize)]
struct IngestRequest<'a> {
    collection: &'a str,
    content: &'a str,
    metadata: Metadata,
}

#[derive(Serialize)]
struct RecallRequest<'a> {
    collection: &'a str,
    query: &'a str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<RecallWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_types: Option<&'a [MemoryType]>,
}

#[derive(Serialize)]
struct StoreRequest<'a> {
    collection: &'a str,
    content: &'a str,
    memory_type: MemoryType,
    metadata: Metadata,
}

#[derive(Serialize)]
struct DecayRequest<'a> {
    collection: &'a str,
    rate: f64,
}

#[derive(Serialize)]
struct ConsolidateRequest<'a> {
    collection: &'a str,
    threshold: f64,
}

#[derive(Serialize)]
struct ReflectRequest<'a> {
    collection: &'a str,
    window_size: u32,
}

/// Client for a DeltaMemory server.
///
/// Cheap to clone; clones share the connection pool and configuration.
/// Construct one per process or tenant context and hand it to adapters by
/// reference (`Arc<DeltaMemory>`).
///
/// ```no_run
/// use deltamemory::{ClientConfig, DeltaMemory};
/// use deltamemory::types::{IngestOptions, RecallOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = DeltaMemory::new(ClientConfig::builder().default_collection("my-app").build())?;
/// db.ingest("User prefers dark mode", IngestOptions::default()).await?;
/// let recalled = db.recall("What are the user preferences?", RecallOptions::default()).await?;
/// println!("{:?}", recalled.context);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeltaMemory {
    config: ClientConfig,
    base_url: Url,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl DeltaMemory {
    /// Build a client, normalizing the base URL and preparing headers.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        let base_url = http::normalize_base_url(config.base_url())?;
        let headers = http::default_headers(&config)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            config,
            base_url,
            headers,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Resolve the collection for a call: explicit argument, else the default.
    pub fn collection<'a>(&'a self, collection: Option<&'a str>) -> &'a str {
        collection.unwrap_or_else(|| self.config.default_collection())
    }

    fn url(&self, segments: &[&str]) -> Url {
        http::endpoint(&self.base_url, segments, &[])
    }

    fn url_with_collection(&self, segments: &[&str], collection: &str) -> Url {
        http::endpoint(&self.base_url, segments, &[("collection", collection)])
    }

    fn post(&self, segments: &[&str], body: &impl Serialize) -> RequestBuilder {
        self.http.post(self.url(segments)).json(body)
    }

    /// Issue one request and decode the response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request
            .headers(self.headers.clone())
            .build()
            .map_err(DeltaMemoryError::transport)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let started = Instant::now();

        let result = with_timeout(self.config.timeout(), self.send(request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => debug!(%method, %path, elapsed_ms, "DeltaMemory request completed"),
            Err(err) => warn!(
                %method,
                %path,
                elapsed_ms,
                code = err.code(),
                error = %err,
                "DeltaMemory request failed"
            ),
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(DeltaMemoryError::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(DeltaMemoryError::transport)?;

        if !status.is_success() {
            let body = ErrorBody::parse(&bytes);
            return Err(DeltaMemoryError::from_response(status.as_u16(), &body));
        }

        serde_json::from_slice(&bytes).map_err(DeltaMemoryError::decode)
    }

    /// Ingest content with cognitive processing (fact and concept extraction).
    ///
    /// `datetime` and `speaker` are folded into the metadata map.
    pub async fn ingest(&self, content: &str, options: IngestOptions) -> Result<IngestResult> {
        let mut metadata = options.metadata.unwrap_or_default();
        if let Some(datetime) = options.datetime {
            metadata.insert("datetime".into(), datetime);
        }
        if let Some(speaker) = options.speaker {
            metadata.insert("speaker".into(), speaker);
        }

        let body = IngestRequest {
            collection: self.collection(options.collection.as_deref()),
            content,
            metadata,
        };
        self.execute(self.post(&["v1", "ingest"], &body)).await
    }

    /// Hybrid search over similarity, recency and salience.
    ///
    /// `limit` is passed through unvalidated; bounds are the server's job.
    pub async fn recall(&self, query: &str, options: RecallOptions) -> Result<RecallResult> {
        let body = RecallRequest {
            collection: self.collection(options.collection.as_deref()),
            query,
            limit: options.limit.unwrap_or(DEFAULT_RECALL_LIMIT),
            weights: options.weights,
            memory_types: options.memory_types.as_deref(),
        };
        self.execute(self.post(&["v1", "recall"], &body)).await
    }

    /// Store content without extraction (raw mode).
    pub async fn store(&self, content: &str, options: StoreOptions) -> Result<StoreResponse> {
        let body = StoreRequest {
            collection: self.collection(options.collection.as_deref()),
            content,
            memory_type: options.memory_type.unwrap_or_default(),
            metadata: options.metadata.unwrap_or_default(),
        };
        self.execute(self.post(&["v1", "store"], &body)).await
    }

    /// Fetch one memory. Fails with `MemoryNotFound` if absent.
    pub async fn get(&self, id: &str, collection: Option<&str>) -> Result<Memory> {
        let url = self.url(&["v1", "memory", self.collection(collection), id]);
        self.execute(self.http.get(url)).await
    }

    /// Delete one memory.
    ///
    /// Deleting an id that does not exist always fails with `MemoryNotFound`.
    pub async fn delete(&self, id: &str, collection: Option<&str>) -> Result<()> {
        let url = self.url(&["v1", "memory", self.collection(collection), id]);
        let _: DeleteResponse = self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    /// Apply salience decay (`rate` defaults to 0.1).
    pub async fn decay(
        &self,
        rate: Option<f64>,
        collection: Option<&str>,
    ) -> Result<DecayResponse> {
        let body = DecayRequest {
            collection: self.collection(collection),
            rate: rate.unwrap_or(DEFAULT_DECAY_RATE),
        };
        self.execute(self.post(&["v1", "decay"], &body)).await
    }

    /// Merge similar memories (`threshold` defaults to 0.8).
    pub async fn consolidate(
        &self,
        threshold: Option<f64>,
        collection: Option<&str>,
    ) -> Result<ConsolidateResponse> {
        let body = ConsolidateRequest {
            collection: self.collection(collection),
            threshold: threshold.unwrap_or(DEFAULT_CONSOLIDATE_THRESHOLD),
        };
        self.execute(self.post(&["v1", "consolidate"], &body)).await
    }

    /// Generate insights from the most recent memories (`window_size` defaults to 10).
    pub async fn reflect(
        &self,
        window_size: Option<u32>,
        collection: Option<&str>,
    ) -> Result<ReflectResponse> {
        let body = ReflectRequest {
            collection: self.collection(collection),
            window_size: window_size.unwrap_or(DEFAULT_REFLECT_WINDOW),
        };
        self.execute(self.post(&["v1", "reflect"], &body)).await
    }

    pub async fn stats(&self, collection: Option<&str>) -> Result<CollectionStats> {
        let url = self.url_with_collection(&["v1", "stats"], self.collection(collection));
        self.execute(self.http.get(url)).await
    }

    pub async fn graph(&self, collection: Option<&str>) -> Result<GraphResponse> {
        let url = self.url_with_collection(&["v1", "graph"], self.collection(collection));
        self.execute(self.http.get(url)).await
    }

    /// Delete every memory in a collection.
    pub async fn purge(&self, collection: Option<&str>) -> Result<PurgeResponse> {
        let url = self.url_with_collection(&["v1", "purge"], self.collection(collection));
        self.execute(self.http.delete(url)).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.url(&["v1", "health"]);
        self.execute(self.http.get(url)).await
    }
}

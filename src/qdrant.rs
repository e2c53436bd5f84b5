//! Thin wrapper over the Qdrant REST API.
//!
//! Only the four calls the pipeline needs: ensure/recreate a collection,
//! upsert points, vector search, and count. Qdrant point ids must be UUIDs,
//! so record ids are mapped through a deterministic UUIDv5 — re-embedding
//! the same corpus overwrites points instead of duplicating them.

use anyhow::{bail, Context, Result};
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use crate::config::QdrantConfig;
use crate::models::ChunkRecord;

/// One point to upsert: UUID id, embedding vector, full record as payload.
#[derive(Debug, Serialize)]
pub struct Point {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// A search hit with the record recovered from the point payload.
#[derive(Debug, Clone)]
pub struct ScoredHit {
    pub score: f32,
    pub record: ChunkRecord,
}

#[derive(Debug)]
pub struct QdrantStore {
    http: reqwest::Client,
    base: String,
    collection: String,
    api_key: Option<String>,
}

impl QdrantStore {
    /// Build a store from config. The API key, if any, comes from the
    /// `QDRANT_API_KEY` environment variable.
    pub fn from_config(config: &QdrantConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            bail!("qdrant.url is not configured. Set [qdrant] url in config.");
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: std::env::var("QDRANT_API_KEY").ok(),
        })
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }
        req
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base, self.collection)
    }

    /// Create the collection if missing. With `recreate`, drop and recreate
    /// it first (deletes all existing points).
    pub async fn ensure_collection(&self, dims: usize, recreate: bool) -> Result<()> {
        if recreate {
            // Ignore failures here; the collection may simply not exist yet.
            let _ = self.request(Method::DELETE, self.collection_url()).send().await;
        } else {
            let resp = self
                .request(Method::GET, self.collection_url())
                .send()
                .await
                .context("Failed to reach Qdrant")?;
            if resp.status().is_success() {
                return Ok(());
            }
        }

        let body = serde_json::json!({
            "vectors": { "size": dims, "distance": "Cosine" }
        });
        let resp = self
            .request(Method::PUT, self.collection_url())
            .json(&body)
            .send()
            .await
            .context("Failed to reach Qdrant")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Qdrant create collection failed {}: {}", status, text);
        }
        Ok(())
    }

    /// Upsert a batch of points, waiting for the write to be applied.
    pub async fn upsert(&self, points: Vec<Point>) -> Result<()> {
        let url = format!("{}/points?wait=true", self.collection_url());
        let resp = self
            .request(Method::PUT, url)
            .json(&serde_json::json!({ "points": points }))
            .send()
            .await
            .context("Failed to reach Qdrant")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Qdrant upsert failed {}: {}", status, text);
        }
        Ok(())
    }

    /// Nearest-neighbor search, optionally filtered to one chunk kind.
    /// Hits whose payload no longer parses as a record are reported and
    /// skipped rather than failing the whole query.
    pub async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        min_score: f32,
        kind: Option<&str>,
    ) -> Result<Vec<ScoredHit>> {
        let url = format!("{}/points/search", self.collection_url());
        let resp = self
            .request(Method::POST, url)
            .json(&search_body(vector, limit, min_score, kind))
            .send()
            .await
            .context("Failed to reach Qdrant")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Qdrant search failed {}: {}", status, text);
        }

        let json: serde_json::Value = resp.json().await?;
        let results = json
            .get("result")
            .and_then(|r| r.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid Qdrant search response: missing result"))?;

        let mut hits = Vec::with_capacity(results.len());
        for item in results {
            let score = item.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0) as f32;
            let payload = item.get("payload").cloned().unwrap_or_default();
            match serde_json::from_value::<ChunkRecord>(payload) {
                Ok(record) => hits.push(ScoredHit { score, record }),
                Err(e) => eprintln!("Warning: skipping malformed payload: {}", e),
            }
        }
        Ok(hits)
    }

    /// Exact point count for the collection.
    pub async fn count(&self) -> Result<u64> {
        let url = format!("{}/points/count", self.collection_url());
        let resp = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "exact": true }))
            .send()
            .await
            .context("Failed to reach Qdrant")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Qdrant count failed {}: {}", status, text);
        }

        let json: serde_json::Value = resp.json().await?;
        Ok(json
            .pointer("/result/count")
            .and_then(|c| c.as_u64())
            .unwrap_or(0))
    }
}

/// Deterministic Qdrant point id for a chunk record id.
pub fn point_id(record_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, record_id.as_bytes()).to_string()
}

fn search_body(
    vector: &[f32],
    limit: usize,
    min_score: f32,
    kind: Option<&str>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "vector": vector,
        "limit": limit,
        "score_threshold": min_score,
        "with_payload": true,
    });
    if let Some(kind) = kind {
        body["filter"] = serde_json::json!({
            "must": [{ "key": "chunk_type", "match": { "value": kind } }]
        });
    }
    body
}

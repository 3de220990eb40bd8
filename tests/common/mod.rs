//! Shared fixtures for integration tests: a scripted archive and operator

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use mast_fetcher::app::{ArchiveService, ColumnSelector, Operator, SearchRequest};
use mast_fetcher::constants::services;
use mast_fetcher::errors::{
    DownloadError, DownloadResult, QueryResult, SessionError, SessionResult,
};

/// Per-endpoint call counters
#[derive(Debug, Default)]
pub struct CallCounts {
    pub count: AtomicUsize,
    pub full: AtomicUsize,
    pub products: AtomicUsize,
    pub files: AtomicUsize,
}

impl CallCounts {
    pub fn get(&self) -> (usize, usize, usize, usize) {
        (
            self.count.load(Ordering::SeqCst),
            self.full.load(Ordering::SeqCst),
            self.products.load(Ordering::SeqCst),
            self.files.load(Ordering::SeqCst),
        )
    }
}

/// Archive answering from canned JSON, routed by service and column set
pub struct MockArchive {
    count_body: String,
    observations_body: String,
    products_body: String,
    failing_uris: HashSet<String>,
    pub calls: Arc<CallCounts>,
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl MockArchive {
    pub fn new(count: u64) -> Self {
        Self {
            count_body: json!({ "data": [{ "Column1": count }] }).to_string(),
            observations_body: json!({ "data": [] }).to_string(),
            products_body: json!({ "data": [] }).to_string(),
            failing_uris: HashSet::new(),
            calls: Arc::new(CallCounts::default()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_observations(mut self, rows: Vec<Value>) -> Self {
        self.observations_body = json!({ "data": rows }).to_string();
        self
    }

    pub fn with_products(mut self, rows: Vec<Value>) -> Self {
        self.products_body = json!({ "data": rows }).to_string();
        self
    }

    /// Make file requests for `uri` answer with a server error
    pub fn failing(mut self, uri: &str) -> Self {
        self.failing_uris.insert(uri.to_string());
        self
    }
}

#[async_trait]
impl ArchiveService for MockArchive {
    async fn submit(&self, request: &SearchRequest) -> QueryResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if request.service() == services::PRODUCTS {
            self.calls.products.fetch_add(1, Ordering::SeqCst);
            return Ok(self.products_body.clone());
        }

        match request.columns() {
            Some(ColumnSelector::Count) => {
                self.calls.count.fetch_add(1, Ordering::SeqCst);
                Ok(self.count_body.clone())
            }
            _ => {
                self.calls.full.fetch_add(1, Ordering::SeqCst);
                Ok(self.observations_body.clone())
            }
        }
    }

    async fn fetch_file(&self, uri: &str) -> DownloadResult<Vec<u8>> {
        self.calls.files.fetch_add(1, Ordering::SeqCst);
        if self.failing_uris.contains(uri) {
            return Err(DownloadError::ServerError { status: 404 });
        }
        Ok(format!("contents of {}", uri).into_bytes())
    }
}

/// One observation row as the filtered service returns it
pub fn observation(obsid: &str, t_min: Option<f64>) -> Value {
    json!({
        "obsid": obsid,
        "proposal_id": "1234",
        "proposal_pi": "Doe, Jane",
        "target_name": "NGC-1234",
        "t_min": t_min,
    })
}

/// One product row as the products service returns it
pub fn product(obs_id: &str, file_name: &str, size: u64) -> Value {
    json!({
        "obs_collection": "JWST",
        "obs_id": obs_id,
        "productFilename": file_name,
        "dataURI": format!("mast:JWST/product/{}", file_name),
        "size": size,
    })
}

/// Operator answering from a fixed script and recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub lines: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn saw_line(&self, expected: &str) -> bool {
        self.lines.iter().any(|line| line == expected)
    }
}

impl Operator for ScriptedOperator {
    fn prompt(&mut self, message: &str) -> SessionResult<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().ok_or(SessionError::InputClosed)
    }

    fn report(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde_json::Value;

use pl_predictor::transport::Transport;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Post { path: String, body: Value },
    Get { path: String },
}

impl Call {
    pub fn path(&self) -> &str {
        match self {
            Call::Post { path, .. } | Call::Get { path } => path,
        }
    }
}

/// Answers each path with a canned body (or a transport failure) and records
/// every call in order.
#[derive(Default)]
pub struct RecordingTransport {
    replies: HashMap<String, Option<String>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, path: &str, body: impl Into<String>) -> Self {
        self.replies.insert(path.to_string(), Some(body.into()));
        self
    }

    pub fn reply_fixture(self, path: &str, fixture: &str) -> Self {
        self.reply(path, read_fixture(fixture))
    }

    pub fn fail(mut self, path: &str) -> Self {
        self.replies.insert(path.to_string(), None);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn answer(&self, path: &str) -> Result<String> {
        match self.replies.get(path) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(anyhow!("connection refused")),
            None => Err(anyhow!("no canned reply for {path}")),
        }
    }
}

impl Transport for RecordingTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<String> {
        self.calls.borrow_mut().push(Call::Post {
            path: path.to_string(),
            body: body.clone(),
        });
        self.answer(path)
    }

    fn get(&self, path: &str) -> Result<String> {
        self.calls.borrow_mut().push(Call::Get {
            path: path.to_string(),
        });
        self.answer(path)
    }
}

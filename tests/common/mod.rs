//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use git2::{Repository, Signature};
use serde_json::{Value, json};
use wiremock::MockServer;

use commitscribe::commit::MessageSink;
use commitscribe::credential::{KeyPrompt, KeyRequest};
use commitscribe::{CredentialError, GeneratedMessage, Settings, SinkError};

/// Model name used against the mock server.
pub const TEST_MODEL: &str = "gemini-test";

/// Request path the client posts to for [`TEST_MODEL`].
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Settings pointing the client at a mock server.
pub fn settings_for(server: &MockServer) -> Settings {
    Settings {
        api_base: format!("{}/v1beta", server.uri()),
        model: TEST_MODEL.to_string(),
        ..Settings::default()
    }
}

/// A `generateContent` success body with one candidate.
pub fn candidate_body(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP",
                "index": 0
            }
        ],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
    })
}

/// A Google-style error body.
pub fn error_body(code: u16, message: &str, status: &str) -> Value {
    json!({"error": {"code": code, "message": message, "status": status}})
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a repository with one committed file, `x.txt`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        let test_repo = Self { dir, repo };

        test_repo.write("x.txt", "first\n");
        test_repo.stage("x.txt");
        test_repo.commit("chore: initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, file: &str, content: &str) {
        std::fs::write(self.dir.path().join(file), content).expect("Failed to write test file");
    }

    pub fn stage(&self, file: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(file)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    pub fn commit(&self, message: &str) {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }
}

/// Key prompt that replays scripted answers and counts how often it was asked.
pub struct ScriptedPrompt {
    confirm: bool,
    keys: Mutex<VecDeque<Option<String>>>,
    key_requests: AtomicU32,
    confirmations: AtomicU32,
}

impl ScriptedPrompt {
    /// `keys` are returned in order; running out counts as cancellation.
    pub fn new(confirm: bool, keys: &[Option<&str>]) -> Self {
        Self {
            confirm,
            keys: Mutex::new(keys.iter().map(|k| k.map(str::to_string)).collect()),
            key_requests: AtomicU32::new(0),
            confirmations: AtomicU32::new(0),
        }
    }

    /// A prompt that must never be asked anything useful.
    pub fn silent() -> Self {
        Self::new(false, &[])
    }

    pub fn key_requests(&self) -> u32 {
        self.key_requests.load(Ordering::SeqCst)
    }

    pub fn confirmations(&self) -> u32 {
        self.confirmations.load(Ordering::SeqCst)
    }
}

impl KeyPrompt for ScriptedPrompt {
    fn request_key(&self, _reason: KeyRequest) -> Result<Option<String>, CredentialError> {
        self.key_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.keys.lock().unwrap().pop_front().flatten())
    }

    fn confirm_replacement(&self) -> Result<bool, CredentialError> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        Ok(self.confirm)
    }
}

/// Sink that records what it was given.
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Vec<String>,
    pub warnings: Vec<String>,
}

impl MessageSink for RecordingSink {
    fn deliver(&mut self, message: &GeneratedMessage) -> Result<(), SinkError> {
        self.delivered.push(message.as_str().to_string());
        Ok(())
    }

    fn warn(&mut self, notice: &str) {
        self.warnings.push(notice.to_string());
    }
}

//! Fake backend for integration tests
//!
//! Wraps a `MemoryBackend`, records every call, and fails chosen calls on
//! demand.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use snapfeed::backend::{
    BackendError, Document, DocumentList, FileUpload, MemoryBackend, PreviewOptions, Query, RemoteBackend,
};
use snapfeed::shared::{Account, Session, UploadedFile};

/// Calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fail {
    CreateAccount,
    GetAccount,
    DeleteAccount,
    CreateSession,
    DeleteSession,
    CreateDocument,
    ListDocuments,
    UpdateDocument,
    DeleteDocument,
    CreateFile,
    DeleteFile,
}

/// What `file_preview_url` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    Normal,
    Error,
    Empty,
    Invalid,
}

/// A recorded backend call: operation name and its main argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub target: String,
}

pub struct FakeBackend {
    pub inner: MemoryBackend,
    failures: Mutex<HashSet<Fail>>,
    preview: Mutex<PreviewMode>,
    garbled: Mutex<HashSet<String>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            failures: Mutex::new(HashSet::new()),
            preview: Mutex::new(PreviewMode::Normal),
            garbled: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(&self, call: Fail) {
        self.failures.lock().unwrap().insert(call);
    }

    pub fn heal(&self, call: Fail) {
        self.failures.lock().unwrap().remove(&call);
    }

    pub fn set_preview(&self, mode: PreviewMode) {
        *self.preview.lock().unwrap() = mode;
    }

    /// Store documents in `collection_id` as usual but return them with
    /// every user attribute stripped
    pub fn garble_responses(&self, collection_id: &str) {
        self.garbled.lock().unwrap().insert(collection_id.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Targets of every recorded call to `op`
    pub fn targets(&self, op: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.op == op)
            .map(|call| call.target.clone())
            .collect()
    }

    /// Avatar URL the backend derives for a name
    pub fn avatar_url(&self, name: &str) -> String {
        self.inner.avatar_initials_url(name)
    }

    pub fn count(&self, op: &str) -> usize {
        self.targets(op).len()
    }

    fn record(&self, op: &'static str, target: &str, call: Fail) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(Call {
            op,
            target: target.to_string(),
        });
        if self.failures.lock().unwrap().contains(&call) {
            return Err(BackendError::http(503, format!("injected failure in {}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for FakeBackend {
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        self.record("create_account", email, Fail::CreateAccount)?;
        self.inner.create_account(account_id, email, password, name).await
    }

    async fn get_account(&self) -> Result<Account, BackendError> {
        self.record("get_account", "", Fail::GetAccount)?;
        self.inner.get_account().await
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), BackendError> {
        self.record("delete_account", account_id, Fail::DeleteAccount)?;
        self.inner.delete_account(account_id).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.record("create_email_session", email, Fail::CreateSession)?;
        self.inner.create_email_session(email, password).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.record("delete_session", session_id, Fail::DeleteSession)?;
        self.inner.delete_session(session_id).await
    }

    fn avatar_initials_url(&self, name: &str) -> String {
        self.inner.avatar_initials_url(name)
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        self.record("create_document", collection_id, Fail::CreateDocument)?;
        let mut document = self.inner.create_document(collection_id, document_id, data).await?;
        if self.garbled.lock().unwrap().contains(collection_id) {
            document.data.clear();
        }
        Ok(document)
    }

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document, BackendError> {
        self.calls.lock().unwrap().push(Call {
            op: "get_document",
            target: document_id.to_string(),
        });
        self.inner.get_document(collection_id, document_id).await
    }

    async fn list_documents(&self, collection_id: &str, queries: &[Query]) -> Result<DocumentList, BackendError> {
        self.record("list_documents", collection_id, Fail::ListDocuments)?;
        self.inner.list_documents(collection_id, queries).await
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        self.record("update_document", document_id, Fail::UpdateDocument)?;
        self.inner.update_document(collection_id, document_id, data).await
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), BackendError> {
        self.record("delete_document", document_id, Fail::DeleteDocument)?;
        self.inner.delete_document(collection_id, document_id).await
    }

    async fn create_file(&self, bucket_id: &str, file_id: &str, file: FileUpload) -> Result<UploadedFile, BackendError> {
        self.record("create_file", file_id, Fail::CreateFile)?;
        self.inner.create_file(bucket_id, file_id, file).await
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(Call {
            op: "file_preview_url",
            target: file_id.to_string(),
        });
        match *self.preview.lock().unwrap() {
            PreviewMode::Normal => self.inner.file_preview_url(bucket_id, file_id, options),
            PreviewMode::Error => Err(BackendError::http(500, "preview generation failed")),
            PreviewMode::Empty => Ok(String::new()),
            PreviewMode::Invalid => Ok("not a url".to_string()),
        }
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError> {
        self.record("delete_file", file_id, Fail::DeleteFile)?;
        self.inner.delete_file(bucket_id, file_id).await
    }
}

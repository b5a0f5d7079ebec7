//! # In-Process Backend
//!
//! A [`RemoteBackend`] held entirely in memory. It reproduces the behaviour
//! the client depends on: accounts with hashed passwords, a single active
//! session, documents per collection with equality/search/order/limit
//! queries, and files per bucket.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use snapfeed::backend::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{BackendError, Document, DocumentList, FileUpload, PreviewOptions, Query, RemoteBackend, CURRENT_SESSION};
use crate::shared::models::unique_id;
use crate::shared::{Account, Session, UploadedFile};

/// bcrypt cost for stored passwords; low because nothing here is persisted
const HASH_COST: u32 = 4;

/// Minimum password length accepted by the service
const PASSWORD_MIN: usize = 8;

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, StoredAccount>,
    /// session id -> account id
    sessions: HashMap<String, String>,
    current_session: Option<String>,
    /// collection id -> documents in insertion order
    collections: HashMap<String, Vec<Document>>,
    /// bucket id -> file id -> file
    buckets: HashMap<String, HashMap<String, StoredFile>>,
    last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Debug)]
struct StoredFile {
    file: UploadedFile,
    bytes: Bytes,
}

impl MemoryState {
    /// Strictly increasing timestamps keep `$createdAt` ordering total.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    fn current_account_id(&self) -> Option<&String> {
        self.current_session
            .as_ref()
            .and_then(|session| self.sessions.get(session))
    }
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in a collection
    pub async fn document_count(&self, collection_id: &str) -> usize {
        let state = self.state.read().await;
        state.collections.get(collection_id).map_or(0, Vec::len)
    }

    /// Ids of the files currently stored in a bucket
    pub async fn file_ids(&self, bucket_id: &str) -> Vec<String> {
        let state = self.state.read().await;
        let mut ids: Vec<String> = state
            .buckets
            .get(bucket_id)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Contents of a stored file
    pub async fn file_bytes(&self, bucket_id: &str, file_id: &str) -> Option<Bytes> {
        let state = self.state.read().await;
        state
            .buckets
            .get(bucket_id)
            .and_then(|files| files.get(file_id))
            .map(|stored| stored.bytes.clone())
    }

    /// Whether any session is active
    pub async fn has_active_session(&self) -> bool {
        self.state.read().await.current_session.is_some()
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        if password.chars().count() < PASSWORD_MIN {
            return Err(BackendError::http(
                400,
                "Invalid `password` param: Password must be at least 8 characters",
            ));
        }
        let password_hash = bcrypt::hash(password, HASH_COST)
            .map_err(|e| BackendError::http(500, format!("password hashing failed: {}", e)))?;

        let mut state = self.state.write().await;
        if state.accounts.contains_key(account_id)
            || state.accounts.values().any(|stored| stored.account.email == email)
        {
            return Err(BackendError::conflict(
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let account = Account {
            id: account_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        state.accounts.insert(
            account_id.to_string(),
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );
        tracing::debug!(account_id, "memory backend: account created");
        Ok(account)
    }

    async fn get_account(&self) -> Result<Account, BackendError> {
        let state = self.state.read().await;
        state
            .current_account_id()
            .and_then(|id| state.accounts.get(id))
            .map(|stored| stored.account.clone())
            .ok_or_else(|| BackendError::unauthorized("User (role: guests) missing scope (account)"))
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        if state.accounts.remove(account_id).is_none() {
            return Err(BackendError::not_found("User with the requested ID could not be found."));
        }
        state.sessions.retain(|_, owner| owner.as_str() != account_id);
        if let Some(current) = state.current_session.clone() {
            if !state.sessions.contains_key(&current) {
                state.current_session = None;
            }
        }
        Ok(())
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut state = self.state.write().await;
        if state.current_session.is_some() {
            return Err(BackendError::unauthorized(
                "Creation of a session is prohibited when a session is active.",
            ));
        }

        let account_id = state
            .accounts
            .values()
            .find(|stored| stored.account.email == email)
            .filter(|stored| bcrypt::verify(password, &stored.password_hash).unwrap_or(false))
            .map(|stored| stored.account.id.clone())
            .ok_or_else(|| {
                BackendError::unauthorized("Invalid credentials. Please check the email and password.")
            })?;

        let session_id = unique_id();
        state.sessions.insert(session_id.clone(), account_id.clone());
        state.current_session = Some(session_id.clone());

        Ok(Session {
            id: session_id,
            user_id: account_id,
            expire: None,
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let target = if session_id == CURRENT_SESSION {
            state.current_session.clone()
        } else {
            Some(session_id.to_string())
        };

        let target = match target {
            Some(id) if state.sessions.remove(&id).is_some() => id,
            _ => return Err(BackendError::unauthorized("No active session")),
        };
        if state.current_session.as_deref() == Some(target.as_str()) {
            state.current_session = None;
        }
        Ok(())
    }

    fn avatar_initials_url(&self, name: &str) -> String {
        let mut url = memory_url(&["avatars", "initials"]);
        url.query_pairs_mut().append_pair("name", name);
        url.to_string()
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let mut state = self.state.write().await;
        let created_at = state.next_timestamp();
        let documents = state.collections.entry(collection_id.to_string()).or_default();
        if documents.iter().any(|doc| doc.id == document_id) {
            return Err(BackendError::conflict("Document with the requested ID already exists."));
        }

        let document = Document {
            id: document_id.to_string(),
            created_at,
            updated_at: Some(created_at),
            data,
        };
        documents.push(document.clone());
        Ok(document)
    }

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document, BackendError> {
        let state = self.state.read().await;
        state
            .collections
            .get(collection_id)
            .and_then(|docs| docs.iter().find(|doc| doc.id == document_id))
            .cloned()
            .ok_or_else(|| document_not_found(document_id))
    }

    async fn list_documents(&self, collection_id: &str, queries: &[Query]) -> Result<DocumentList, BackendError> {
        let state = self.state.read().await;
        let documents = state
            .collections
            .get(collection_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(apply_queries(documents, queries))
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let mut state = self.state.write().await;
        let updated_at = state.next_timestamp();
        let document = state
            .collections
            .get_mut(collection_id)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == document_id))
            .ok_or_else(|| document_not_found(document_id))?;

        document.data.extend(data);
        document.updated_at = Some(updated_at);
        Ok(document.clone())
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let documents = state
            .collections
            .get_mut(collection_id)
            .ok_or_else(|| document_not_found(document_id))?;
        let before = documents.len();
        documents.retain(|doc| doc.id != document_id);
        if documents.len() == before {
            return Err(document_not_found(document_id));
        }
        Ok(())
    }

    async fn create_file(&self, bucket_id: &str, file_id: &str, file: FileUpload) -> Result<UploadedFile, BackendError> {
        let mut state = self.state.write().await;
        let files = state.buckets.entry(bucket_id.to_string()).or_default();
        if files.contains_key(file_id) {
            return Err(BackendError::conflict("A storage file with the requested ID already exists."));
        }

        let uploaded = UploadedFile {
            id: file_id.to_string(),
            bucket_id: Some(bucket_id.to_string()),
            name: Some(file.name),
            mime_type: Some(file.content_type),
            size_original: Some(file.bytes.len() as u64),
        };
        files.insert(
            file_id.to_string(),
            StoredFile {
                file: uploaded.clone(),
                bytes: file.bytes,
            },
        );
        Ok(uploaded)
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<String, BackendError> {
        let mut url = memory_url(&["storage", "buckets", bucket_id, "files", file_id, "preview"]);
        url.query_pairs_mut()
            .append_pair("width", &options.width.to_string())
            .append_pair("height", &options.height.to_string())
            .append_pair("gravity", options.gravity)
            .append_pair("quality", &options.quality.to_string());
        Ok(url.to_string())
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let removed = state
            .buckets
            .get_mut(bucket_id)
            .and_then(|files| files.remove(file_id));
        match removed {
            Some(stored) => {
                tracing::debug!(file_id = %stored.file.id, "memory backend: file deleted");
                Ok(())
            }
            None => Err(BackendError::not_found("The requested file could not be found.")),
        }
    }
}

fn document_not_found(document_id: &str) -> BackendError {
    BackendError::not_found(format!("Document {} could not be found.", document_id))
}

fn memory_url(segments: &[&str]) -> Url {
    let mut url = Url::parse("memory://backend/").expect("static base URL is valid");
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Filter, order, then page, the same way the remote service does.
fn apply_queries(documents: &[Document], queries: &[Query]) -> DocumentList {
    let mut matched: Vec<&Document> = documents
        .iter()
        .filter(|doc| queries.iter().all(|query| matches(doc, query)))
        .collect();
    let total = matched.len() as u64;

    let orders: Vec<(&str, bool)> = queries
        .iter()
        .filter_map(|query| match query {
            Query::OrderAsc(attr) => Some((attr.as_str(), false)),
            Query::OrderDesc(attr) => Some((attr.as_str(), true)),
            _ => None,
        })
        .collect();
    if !orders.is_empty() {
        matched.sort_by(|a, b| {
            orders
                .iter()
                .map(|(attr, desc)| {
                    let ordering = compare_values(a.attribute(attr).as_ref(), b.attribute(attr).as_ref());
                    if *desc {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    let offset = queries
        .iter()
        .rev()
        .find_map(|query| match query {
            Query::Offset(n) => Some(*n as usize),
            _ => None,
        })
        .unwrap_or(0);
    let limit = queries
        .iter()
        .rev()
        .find_map(|query| match query {
            Query::Limit(n) => Some(*n as usize),
            _ => None,
        })
        .unwrap_or(usize::MAX);

    DocumentList {
        total,
        documents: matched.into_iter().skip(offset).take(limit).cloned().collect(),
    }
}

fn matches(doc: &Document, query: &Query) -> bool {
    match query {
        Query::Equal { attribute, values } => match doc.attribute(attribute) {
            Some(Value::Array(items)) => items.iter().any(|item| values.contains(item)),
            Some(value) => values.contains(&value),
            None => false,
        },
        Query::Search { attribute, term } => {
            let words: Vec<String> = term.split_whitespace().map(str::to_lowercase).collect();
            match doc.attribute(attribute) {
                Some(Value::String(text)) if !words.is_empty() => {
                    let text = text.to_lowercase();
                    words.iter().any(|word| text.contains(word.as_str()))
                }
                _ => false,
            }
        }
        _ => true,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

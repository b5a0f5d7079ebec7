/**
 * HTTP Backend
 *
 * `RemoteBackend` over the REST API of an Appwrite-compatible service.
 * The session is carried in the cookie jar of the underlying
 * `reqwest::Client`, so one `HttpBackend` represents one signed-in client.
 *
 * Endpoints used:
 * - `POST /account`, `GET /account`, `DELETE /users/{id}` (server key)
 * - `POST /account/sessions/email`, `DELETE /account/sessions/{id}`
 * - `/databases/{db}/collections/{collection}/documents[/{id}]`
 * - `/storage/buckets/{bucket}/files[/{id}]`
 * - `/avatars/initials`, `/storage/buckets/{bucket}/files/{id}/preview` (URL only)
 */

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::{BackendError, Document, DocumentList, FileUpload, PreviewOptions, Query, RemoteBackend};
use crate::shared::{Account, BackendConfig, Session, UploadedFile};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const RESPONSE_FORMAT_HEADER: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.5.0";

/// REST client for the remote backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
}

impl HttpBackend {
    /// Build a client for the configured endpoint and project
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| BackendError::invalid_url(format!("{}: {}", config.endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(BackendError::invalid_url(format!(
                "{}: endpoint cannot carry a path",
                config.endpoint
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(PROJECT_HEADER, HeaderValue::from_str(&config.project_id)?);
        headers.insert(RESPONSE_FORMAT_HEADER, HeaderValue::from_static(RESPONSE_FORMAT));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint URL with extra path segments appended
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn documents_url(&self, collection_id: &str, document_id: Option<&str>) -> Url {
        let mut segments = vec![
            "databases",
            self.database_id.as_str(),
            "collections",
            collection_id,
            "documents",
        ];
        segments.extend(document_id);
        self.url(&segments)
    }

    fn files_url(&self, bucket_id: &str, file_id: Option<&str>) -> Url {
        let mut segments = vec!["storage", "buckets", bucket_id, "files"];
        segments.extend(file_id);
        self.url(&segments)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        let body = json!({
            "userId": account_id,
            "email": email,
            "password": password,
            "name": name,
        });
        self.send(self.client.post(self.url(&["account"])).json(&body)).await
    }

    async fn get_account(&self) -> Result<Account, BackendError> {
        self.send(self.client.get(self.url(&["account"]))).await
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), BackendError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            BackendError::unsupported("delete_account", "an API key is required to delete accounts")
        })?;
        let request = self
            .client
            .delete(self.url(&["users", account_id]))
            .header(KEY_HEADER, key);
        self.send_empty(request).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let body = json!({ "email": email, "password": password });
        let request = self
            .client
            .post(self.url(&["account", "sessions", "email"]))
            .json(&body);
        self.send(request).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BackendError> {
        let request = self.client.delete(self.url(&["account", "sessions", session_id]));
        self.send_empty(request).await
    }

    fn avatar_initials_url(&self, name: &str) -> String {
        let mut url = self.url(&["avatars", "initials"]);
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", &self.project_id);
        url.to_string()
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let body = json!({ "documentId": document_id, "data": data });
        let request = self
            .client
            .post(self.documents_url(collection_id, None))
            .json(&body);
        self.send(request).await
    }

    async fn get_document(&self, collection_id: &str, document_id: &str) -> Result<Document, BackendError> {
        self.send(self.client.get(self.documents_url(collection_id, Some(document_id))))
            .await
    }

    async fn list_documents(&self, collection_id: &str, queries: &[Query]) -> Result<DocumentList, BackendError> {
        let params = queries
            .iter()
            .map(|query| query.to_wire().map(|wire| ("queries[]", wire)))
            .collect::<Result<Vec<_>, _>>()?;
        let request = self
            .client
            .get(self.documents_url(collection_id, None))
            .query(&params);
        self.send(request).await
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let body = json!({ "data": data });
        let request = self
            .client
            .patch(self.documents_url(collection_id, Some(document_id)))
            .json(&body);
        self.send(request).await
    }

    async fn delete_document(&self, collection_id: &str, document_id: &str) -> Result<(), BackendError> {
        let request = self
            .client
            .delete(self.documents_url(collection_id, Some(document_id)));
        self.send_empty(request).await
    }

    async fn create_file(&self, bucket_id: &str, file_id: &str, file: FileUpload) -> Result<UploadedFile, BackendError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name)
            .mime_str(&file.content_type)?;
        let form = Form::new().text("fileId", file_id.to_string()).part("file", part);
        let request = self
            .client
            .post(self.files_url(bucket_id, None))
            .multipart(form);
        self.send(request).await
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<String, BackendError> {
        let mut url = self.url(&["storage", "buckets", bucket_id, "files", file_id, "preview"]);
        url.query_pairs_mut()
            .append_pair("width", &options.width.to_string())
            .append_pair("height", &options.height.to_string())
            .append_pair("gravity", options.gravity)
            .append_pair("quality", &options.quality.to_string())
            .append_pair("project", &self.project_id);
        Ok(url.to_string())
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError> {
        let request = self.client.delete(self.files_url(bucket_id, Some(file_id)));
        self.send_empty(request).await
    }
}

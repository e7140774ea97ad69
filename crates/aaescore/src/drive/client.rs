//! Drive v3 REST client.
//!
//! Implements [`RemoteTreeProvider`] over `files.list` / `files.get?alt=media`.
//! Credentials are an API key (`key=` query parameter), a bearer token, or
//! both. Every listing call carries the configured request timeout.

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::error::DriveError;
use super::provider::{FolderPage, RemoteTreeProvider};
use super::types::{ChildPage, DriveEntry, FolderRecord};
use crate::core::config;

const CHILD_FIELDS: &str = "nextPageToken, files(id,name,mimeType,size,webViewLink)";
const FOLDER_FIELDS: &str = "nextPageToken, files(id,name)";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    /// Drive reports sizes as decimal strings.
    size: Option<String>,
    web_view_link: Option<String>,
}

impl From<ApiFile> for DriveEntry {
    fn from(file: ApiFile) -> Self {
        DriveEntry {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size.and_then(|s| s.parse().ok()),
            link: file.web_view_link,
        }
    }
}

/// HTTP-backed remote tree provider.
pub struct DriveClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    access_token: Option<SecretString>,
}

impl DriveClient {
    /// Creates a client against `base_url` (e.g. `https://www.googleapis.com/drive/v3`).
    pub fn new(base_url: &str, api_key: Option<String>, access_token: Option<String>) -> Result<Self, DriveError> {
        let http = reqwest::Client::builder()
            .timeout(config::drive::timeout())
            .build()
            .map_err(DriveError::Http)?;

        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            api_key: api_key.map(SecretString::from),
            access_token: access_token.map(SecretString::from),
        })
    }

    /// Builds the client from `DRIVE_API_URL`, `DRIVE_API_KEY` and `DRIVE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, DriveError> {
        Self::new(
            &config::DRIVE_API_URL,
            config::DRIVE_API_KEY.clone(),
            config::DRIVE_ACCESS_TOKEN.clone(),
        )
    }

    fn request(&self, path: &str) -> Result<reqwest::RequestBuilder, DriveError> {
        let url = self.base_url.join(path)?;
        let mut builder = self
            .http
            .get(url)
            .query(&[("supportsAllDrives", "true"), ("includeItemsFromAllDrives", "true")]);
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key.expose_secret())]);
        }
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, DriveError> {
        let response = builder.send().await.map_err(DriveError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DriveError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }

    async fn list(
        &self,
        q: &str,
        fields: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FileListResponse, DriveError> {
        let page_size = page_size.to_string();
        let mut builder = self.request("files")?.query(&[
            ("q", q),
            ("fields", fields),
            ("pageSize", page_size.as_str()),
        ]);
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }
        let response = Self::send(builder).await?;
        response.json().await.map_err(DriveError::from_transport)
    }
}

/// `q` expression listing the non-trashed children of a folder.
pub fn children_query(folder_id: &str) -> String {
    format!("'{}' in parents and trashed=false", escape_query_literal(folder_id))
}

/// `q` expression listing every non-trashed folder, optionally under `scope`.
pub fn folders_query(scope: Option<&str>) -> String {
    let base = format!("mimeType='{}' and trashed=false", config::drive::FOLDER_MIME);
    match scope {
        Some(scope) => format!("{} and '{}' in parents", base, escape_query_literal(scope)),
        None => base,
    }
}

fn escape_query_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl RemoteTreeProvider for DriveClient {
    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<ChildPage, DriveError> {
        let response = self
            .list(&children_query(folder_id), CHILD_FIELDS, config::drive::PAGE_SIZE, page_token)
            .await?;
        Ok(ChildPage {
            entries: response.files.into_iter().map(DriveEntry::from).collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn list_folders(&self, scope: Option<&str>, page_token: Option<&str>) -> Result<FolderPage, DriveError> {
        let response = self
            .list(&folders_query(scope), FOLDER_FIELDS, config::drive::FOLDER_PAGE_SIZE, page_token)
            .await?;
        Ok(FolderPage {
            folders: response
                .files
                .into_iter()
                .map(|f| FolderRecord { id: f.id, name: f.name })
                .collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn download(&self, file_id: &str) -> Result<Bytes, DriveError> {
        let builder = self
            .request(&format!("files/{}", file_id))?
            .query(&[("alt", "media")])
            .timeout(config::drive::download_timeout());
        let response = Self::send(builder).await?;
        response.bytes().await.map_err(DriveError::from_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::provider::list_all_children;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_queries() {
        assert_eq!(children_query("abc"), "'abc' in parents and trashed=false");
        assert_eq!(
            folders_query(None),
            "mimeType='application/vnd.google-apps.folder' and trashed=false"
        );
        assert_eq!(
            folders_query(Some("s1")),
            "mimeType='application/vnd.google-apps.folder' and trashed=false and 's1' in parents"
        );
        assert_eq!(children_query("o'neil"), "'o\\'neil' in parents and trashed=false");
    }

    #[tokio::test]
    async fn test_list_children_parses_entries_and_drains_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [
                    {"id": "f2", "name": "Lab Manual.pdf", "mimeType": "application/pdf"}
                ]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files"))
            .and(query_param("key", "k-123"))
            .and(query_param("q", "'root' in parents and trashed=false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nextPageToken": "p2",
                "files": [
                    {"id": "d1", "name": "Week 1", "mimeType": "application/vnd.google-apps.folder"},
                    {"id": "f1", "name": "Slides.pdf", "mimeType": "application/pdf",
                     "size": "2048", "webViewLink": "https://drive.test/f1"}
                ]
            })))
            .mount(&server)
            .await;

        let client = DriveClient::new(&server.uri(), Some("k-123".to_string()), None).unwrap();
        let entries = list_all_children(&client, "root").await.unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_folder());
        assert_eq!(entries[1].size, Some(2048));
        assert_eq!(entries[1].link.as_deref(), Some("https://drive.test/f1"));
        assert_eq!(entries[2].size, None);

        let record = entries[2].clone().into_file_record();
        assert_eq!(record.link, "https://drive.google.com/file/d/f2/view");
    }

    #[tokio::test]
    async fn test_error_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = DriveClient::new(&server.uri(), None, None).unwrap();
        let err = client.list_children("root", None).await.unwrap_err();
        match err {
            DriveError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_folders_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .and(header("authorization", "Bearer t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "x", "name": "Fluid Mechanics"}]
            })))
            .mount(&server)
            .await;

        let client = DriveClient::new(&server.uri(), None, Some("t-1".to_string())).unwrap();
        let page = client.list_folders(None, None).await.unwrap();
        assert_eq!(
            page.folders,
            vec![FolderRecord {
                id: "x".to_string(),
                name: "Fluid Mechanics".to_string()
            }]
        );
        assert!(page.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_download_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/f9"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .mount(&server)
            .await;

        let client = DriveClient::new(&format!("{}/", server.uri()), None, None).unwrap();
        let bytes = client.download("f9").await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4");
    }
}

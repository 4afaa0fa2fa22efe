//! Authenticated request/response operations against the Zotero Web API.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::http_client::build_zotero_http_client;
use super::types::RawCollection;
use super::{AttachmentDownload, Collection, LibraryIdentity, ZoteroError, is_attachment};

/// Default Zotero API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.zotero.org";

/// Zotero Web API protocol version sent with every request.
pub const ZOTERO_API_VERSION: &str = "3";

const API_VERSION_HEADER: HeaderName = HeaderName::from_static("zotero-api-version");

/// Timeout for JSON metadata requests.
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest `limit` the API accepts for paged listings.
pub const MAX_PAGE_SIZE: usize = 100;

/// Timeout for binary file downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Stateless client for one Zotero library.
///
/// Each operation is a single authenticated `GET`. The client applies no
/// retries, rate limiting or caching; callers that need resilience against
/// upstream throttling add it around these calls.
#[derive(Clone)]
pub struct ZoteroClient {
    client: Client,
    base_url: Url,
    identity: LibraryIdentity,
    headers: HeaderMap,
}

impl ZoteroClient {
    /// Creates a client against the public Zotero API.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError::Config`] when the API key cannot be sent as a
    /// header, or [`ZoteroError::Client`] if HTTP client construction fails.
    #[tracing::instrument(skip_all, fields(scope = %identity.scope(), library_id = identity.library_id()))]
    pub fn new(identity: LibraryIdentity) -> Result<Self, ZoteroError> {
        Self::build(identity, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError::Config`] for an unusable base URL or API key,
    /// or [`ZoteroError::Client`] if HTTP client construction fails.
    #[tracing::instrument(skip_all, fields(scope = %identity.scope(), base_url))]
    pub fn with_base_url(
        identity: LibraryIdentity,
        base_url: impl AsRef<str>,
    ) -> Result<Self, ZoteroError> {
        Self::build(identity, base_url.as_ref())
    }

    fn build(identity: LibraryIdentity, base_url: &str) -> Result<Self, ZoteroError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ZoteroError::config(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ZoteroError::config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_static(ZOTERO_API_VERSION),
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", identity.api_key()))
            .map_err(|_| ZoteroError::config("API key contains invalid header characters"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            client: build_zotero_http_client()?,
            base_url,
            identity,
            headers,
        })
    }

    /// The library this client reads from.
    #[must_use]
    pub fn identity(&self) -> &LibraryIdentity {
        &self.identity
    }

    /// Lists all collections in the library, in API response order.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError`] on transport failure, non-success status or an
    /// unexpected response shape.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<Collection>, ZoteroError> {
        let url = self.endpoint(&["collections"]);
        info!(%url, "Fetching Zotero collections");

        let response = self.get_checked(&url, METADATA_TIMEOUT).await?;
        let raw: Vec<RawCollection> = decode_json(response, &url).await?;
        info!(count = raw.len(), "Retrieved collections");

        Ok(raw.into_iter().map(Collection::from).collect())
    }

    /// Lists the raw items of a collection, including child items such as
    /// attachments nested under their parents.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError`] on transport failure, non-success status or a
    /// non-array response.
    #[instrument(skip(self))]
    pub async fn list_collection_items(
        &self,
        collection_key: &str,
        include_attachments: bool,
    ) -> Result<Vec<Value>, ZoteroError> {
        let url = self.collection_items_url(collection_key, include_attachments);
        info!(%url, "Fetching collection items");

        let response = self.get_checked(&url, METADATA_TIMEOUT).await?;
        let items: Vec<Value> = decode_json(response, &url).await?;
        info!(count = items.len(), "Retrieved collection items");

        Ok(items)
    }

    /// Lists one page of a collection's raw items, starting at offset `start`.
    ///
    /// The API caps `limit` at [`MAX_PAGE_SIZE`]; a page shorter than the
    /// requested limit is the last one.
    ///
    /// # Errors
    ///
    /// Same as [`ZoteroClient::list_collection_items`].
    #[instrument(skip(self))]
    pub async fn list_collection_items_page(
        &self,
        collection_key: &str,
        include_attachments: bool,
        start: usize,
        limit: usize,
    ) -> Result<Vec<Value>, ZoteroError> {
        let mut url = self.collection_items_url(collection_key, include_attachments);
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("limit", &limit.min(MAX_PAGE_SIZE).to_string());
        debug!(%url, "Fetching collection items page");

        let response = self.get_checked(&url, METADATA_TIMEOUT).await?;
        let items: Vec<Value> = decode_json(response, &url).await?;
        debug!(start, count = items.len(), "Retrieved collection items page");

        Ok(items)
    }

    fn collection_items_url(&self, collection_key: &str, include_attachments: bool) -> Url {
        let mut url = self.endpoint(&["collections", collection_key, "items"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("format", "json");
            query.append_pair("top", "false");
            if include_attachments {
                query.append_pair("include", "data");
            }
        }
        url
    }

    /// Fetches a single raw item.
    ///
    /// Returns `Ok(None)` when the API reports 404.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError`] for any other failure.
    #[instrument(skip(self))]
    pub async fn get_item(&self, item_key: &str) -> Result<Option<Value>, ZoteroError> {
        let url = self.endpoint(&["items", item_key]);
        debug!(%url, "Fetching item");

        let response = self.send(&url, METADATA_TIMEOUT).await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(item_key, "Item not found (404)");
            return Ok(None);
        }

        let response = ensure_success(response, &url).await?;
        let item: Value = decode_json(response, &url).await?;
        info!(item_key, "Fetched item");
        Ok(Some(item))
    }

    /// Lists the attachment children of an item.
    ///
    /// Non-attachment children (notes, annotations) are filtered out.
    ///
    /// # Errors
    ///
    /// Returns [`ZoteroError`] on transport failure, non-success status or a
    /// non-array response.
    #[instrument(skip(self))]
    pub async fn list_item_children(&self, item_key: &str) -> Result<Vec<Value>, ZoteroError> {
        let url = self.endpoint(&["items", item_key, "children"]);
        debug!(%url, "Fetching item children");

        let response = self.get_checked(&url, METADATA_TIMEOUT).await?;
        let children: Vec<Value> = decode_json(response, &url).await?;

        for child in &children {
            let data = child.get("data");
            let field = |name: &str| {
                data.and_then(|d| d.get(name))
                    .and_then(Value::as_str)
                    .unwrap_or("n/a")
            };
            debug!(
                item_type = field("itemType"),
                content_type = field("contentType"),
                link_mode = field("linkMode"),
                title = field("title"),
                "Child item"
            );
        }

        let total = children.len();
        let attachments: Vec<Value> = children.into_iter().filter(is_attachment).collect();
        info!(
            item_key,
            children = total,
            attachments = attachments.len(),
            "Fetched item attachments"
        );
        Ok(attachments)
    }

    /// Downloads the stored file of an attachment item.
    ///
    /// Follows the redirect to the storage host and accepts only PDF content.
    /// Failures are logged and reported as [`AttachmentDownload::Unavailable`];
    /// this never returns an error.
    #[instrument(skip(self))]
    pub async fn download_attachment(&self, item_key: &str) -> AttachmentDownload {
        let url = self.endpoint(&["items", item_key, "file"]);
        info!(%url, "Downloading attachment");

        let response = match self.send(&url, DOWNLOAD_TIMEOUT).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Attachment download failed");
                return AttachmentDownload::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        let response = match ensure_success(response, &url).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, status = ?e.status(), "Attachment download rejected");
                return AttachmentDownload::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        debug!(final_url = %response.url(), %content_type, "Download response");

        if !content_type.to_ascii_lowercase().contains("pdf") {
            warn!(item_key, %content_type, "Attachment is not a PDF");
            return AttachmentDownload::NotPdf { content_type };
        }

        match response.bytes().await {
            Ok(bytes) => {
                info!(bytes = bytes.len(), "Downloaded PDF");
                AttachmentDownload::Found(bytes.to_vec())
            }
            Err(e) => {
                error!(error = %e, "Failed reading attachment body");
                AttachmentDownload::Unavailable {
                    reason: format!("failed reading body: {e}"),
                }
            }
        }
    }

    /// Builds `{base}/{users|groups}/{id}/{segments...}` with each segment
    /// percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(self.identity.scope().path_segment())
                .push(self.identity.library_id())
                .extend(segments);
        }
        url
    }

    async fn send(&self, url: &Url, timeout: Duration) -> Result<Response, ZoteroError> {
        self.client
            .get(url.clone())
            .headers(self.headers.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| ZoteroError::Network {
                url: url.to_string(),
                source,
            })
    }

    async fn get_checked(&self, url: &Url, timeout: Duration) -> Result<Response, ZoteroError> {
        let response = self.send(url, timeout).await?;
        ensure_success(response, url).await
    }
}

impl std::fmt::Debug for ZoteroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroClient")
            .field("base_url", &self.base_url.as_str())
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

async fn ensure_success(response: Response, url: &Url) -> Result<Response, ZoteroError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "Zotero API error response");
    Err(ZoteroError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ZoteroError> {
    let bytes = response.bytes().await.map_err(|source| ZoteroError::Network {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ZoteroError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ZoteroClient {
        let identity = LibraryIdentity::personal("secret-key", "475425").unwrap();
        ZoteroClient::with_base_url(identity, base).unwrap()
    }

    #[test]
    fn test_endpoint_personal_library() {
        let client = client("https://api.zotero.org");
        assert_eq!(
            client.endpoint(&["collections"]).as_str(),
            "https://api.zotero.org/users/475425/collections"
        );
    }

    #[test]
    fn test_endpoint_group_library_with_trailing_slash() {
        let identity = LibraryIdentity::group("k", "99").unwrap();
        let client = ZoteroClient::with_base_url(identity, "http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint(&["items", "ABC", "file"]).as_str(),
            "http://localhost:8080/groups/99/items/ABC/file"
        );
    }

    #[test]
    fn test_endpoint_encodes_keys() {
        let client = client("https://api.zotero.org");
        let url = client.endpoint(&["items", "A/B C"]);
        assert!(url.as_str().ends_with("/items/A%2FB%20C"), "got {url}");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let identity = LibraryIdentity::personal("k", "1").unwrap();
        let err = ZoteroClient::with_base_url(identity.clone(), "not a url").unwrap_err();
        assert!(err.is_config());

        let err = ZoteroClient::with_base_url(identity, "mailto:someone@example.com").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_rejects_api_key_with_newline() {
        let identity = LibraryIdentity::personal("bad\nkey", "1").unwrap();
        let err = ZoteroClient::new(identity).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_headers_carry_version_and_bearer() {
        let client = client("https://api.zotero.org");
        assert_eq!(client.headers.get("zotero-api-version").unwrap(), "3");
        let auth = client.headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer secret-key");
    }

    #[test]
    fn test_debug_omits_api_key() {
        let debug = format!("{:?}", client("https://api.zotero.org"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("475425"));
    }
}

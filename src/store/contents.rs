//! HTTP client for a repository contents API.
//!
//! The document lives as a file in a repository. A read returns the file's blob sha, used as the
//! version token, and its base64 content; a write sends the full new content along with the sha
//! it replaces, and the API rejects it with 409 when that sha is no longer current.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use dioxus_logger::tracing;
use reqwest::{header::ACCEPT, Method, RequestBuilder, Response, StatusCode};

use crate::{
    config::{Config, RepositoryConfig},
    error::{ConfigError, StoreError},
    model::{
        contents::{
            ApiErrorBody, ContentsFile, RateLimit, RateLimitResponse, UpdateContentsRequest,
            UpdateContentsResponse,
        },
        Document,
    },
    store::{Credential, DocumentStore, VersionToken, VersionedDocument},
};

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// [`DocumentStore`] backed by the contents REST API.
#[derive(Clone)]
pub struct ContentsApiStore {
    http: reqwest::Client,
    repository: RepositoryConfig,
}

impl ContentsApiStore {
    /// Build a client for the repository in `config`.
    ///
    /// # Returns
    /// - `Ok(ContentsApiStore)` - Client ready for requests
    /// - `Err(ConfigError::HttpClient)` - TLS backend or client settings could not be initialized
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.retry.attempt_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            repository: config.repository.clone(),
        })
    }

    /// Current request budget of `credential`, or of the caller's address when anonymous.
    pub async fn rate_limit(&self, credential: Option<&Credential>) -> Result<RateLimit, StoreError> {
        let url = format!("{}/rate_limit", self.api_url());
        let response = self.request(Method::GET, &url, credential).send().await?;
        let response = check_status(response, None).await?;
        let body: RateLimitResponse = response.json().await?;

        Ok(body.rate)
    }

    fn api_url(&self) -> &str {
        self.repository.api_url.trim_end_matches('/')
    }

    fn request(&self, method: Method, url: &str, credential: Option<&Credential>) -> RequestBuilder {
        let request = self.http.request(method, url).header(ACCEPT, ACCEPT_JSON);

        match credential {
            Some(credential) => request.bearer_auth(credential.expose()),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for ContentsApiStore {
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError> {
        let url = self.repository.contents_url();
        let mut request = self.request(Method::GET, &url, credential);
        if let Some(branch) = &self.repository.branch {
            request = request.query(&[("ref", branch.as_str())]);
        }

        let response = check_status(request.send().await?, None).await?;
        let file: ContentsFile = response.json().await?;

        if let Some(encoding) = file.encoding.as_deref() {
            if encoding != "base64" {
                return Err(StoreError::MalformedContent(format!(
                    "unsupported content encoding {:?}",
                    encoding
                )));
            }
        }

        let document = Document::from_json(&decode_content(&file.content)?)?;

        tracing::debug!(
            "Fetched document version {} ({} members, {} registrations)",
            file.sha,
            document.members.len(),
            document.registrations.len()
        );

        Ok(VersionedDocument {
            document,
            version: VersionToken::new(file.sha),
        })
    }

    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError> {
        let url = self.repository.contents_url();
        let body = UpdateContentsRequest {
            message,
            content: STANDARD.encode(document.to_json_pretty()?),
            sha: expected.as_str(),
            branch: self.repository.branch.as_deref(),
        };

        let response = self
            .request(Method::PUT, &url, Some(credential))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, Some(expected)).await?;
        let updated: UpdateContentsResponse = response.json().await?;

        tracing::debug!(
            "Wrote document version {} over {}",
            updated.content.sha,
            expected
        );

        Ok(VersionToken::new(updated.content.sha))
    }

    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        let url = format!("{}/user", self.api_url());
        let response = self.request(Method::GET, &url, Some(credential)).send().await?;
        check_status(response, None).await?;

        Ok(())
    }
}

/// Decode the API's line-wrapped base64 payload.
fn decode_content(content: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    Ok(STANDARD.decode(compact)?)
}

/// Pass successful responses through, classify everything else.
async fn check_status(
    response: Response,
    expected: Option<&VersionToken>,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ApiErrorBody = response.json().await.unwrap_or_default();
    let message = if body.message.is_empty() {
        status.to_string()
    } else {
        body.message
    };

    Err(classify_status(status, message, expected))
}

fn classify_status(
    status: StatusCode,
    message: String,
    expected: Option<&VersionToken>,
) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthorized(message),
        StatusCode::FORBIDDEN => StoreError::Forbidden(message),
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => StoreError::VersionConflict {
            expected: expected.map(ToString::to_string).unwrap_or_default(),
        },
        StatusCode::TOO_MANY_REQUESTS => StoreError::TransientNetwork(message),
        s if s.is_server_error() => StoreError::TransientNetwork(message),
        s => StoreError::UnexpectedStatus {
            status: s.as_u16(),
            message,
        },
    }
}

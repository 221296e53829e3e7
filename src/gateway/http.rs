//! Glossary REST API client.
//!
//! # Security
//!
//! When credentials are configured every request carries `x-auth-user` and
//! `x-auth-token`. The token is held in a `SecretString` and only exposed
//! while the header is built; the header value itself is marked sensitive so
//! it never shows up in request debug output.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{Config, Credentials};
use crate::entry::GlossaryEntryDto;
use crate::error::{Result, TermbaseError};
use crate::query::PageRequest;
use crate::types::EntryId;

use super::error::{ApiError, Operation};
use super::{EntryPage, GlossaryGateway, GlossaryStats, ImportRequest};

const HEADER_AUTH_USER: &str = "x-auth-user";
const HEADER_AUTH_TOKEN: &str = "x-auth-token";

/// Sensitive header value that redacts itself when formatted
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value).map_err(|_| {
            TermbaseError::Config("auth token contains invalid header characters".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

fn auth_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let user = HeaderValue::from_str(&credentials.user).map_err(|_| {
        TermbaseError::Config("auth user contains invalid header characters".to_string())
    })?;
    let token = RedactedHeader::new(credentials.token.expose_secret()).as_header_value()?;

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(HEADER_AUTH_USER), user);
    headers.insert(HeaderName::from_static(HEADER_AUTH_TOKEN), token);
    Ok(headers)
}

/// The save endpoint has answered both with a bare list and with a wrapped
/// one depending on server version.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveResponse {
    List(Vec<GlossaryEntryDto>),
    Wrapped {
        #[serde(alias = "glossaryEntries", alias = "results")]
        entries: Vec<GlossaryEntryDto>,
    },
}

/// [`GlossaryGateway`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    api_url: Url,
    auth: HeaderMap,
}

impl HttpGateway {
    /// Build a gateway from configuration. Fails if no server URL is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_url()?,
            config.credentials().as_ref(),
            config.request_timeout(),
        )
    }

    /// `api_url` is the REST root and must end in `/`
    pub fn new(api_url: Url, credentials: Option<&Credentials>, timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        let auth = match credentials {
            Some(credentials) => auth_headers(credentials)?,
            None => {
                tracing::debug!("no glossary credentials configured, requests are anonymous");
                HeaderMap::new()
            }
        };

        Ok(Self {
            client,
            api_url,
            auth,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.api_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.client.request(method, url).headers(self.auth.clone())
    }

    /// Send and fail on a non-success status
    async fn send(&self, builder: RequestBuilder, operation: Operation) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_error(operation))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let error = ApiError::from_response(response).await;
            tracing::warn!("glossary request failed: {}", error);
            Err(error.into_error(operation))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: Operation,
    ) -> Result<T> {
        let response = self.send(builder, operation).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::from(e).into_error(operation))
    }
}

impl GlossaryGateway for HttpGateway {
    async fn fetch_entries(&self, request: &PageRequest) -> Result<EntryPage> {
        let mut url = self.endpoint("glossary/entries")?;
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        self.send_json(self.request(Method::GET, url), Operation::Fetch)
            .await
    }

    async fn fetch_stats(&self) -> Result<GlossaryStats> {
        let url = self.endpoint("glossary/info")?;
        self.send_json(self.request(Method::GET, url), Operation::Fetch)
            .await
    }

    async fn save_entries(&self, entries: &[GlossaryEntryDto]) -> Result<Vec<GlossaryEntryDto>> {
        let url = self.endpoint("glossary/entries")?;
        let builder = self.request(Method::POST, url).json(entries);
        let response = self.send(builder, Operation::Save).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from(e).into_error(Operation::Save))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let saved = serde_json::from_str::<SaveResponse>(&body).map_err(|e| {
            TermbaseError::SaveFailure(format!("unexpected response from glossary server: {e}"))
        })?;
        Ok(match saved {
            SaveResponse::List(entries) | SaveResponse::Wrapped { entries } => entries,
        })
    }

    async fn delete_entry(&self, id: EntryId) -> Result<()> {
        let url = self.endpoint(&format!("glossary/entries/{id}"))?;
        self.send(self.request(Method::DELETE, url), Operation::Delete(id))
            .await?;
        Ok(())
    }

    async fn import_file(&self, request: &ImportRequest) -> Result<()> {
        let url = self.endpoint("glossary")?;
        let part = Part::bytes(request.contents.clone()).file_name(request.file_name.clone());
        let form = Form::new()
            .part("file", part)
            .text("fileName", request.file_name.clone())
            .text("srcLocale", request.src_locale.clone())
            .text("transLocale", request.trans_locale.clone());

        self.send(self.request(Method::POST, url).multipart(form), Operation::Import)
            .await?;
        Ok(())
    }
}

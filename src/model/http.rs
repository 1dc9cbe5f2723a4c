/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! Minimal authenticated REST client
//!
//! [`RestClient`] dispatches GET/POST/PUT/DELETE requests against a base URL,
//! applies basic auth and persistent headers, and turns every failing status
//! into an [`AppError::Response`] of the matching kind. It never retries.
//!
//! # Example
//! ```ignore
//! use hub_sync::model::http::{RequestOptions, RestClient};
//!
//! let client = RestClient::new("http://hub.local/hub", Credentials::basic("admin", "secret"))?;
//! let users: serde_json::Value = client
//!     .get_json("/api/rest/users", RequestOptions::new().query("fields", "id,login"))
//!     .await?;
//! ```

use crate::application::config::{Credentials, ServiceConfig};
use crate::constants::{JSON_CONTENT_TYPE, USER_AGENT};
use crate::error::{AppError, AppResult, ResponseError};
use crate::model::pagination::Paginator;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpInternalClient, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// Query parameters, ordered by key; inserting an existing key replaces it
pub type QueryParams = BTreeMap<String, String>;

/// A named file sent as one part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name announced in the part's content disposition
    pub file_name: String,
    /// Raw file content
    pub content: Vec<u8>,
    /// MIME type of the part, `application/octet-stream` when absent
    pub mime: Option<String>,
}

impl Attachment {
    /// Creates an attachment without an explicit MIME type
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime: None,
        }
    }

    /// Sets the MIME type of the part
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    fn into_part(self) -> AppResult<Part> {
        let part = Part::bytes(self.content).file_name(self.file_name);
        match self.mime {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

/// Per-call overrides for [`RestClient::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters
    pub query: QueryParams,
    /// Query parameters applied after `query`, winning on key collisions
    pub extra_query: QueryParams,
    /// Body, sent as JSON unless `files` is non-empty
    pub body: Option<Value>,
    /// Multipart attachments keyed by form field name
    pub files: BTreeMap<String, Attachment>,
    /// Headers overriding the client's persistent headers for this call only
    ///
    /// A `Content-Type` here replaces the JSON one, except on multipart bodies.
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Adds every parameter of `params` to the query
    #[must_use]
    pub fn with_query(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Adds one extra query parameter, applied after the regular ones
    #[must_use]
    pub fn extra_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_query.insert(key.into(), value.to_string());
        self
    }

    /// Sets the body
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` and sets it as the body
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> AppResult<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// Attaches a file under the form field `field`
    #[must_use]
    pub fn file(mut self, field: impl Into<String>, attachment: Attachment) -> Self {
        self.files.insert(field.into(), attachment);
        self
    }

    /// Overrides one header for this call
    pub fn header(mut self, name: &str, value: &str) -> AppResult<Self> {
        self.headers
            .insert(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
        Ok(self)
    }

    /// The final query string parameters: `query` then `extra_query`
    #[must_use]
    pub fn merged_query(&self) -> QueryParams {
        let mut params = self.query.clone();
        params.extend(self.extra_query.clone());
        params
    }

    fn without_body(mut self) -> Self {
        self.body = None;
        self.files.clear();
        self
    }
}

/// Authenticated REST client bound to one base URL
///
/// The client is immutable once built; the `with_*` methods return a new
/// value, and per-call header overrides go through [`RequestOptions`].
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    credentials: Credentials,
    headers: HeaderMap,
    timeout: Option<Duration>,
    http_client: HttpInternalClient,
}

impl RestClient {
    /// Creates a client with no transport timeout
    ///
    /// # Arguments
    /// * `base_url` - URL relative endpoints are appended to
    /// * `credentials` - basic auth is used when both username and password are set
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> AppResult<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(AppError::InvalidInput("base url is empty".to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            headers: HeaderMap::new(),
            timeout: None,
            http_client: build_http_client(None)?,
        })
    }

    /// Creates a client from a service configuration, including its timeout
    pub fn from_config(config: &ServiceConfig) -> AppResult<Self> {
        let client = Self::new(config.base_url.clone(), config.credentials.clone())?;
        match config.timeout {
            Some(secs) => client.with_timeout(secs),
            None => Ok(client),
        }
    }

    /// Returns a copy of this client that sends `name: value` with every request
    pub fn with_header(mut self, name: &str, value: &str) -> AppResult<Self> {
        self.headers
            .insert(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
        Ok(self)
    }

    /// Returns a copy of this client whose transport gives up after `secs` seconds
    ///
    /// Zero removes the transport timeout.
    pub fn with_timeout(mut self, secs: u64) -> AppResult<Self> {
        let timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self.http_client = build_http_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// Base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credentials the client was built with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Bearer token, if one was configured
    pub fn token(&self) -> Option<&str> {
        self.credentials.token.as_deref()
    }

    /// Persistent headers merged into every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Transport timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolves `endpoint` against the base URL; absolute URLs pass through
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Makes a GET request; any body in `options` is dropped
    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> AppResult<Response> {
        self.request(Method::GET, endpoint, options.without_body())
            .await
    }

    /// Makes a GET request and deserializes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> AppResult<T> {
        let response = self.get(endpoint, options).await?;
        Ok(response.json().await?)
    }

    /// Makes a POST request
    pub async fn post(&self, endpoint: &str, options: RequestOptions) -> AppResult<Response> {
        self.request(Method::POST, endpoint, options).await
    }

    /// Makes a PUT request
    pub async fn put(&self, endpoint: &str, options: RequestOptions) -> AppResult<Response> {
        self.request(Method::PUT, endpoint, options).await
    }

    /// Makes a DELETE request; any body in `options` is dropped
    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> AppResult<Response> {
        self.request(Method::DELETE, endpoint, options.without_body())
            .await
    }

    /// Dispatches one request and classifies the response
    ///
    /// With attachments the body goes out as multipart form data and no JSON
    /// content type is sent; otherwise the body is JSON with
    /// `Content-Type: application/json` unless the call overrides it.
    ///
    /// # Returns
    /// * `Ok(Response)` - status below 400, untouched
    /// * `Err(AppError::Response)` - status 400 and above, classified by kind
    /// * `Err(AppError::Network)` - no response was received
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> AppResult<Response> {
        let url = self.url_for(endpoint);
        let params = options.merged_query();

        let mut headers = self.headers.clone();
        if options.files.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        debug!("{} {}", method, url);

        let mut request = self.http_client.request(method, &url).query(&params);

        if let Some((username, password)) = self.credentials.basic_auth() {
            request = request.basic_auth(username, Some(password));
        }

        if options.files.is_empty() {
            request = request.headers(headers);
            if let Some(body) = &options.body {
                request = request.body(serde_json::to_vec(body)?);
            }
        } else {
            headers.remove(CONTENT_TYPE);
            let form = build_form(options.body, options.files)?;
            request = request.headers(headers).multipart(form);
        }

        let response = request.send().await?;
        debug!("Response status: {}", response.status());

        check_response(response).await
    }

    /// Lazily walks a `$top`/`$skip` paginated collection behind `endpoint`
    ///
    /// # Arguments
    /// * `endpoint` - collection endpoint
    /// * `options` - query parameters shared by every page
    /// * `search_key` - field of the response body holding the page's elements
    /// * `top` - page size, must be positive
    pub fn paginate<'a, T: DeserializeOwned>(
        &'a self,
        endpoint: &str,
        mut options: RequestOptions,
        search_key: &str,
        top: u32,
    ) -> AppResult<Paginator<'a, T>> {
        let endpoint = endpoint.to_string();
        let base_params = std::mem::take(&mut options.query);
        let options = options.without_body();

        let fetch = move |page_params: QueryParams| {
            let mut page_options = options.clone();
            page_options.query = page_params;
            let endpoint = endpoint.clone();
            async move { self.get_json::<Value>(&endpoint, page_options).await }
        };

        Paginator::with_top(fetch, base_params, search_key, top)
    }
}

impl fmt::Display for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

/// Passes successful responses through and turns failing ones into errors
///
/// Statuses below 400 succeed. The failing body is logged, not returned.
pub async fn check_response(response: Response) -> AppResult<Response> {
    let status = response.status();
    match ResponseError::from_status(status) {
        None => Ok(response),
        Some(err) => {
            let body = response.text().await.unwrap_or_default();
            error!("Request failed with status {}: {}", status, body);
            Err(AppError::Response(err))
        }
    }
}

fn build_http_client(timeout: Option<Duration>) -> AppResult<HttpInternalClient> {
    let mut builder = HttpInternalClient::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Builds the multipart form: top-level body fields become text parts
fn build_form(body: Option<Value>, files: BTreeMap<String, Attachment>) -> AppResult<Form> {
    let mut form = Form::new();

    match body {
        None | Some(Value::Null) => {}
        Some(Value::Object(fields)) => {
            for (name, value) in fields {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                form = form.text(name, text);
            }
        }
        Some(_) => {
            return Err(AppError::InvalidInput(
                "a body sent with files must be a JSON object".to_string(),
            ));
        }
    }

    for (field, attachment) in files {
        form = form.part(field, attachment.into_part()?);
    }
    Ok(form)
}

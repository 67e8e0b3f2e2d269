//! HTTP client for the hosted backend.
//!
//! The hosted backend exposes its Postgres tables through a REST interface
//! (`/rest/v1/{table}`, filters as `column=op.value` query parameters, stored
//! procedures under `/rest/v1/rpc/{name}`) and its auth service under
//! `/auth/v1`. Every response body is decoded into an explicit type; a body
//! that does not match is a [`RemoteError::Decode`], never a defaulted value.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::BackendSettings;

/// Errors raised by [`RemoteClient`].
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid backend settings: {0}")]
    Settings(String),

    #[error("request to {context} failed: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned HTTP {status}: {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// HTTP status for [`RemoteError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A column filter in the hosted REST dialect, e.g. `("athlete_id", "eq.<uuid>")`.
pub type Filter = (&'static str, String);

pub fn eq(column: &'static str, value: impl ToString) -> Filter {
    (column, format!("eq.{}", value.to_string()))
}

pub fn gte(column: &'static str, value: impl ToString) -> Filter {
    (column, format!("gte.{}", value.to_string()))
}

pub fn lte(column: &'static str, value: impl ToString) -> Filter {
    (column, format!("lte.{}", value.to_string()))
}

/// Shared client for the hosted REST and auth APIs.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&settings.api_key).map_err(|_| {
            RemoteError::Settings("api key contains invalid header characters".to_string())
        })?;
        headers.insert("apikey", key);

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Table request authorized with the service key.
    fn table_request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.rest_url(table))
            .bearer_auth(&self.api_key)
    }

    // ==================== Tables ====================

    /// `SELECT *` with filters plus optional `order`/`limit` parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, RemoteError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().map(|(k, v)| (*k, v.clone())));
        if let Some(order) = order {
            query.push(("order", order.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let request = self.table_request(Method::GET, table).query(&query);
        self.send_json(request, &format!("select {}", table)).await
    }

    /// Insert one or many rows and return the stored representation.
    pub async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows);
        self.send_json(request, &format!("insert {}", table)).await
    }

    /// Patch the rows matching `filters` and return them.
    pub async fn update<B, T>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &B,
    ) -> Result<Vec<T>, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(filters)
            .json(patch);
        self.send_json(request, &format!("update {}", table)).await
    }

    /// Delete the rows matching `filters` and return them.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, RemoteError> {
        let request = self
            .table_request(Method::DELETE, table)
            .header("Prefer", "return=representation")
            .query(filters);
        self.send_json(request, &format!("delete {}", table)).await
    }

    /// Invoke a stored procedure (`/rest/v1/rpc/{function}`).
    pub async fn rpc<B, T>(&self, function: &str, args: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::POST, &format!("rpc/{}", function))
            .json(args);
        self.send_json(request, &format!("rpc {}", function)).await
    }

    // ==================== Auth ====================

    /// POST to the auth API; `bearer` is a user access token when the call acts
    /// on behalf of a signed-in user.
    pub async fn auth_post<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.auth_url(path))
            .query(query)
            .bearer_auth(bearer.unwrap_or(&self.api_key))
            .json(body);
        self.send_json(request, &format!("auth {}", path)).await
    }

    /// POST to the auth API ignoring the response body.
    pub async fn auth_post_empty(&self, path: &str, bearer: &str) -> Result<(), RemoteError> {
        let context = format!("auth {}", path);
        let response = self
            .http
            .post(self.auth_url(path))
            .header(AUTHORIZATION, format!("Bearer {}", bearer))
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                context: context.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            context,
            status: status.as_u16(),
            body,
        })
    }

    /// GET from the auth API on behalf of a user.
    pub async fn auth_get<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: &str,
    ) -> Result<T, RemoteError> {
        let request = self.http.get(self.auth_url(path)).bearer_auth(bearer);
        self.send_json(request, &format!("auth {}", path)).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                context: context.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RemoteError::Transport {
                context: context.to_string(),
                source,
            })?;

        if !status.is_success() {
            log::debug!("{} failed with HTTP {}: {}", context, status, body.trim());
            return Err(RemoteError::Status {
                context: context.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|source| RemoteError::Decode {
            context: context.to_string(),
            source,
        })
    }
}

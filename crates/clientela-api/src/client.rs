// Registry service HTTP client
//
// Wraps `reqwest::Client` with URL construction for the `/clientes`
// resource tree and uniform response handling. List endpoints hand back
// raw JSON items; reconciling their shapes is the caller's job.

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{Cliente, ErrorBody};
use crate::transport::TransportConfig;

const RESOURCE: &str = "clientes";

/// Async client for the customer registry service.
///
/// Every list method returns the items of the JSON array body untouched.
/// A body that is not a JSON array is treated as an empty list.
#[derive(Clone)]
pub struct ClientesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ClientesClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the service rooted at `base_url`
    /// (e.g. `http://localhost:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { http, base_url })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so a record key can never escape its path position.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut full = self.base_url.clone();
        full.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(RESOURCE)
            .extend(segments);
        Ok(full)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// `GET /clientes`
    pub async fn list_all(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.get_list(self.url(&[])?, None).await
    }

    /// `GET /clientes/buscar?q=`
    pub async fn search(&self, term: &str) -> Result<Vec<serde_json::Value>, Error> {
        self.get_list(self.url(&["buscar"])?, Some(term)).await
    }

    /// `GET /clientes/validacion/todos`
    pub async fn list_validated(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.get_list(self.url(&["validacion", "todos"])?, None)
            .await
    }

    /// `GET /clientes/validacion/errores`
    pub async fn list_with_errors(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.get_list(self.url(&["validacion", "errores"])?, None)
            .await
    }

    /// `GET /clientes/validacion/buscar?q=`
    pub async fn search_validated(&self, term: &str) -> Result<Vec<serde_json::Value>, Error> {
        self.get_list(self.url(&["validacion", "buscar"])?, Some(term))
            .await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// `POST /clientes`
    pub async fn create(&self, cliente: &Cliente) -> Result<(), Error> {
        let url = self.url(&[])?;
        self.send_json(reqwest::Method::POST, url, cliente).await
    }

    /// `PUT /clientes/{clave}`
    pub async fn update(&self, clave: &str, cliente: &Cliente) -> Result<(), Error> {
        let url = self.url(&[clave])?;
        self.send_json(reqwest::Method::PUT, url, cliente).await
    }

    /// `DELETE /clientes/{clave}`
    pub async fn delete(&self, clave: &str) -> Result<(), Error> {
        let url = self.url(&[clave])?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::check_status(resp).await.map(drop)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_list(
        &self,
        url: Url,
        term: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, Error> {
        debug!("GET {url} q={term:?}");

        let mut builder = self.http.get(url);
        if let Some(q) = term {
            builder = builder.query(&[("q", q)]);
        }
        let resp = builder.send().await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;

        Ok(parse_list_body(&body))
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<(), Error> {
        debug!("{method} {url}");

        let resp = self.http.request(method, url).json(body).send().await?;
        Self::check_status(resp).await.map(drop)
    }

    /// Pass 2xx responses through; turn everything else into an `Error`.
    ///
    /// A JSON body carrying a non-empty `errores` list becomes
    /// [`Error::Validation`]; any other body is surfaced verbatim.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        if let Ok(ErrorBody {
            errores: Some(errors),
        }) = serde_json::from_str::<ErrorBody>(&body)
        {
            if !errors.is_empty() {
                return Err(Error::Validation {
                    status: status.as_u16(),
                    errors,
                });
            }
        }

        Err(Error::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

/// Extract the items of a list body. Anything other than a JSON array
/// yields an empty list.
fn parse_list_body(body: &str) -> Vec<serde_json::Value> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(other) => {
            warn!(kind = json_kind(&other), "list body is not an array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            let preview: String = body.chars().take(200).collect();
            warn!(error = %e, %preview, "list body is not valid JSON, treating as empty");
            Vec::new()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

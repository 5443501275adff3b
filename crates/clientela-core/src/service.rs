// ── Registry service seam ──
//
// The controller talks to the service only through `RegistryService`, so
// tests can script responses and timings without a network. Reads hand back
// raw JSON items; the controller runs them through the normalizer.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use clientela_api::{Cliente, ClientesClient};

use crate::error::CoreError;
use crate::model::{Record, ViewMode};

/// Remote operations needed by [`SyncController`](crate::SyncController).
pub trait RegistryService: Send + Sync + 'static {
    /// Load the full set for `mode`.
    fn load(&self, mode: ViewMode) -> impl Future<Output = Result<Vec<Value>, CoreError>> + Send;

    /// Server-side search for `mode`. `term` is never blank.
    fn search(
        &self,
        mode: ViewMode,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Value>, CoreError>> + Send;

    fn create(&self, record: &Record) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update(
        &self,
        key: &str,
        record: &Record,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl RegistryService for ClientesClient {
    async fn load(&self, mode: ViewMode) -> Result<Vec<Value>, CoreError> {
        debug!(%mode, "loading records");
        let items = match mode {
            ViewMode::All => self.list_all().await?,
            ViewMode::WithValidation => self.list_validated().await?,
            ViewMode::ErrorsOnly => self.list_with_errors().await?,
        };
        Ok(items)
    }

    async fn search(&self, mode: ViewMode, term: &str) -> Result<Vec<Value>, CoreError> {
        debug!(%mode, term, "searching records");
        let items = if mode.is_validated() {
            self.search_validated(term).await?
        } else {
            ClientesClient::search(self, term).await?
        };
        Ok(items)
    }

    async fn create(&self, record: &Record) -> Result<(), CoreError> {
        ClientesClient::create(self, &Cliente::from(record)).await?;
        Ok(())
    }

    async fn update(&self, key: &str, record: &Record) -> Result<(), CoreError> {
        ClientesClient::update(self, key, &Cliente::from(record)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        ClientesClient::delete(self, key).await?;
        Ok(())
    }
}

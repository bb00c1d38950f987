//! Sync driver abstraction.
//!
//! Drivers move JSON bodies to and from a collection route. Typing and
//! primary-key selection happen one level up, in [`SyncChannel`](crate::SyncChannel).

use crate::error::SyncResult;
use async_trait::async_trait;
use flightdeck_model::DriverKind;
use serde_json::Value;

#[async_trait]
pub trait SyncDriver: Send + Sync {
    /// Which [`DriverKind`] this driver serves.
    fn kind(&self) -> DriverKind;

    /// Reads one record at `{route}/{id}`.
    async fn fetch(&self, route: &str, id: i64) -> SyncResult<Value>;

    /// Reads the collection at `route`, narrowed by query pairs.
    async fn list(&self, route: &str, query: &[(String, String)]) -> SyncResult<Vec<Value>>;

    /// Creates a record and returns the stored representation.
    async fn create(&self, route: &str, body: &Value) -> SyncResult<Value>;

    /// Replaces the record at `{route}/{id}` and returns the stored representation.
    async fn update(&self, route: &str, id: i64, body: &Value) -> SyncResult<Value>;

    /// Deletes the record at `{route}/{id}`. Deleting a missing record succeeds.
    async fn destroy(&self, route: &str, id: i64) -> SyncResult<()>;
}

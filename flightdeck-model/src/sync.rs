use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Name of the channel every syncable record is expected to declare.
pub const DEFAULT_CHANNEL: &str = "default";

/// Transport used to persist a record type on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// JSON over HTTP against a REST collection route.
    Server,
}

/// Binds a named channel to a driver and a collection route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncRoute {
    pub channel: &'static str,
    pub driver: DriverKind,
    /// Collection path, e.g. `/api/0/packages`. Members live at `{route}/{id}`.
    pub route: &'static str,
}

/// Which record field identifies a record on the server.
///
/// Records may carry more than one integer identity; the sync layer picks
/// one per channel rather than the record hard-coding it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKey {
    #[default]
    Id,
    IdNumber,
}

impl PrimaryKey {
    /// Wire name of the key field.
    pub const fn field_name(self) -> &'static str {
        match self {
            PrimaryKey::Id => "id",
            PrimaryKey::IdNumber => "id_number",
        }
    }
}

/// A record type that can be created, fetched, updated and deleted through
/// a sync driver.
pub trait Syncable: Serialize + DeserializeOwned + Send + Sync {
    /// Short record type name used in logs and errors.
    const RECORD_TYPE: &'static str;

    /// Every channel this record type declares.
    fn sync_routes() -> &'static [SyncRoute];

    /// The route for a named channel, if declared.
    fn sync_route(channel: &str) -> Option<&'static SyncRoute> {
        Self::sync_routes().iter().find(|r| r.channel == channel)
    }

    /// Server identity under the given key, `None` while unsaved.
    fn primary_key(&self, key: PrimaryKey) -> Option<i64>;
}

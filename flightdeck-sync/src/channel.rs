use crate::driver::SyncDriver;
use crate::error::{SyncError, SyncResult};
use flightdeck_model::{DEFAULT_CHANNEL, PrimaryKey, SyncRoute, Syncable};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// Typed access to one of a record type's declared channels.
///
/// Records without a primary key are created on [`save`](Self::save);
/// records with one are updated in place. Either way the record is replaced
/// by what the server stored.
pub struct SyncChannel<T: Syncable> {
    driver: Arc<dyn SyncDriver>,
    route: &'static SyncRoute,
    primary_key: PrimaryKey,
    _record: PhantomData<fn() -> T>,
}

impl<T: Syncable> SyncChannel<T> {
    /// Binds `driver` to the channel named `channel` on `T`.
    pub fn new(driver: Arc<dyn SyncDriver>, channel: &str) -> SyncResult<Self> {
        let route = T::sync_route(channel).ok_or_else(|| SyncError::UnknownChannel {
            record_type: T::RECORD_TYPE,
            channel: channel.to_string(),
        })?;

        if route.driver != driver.kind() {
            return Err(SyncError::Config(format!(
                "{} channel `{}` expects a {:?} driver, got {:?}",
                T::RECORD_TYPE,
                channel,
                route.driver,
                driver.kind()
            )));
        }

        Ok(Self {
            driver,
            route,
            primary_key: PrimaryKey::default(),
            _record: PhantomData,
        })
    }

    pub fn default_channel(driver: Arc<dyn SyncDriver>) -> SyncResult<Self> {
        Self::new(driver, DEFAULT_CHANNEL)
    }

    /// Selects which record field addresses members of the collection.
    pub fn with_primary_key(mut self, key: PrimaryKey) -> Self {
        self.primary_key = key;
        self
    }

    pub fn primary_key(&self) -> PrimaryKey {
        self.primary_key
    }

    pub fn route(&self) -> &'static str {
        self.route.route
    }

    pub async fn fetch(&self, id: i64) -> SyncResult<T> {
        let value = self.driver.fetch(self.route.route, id).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list(&self, query: &[(String, String)]) -> SyncResult<Vec<T>> {
        let values = self.driver.list(self.route.route, query).await?;
        debug!("Listed {} {} records", values.len(), T::RECORD_TYPE);

        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(SyncError::from))
            .collect()
    }

    pub async fn save(&self, record: &mut T) -> SyncResult<()> {
        match record.primary_key(self.primary_key) {
            Some(id) => self.update(id, record).await,
            None => {
                let body = serde_json::to_value(&*record)?;
                let stored = self.driver.create(self.route.route, &body).await?;
                *record = serde_json::from_value(stored)?;
                info!(
                    "Created {} {:?}",
                    T::RECORD_TYPE,
                    record.primary_key(self.primary_key)
                );
                Ok(())
            }
        }
    }

    /// Writes `record` to the member at `id`, whatever keys the record itself carries.
    pub async fn update(&self, id: i64, record: &mut T) -> SyncResult<()> {
        let body = serde_json::to_value(&*record)?;
        let stored = self.driver.update(self.route.route, id, &body).await?;
        *record = serde_json::from_value(stored)?;
        info!("Updated {} {}", T::RECORD_TYPE, id);
        Ok(())
    }

    pub async fn destroy(&self, record: &T) -> SyncResult<()> {
        let id = record
            .primary_key(self.primary_key)
            .ok_or(SyncError::MissingPrimaryKey {
                record_type: T::RECORD_TYPE,
            })?;
        self.driver.destroy(self.route.route, id).await
    }
}

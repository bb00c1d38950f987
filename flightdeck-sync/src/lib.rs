//! Sync layer for Flightdeck records.
//!
//! A record type declares its channels through
//! [`Syncable`](flightdeck_model::Syncable); this crate supplies the
//! transports and the typed operations on top of them.
//!
//! ## Components
//!
//! - **Driver**: [`SyncDriver`], a JSON-in/JSON-out transport for one collection route
//! - **Server**: [`ServerSync`], the REST driver (one HTTP request per operation)
//! - **Channel**: [`SyncChannel`], typed create/fetch/update/delete/list for a record type
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use flightdeck_model::{Package, PackageKind};
//! use flightdeck_sync::{ServerSync, ServerSyncConfig, SyncChannel};
//!
//! # async fn run() -> flightdeck_sync::SyncResult<()> {
//! let driver = ServerSync::new(ServerSyncConfig::default())?;
//! let packages = SyncChannel::<Package>::default_channel(Arc::new(driver))?;
//!
//! let mut addon = Package::new(PackageKind::Addon, "My Addon");
//! packages.save(&mut addon).await?;
//! # Ok(())
//! # }
//! ```

mod channel;
mod driver;
mod error;
mod packages;
mod server;

pub use channel::SyncChannel;
pub use driver::SyncDriver;
pub use error::{SyncError, SyncResult};
pub use packages::PackageFilter;
pub use server::{ServerSync, ServerSyncConfig};

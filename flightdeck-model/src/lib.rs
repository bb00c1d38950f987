//! Package record model for Flightdeck.
//!
//! Defines the types the sync layer and the CLI agree on:
//! - [`Package`] — metadata for an installable add-on or library
//! - [`RecordSchema`] — the static field set of a record type (names and value kinds)
//! - [`Syncable`] — capability trait binding a record type to its REST routes
//!
//! The field names declared in [`Package::SCHEMA`] are the wire contract for
//! the `/api/0/packages` collection.

mod error;
mod package;
mod schema;
mod sync;

pub use error::{ModelError, ModelResult};
pub use package::{Package, PackageKind};
pub use schema::{FieldDef, FieldType, FieldValue, RecordSchema};
pub use sync::{DEFAULT_CHANNEL, DriverKind, PrimaryKey, SyncRoute, Syncable};

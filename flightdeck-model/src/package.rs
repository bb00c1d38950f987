use crate::{
    DEFAULT_CHANNEL, DriverKind, FieldDef, FieldValue, ModelError, ModelResult, PrimaryKey,
    RecordSchema, SyncRoute, Syncable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PACKAGE_FIELDS: &[FieldDef] = &[
    FieldDef::number("id"),
    FieldDef::number("id_number"),
    FieldDef::text("full_name"),
    FieldDef::text("name"),
    FieldDef::text("description"),
    FieldDef::text("type"),
    FieldDef::text("author"),
    FieldDef::text("url"),
    FieldDef::text("license"),
    FieldDef::text("version_name"),
    FieldDef::number("revision_number"),
    FieldDef::number("latest"),
];

const PACKAGE_ROUTES: &[SyncRoute] = &[SyncRoute {
    channel: DEFAULT_CHANNEL,
    driver: DriverKind::Server,
    route: Package::ROUTE,
}];

/// Metadata for an installable add-on or library.
///
/// Every field is optional: a record may be built from user input or a
/// sparse payload before the server has assigned identities. Unset fields
/// are omitted when serialized.
///
/// Module, attachment and dependency relations are owned by the server and
/// are not carried on this record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Package type code: [`Package::TYPE_ADDON`] or [`Package::TYPE_LIBRARY`].
    /// Any other text is stored as-is.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_number: Option<i64>,
    /// Id of the most recent PackageRevision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<i64>,
}

impl Package {
    pub const TYPE_ADDON: &'static str = "a";
    pub const TYPE_LIBRARY: &'static str = "l";

    /// REST collection route for packages.
    pub const ROUTE: &'static str = "/api/0/packages";

    pub const SCHEMA: RecordSchema = RecordSchema {
        record_type: "package",
        fields: PACKAGE_FIELDS,
    };

    /// A new, unsaved package of the given kind.
    pub fn new(kind: PackageKind, full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            package_type: Some(kind.code().to_string()),
            ..Default::default()
        }
    }

    pub fn is_addon(&self) -> bool {
        self.package_type.as_deref() == Some(Self::TYPE_ADDON)
    }

    pub fn is_library(&self) -> bool {
        self.package_type.as_deref() == Some(Self::TYPE_LIBRARY)
    }

    /// The typed kind, or `None` when `type` is unset or not a known code.
    pub fn kind(&self) -> Option<PackageKind> {
        self.package_type.as_deref().and_then(PackageKind::from_code)
    }

    /// Singular display name of the type ("addon" / "library").
    pub fn type_name(&self) -> Option<&'static str> {
        self.kind().map(PackageKind::singular_name)
    }

    /// Plural display name of the type ("addons" / "libraries").
    pub fn type_plural_name(&self) -> Option<&'static str> {
        self.kind().map(PackageKind::plural_name)
    }

    /// Reads a field by its wire name.
    pub fn get(&self, field: &str) -> ModelResult<Option<FieldValue>> {
        if let Some(slot) = self.number_slot(field) {
            return Ok(slot.map(FieldValue::Number));
        }
        if let Some(slot) = self.text_slot(field) {
            return Ok(slot.clone().map(FieldValue::Text));
        }
        Err(ModelError::UnknownField(field.to_string()))
    }

    /// Writes a field by its wire name. `None` clears the field.
    pub fn set(&mut self, field: &str, value: Option<FieldValue>) -> ModelResult<()> {
        let def = Self::SCHEMA
            .field(field)
            .ok_or_else(|| ModelError::UnknownField(field.to_string()))?;

        let mismatch = || ModelError::FieldType {
            field: field.to_string(),
            expected: def.field_type,
        };

        match value {
            None => {
                if let Some(slot) = self.number_slot_mut(field) {
                    *slot = None;
                } else if let Some(slot) = self.text_slot_mut(field) {
                    *slot = None;
                }
            }
            Some(FieldValue::Number(n)) => {
                *self.number_slot_mut(field).ok_or_else(mismatch)? = Some(n);
            }
            Some(FieldValue::Text(s)) => {
                *self.text_slot_mut(field).ok_or_else(mismatch)? = Some(s);
            }
        }
        Ok(())
    }

    /// Parses a package from a JSON value, ignoring keys outside the schema.
    pub fn from_json(value: serde_json::Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes the set fields to a JSON object.
    pub fn to_json(&self) -> ModelResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn number_slot(&self, field: &str) -> Option<&Option<i64>> {
        match field {
            "id" => Some(&self.id),
            "id_number" => Some(&self.id_number),
            "revision_number" => Some(&self.revision_number),
            "latest" => Some(&self.latest),
            _ => None,
        }
    }

    fn number_slot_mut(&mut self, field: &str) -> Option<&mut Option<i64>> {
        match field {
            "id" => Some(&mut self.id),
            "id_number" => Some(&mut self.id_number),
            "revision_number" => Some(&mut self.revision_number),
            "latest" => Some(&mut self.latest),
            _ => None,
        }
    }

    fn text_slot(&self, field: &str) -> Option<&Option<String>> {
        match field {
            "full_name" => Some(&self.full_name),
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "type" => Some(&self.package_type),
            "author" => Some(&self.author),
            "url" => Some(&self.url),
            "license" => Some(&self.license),
            "version_name" => Some(&self.version_name),
            _ => None,
        }
    }

    fn text_slot_mut(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "full_name" => Some(&mut self.full_name),
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "type" => Some(&mut self.package_type),
            "author" => Some(&mut self.author),
            "url" => Some(&mut self.url),
            "license" => Some(&mut self.license),
            "version_name" => Some(&mut self.version_name),
            _ => None,
        }
    }
}

/// Renders the package's `full_name`, or nothing when it is unset.
impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name.as_deref().unwrap_or_default())
    }
}

impl Syncable for Package {
    const RECORD_TYPE: &'static str = "package";

    fn sync_routes() -> &'static [SyncRoute] {
        PACKAGE_ROUTES
    }

    fn primary_key(&self, key: PrimaryKey) -> Option<i64> {
        match key {
            PrimaryKey::Id => self.id,
            PrimaryKey::IdNumber => self.id_number,
        }
    }
}

/// The two known package types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    #[serde(rename = "a")]
    Addon,
    #[serde(rename = "l")]
    Library,
}

impl PackageKind {
    /// The stored type code.
    pub const fn code(self) -> &'static str {
        match self {
            PackageKind::Addon => Package::TYPE_ADDON,
            PackageKind::Library => Package::TYPE_LIBRARY,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            Package::TYPE_ADDON => Some(PackageKind::Addon),
            Package::TYPE_LIBRARY => Some(PackageKind::Library),
            _ => None,
        }
    }

    pub const fn singular_name(self) -> &'static str {
        match self {
            PackageKind::Addon => "addon",
            PackageKind::Library => "library",
        }
    }

    pub const fn plural_name(self) -> &'static str {
        match self {
            PackageKind::Addon => "addons",
            PackageKind::Library => "libraries",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular_name())
    }
}

/// Accepts either the type code (`a`, `l`) or the singular name.
impl FromStr for PackageKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "addon" => Ok(PackageKind::Addon),
            "l" | "library" => Ok(PackageKind::Library),
            other => Err(ModelError::UnknownPackageKind(other.to_string())),
        }
    }
}

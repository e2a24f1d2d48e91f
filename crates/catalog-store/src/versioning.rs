use chrono::{DateTime, Utc};
use model::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use serde::{Deserialize, Serialize};

/// Capability tag for entities whose mutations are snapshotted on commit.
/// Whether an entity is versioned is decided by this trait check, never by
/// the entity's concrete type name.
pub trait Versionable {
    fn resource_kind(&self) -> &'static str;

    fn resource_id(&self) -> String;

    /// The state to snapshot. Self-contained; the snapshot stays readable
    /// after the entity changes or disappears.
    fn versioned_data(&self) -> serde_json::Value;
}

/// One immutable snapshot of a versionable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub resource_kind: String,
    pub resource_id: String,
    pub version: u64,
    pub change: String,
    pub data: serde_json::Value,
    pub logged_at: DateTime<Utc>,
}

fn snapshot<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

impl Versionable for Product {
    fn resource_kind(&self) -> &'static str {
        "product"
    }

    fn resource_id(&self) -> String {
        self.identifier.to_string()
    }

    fn versioned_data(&self) -> serde_json::Value {
        snapshot(self)
    }
}

impl Versionable for Family {
    fn resource_kind(&self) -> &'static str {
        "family"
    }

    fn resource_id(&self) -> String {
        self.code.to_string()
    }

    fn versioned_data(&self) -> serde_json::Value {
        snapshot(self)
    }
}

impl Versionable for Attribute {
    fn resource_kind(&self) -> &'static str {
        "attribute"
    }

    fn resource_id(&self) -> String {
        self.code.to_string()
    }

    fn versioned_data(&self) -> serde_json::Value {
        snapshot(self)
    }
}

impl Versionable for Channel {
    fn resource_kind(&self) -> &'static str {
        "channel"
    }

    fn resource_id(&self) -> String {
        self.code.to_string()
    }

    fn versioned_data(&self) -> serde_json::Value {
        snapshot(self)
    }
}

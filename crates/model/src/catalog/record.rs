use crate::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use serde::{Deserialize, Serialize};

/// A record yielded by an upstream item reader. Consumers that only accept
/// one kind treat any other kind as a contract violation by the reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogRecord {
    Family(Family),
    Attribute(Attribute),
    Channel(Channel),
    Product(Product),
}

impl CatalogRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogRecord::Family(_) => "family",
            CatalogRecord::Attribute(_) => "attribute",
            CatalogRecord::Channel(_) => "channel",
            CatalogRecord::Product(_) => "product",
        }
    }
}

use catalog_store::sled_store::SledCatalogStore;
use catalog_store::transaction::CatalogEntity;
use model::catalog::attribute::Attribute;
use model::catalog::channel::Channel;
use model::catalog::family::Family;
use model::catalog::product::{Product, ProductValue};
use model::core::identifiers::FamilyCode;
use serde::Deserialize;

use crate::error::CliError;

/// A catalog fixture file: everything needed to seed a store in one JSON
/// document. Products carry no storage key; re-importing an identifier
/// updates the existing product instead of duplicating it.
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    pub identifier: String,
    #[serde(default)]
    pub family: Option<FamilyCode>,
    #[serde(default)]
    pub values: Vec<ProductValue>,
}

impl CatalogFixture {
    pub fn parse(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stages the whole fixture into one transaction and commits it.
    /// Returns the number of committed changes.
    pub fn import_into(self, store: &SledCatalogStore) -> Result<usize, CliError> {
        let mut tx = store.transaction();

        for attribute in self.attributes {
            tx.stage_insert(CatalogEntity::Attribute(attribute));
        }
        for channel in self.channels {
            tx.stage_insert(CatalogEntity::Channel(channel));
        }
        for family in self.families {
            tx.stage_insert(CatalogEntity::Family(family));
        }
        for fixture in self.products {
            match store.product_by_identifier(&fixture.identifier.as_str().into())? {
                Some(mut existing) => {
                    existing.family = fixture.family;
                    for value in fixture.values {
                        existing.set_value(value);
                    }
                    existing.updated_at = chrono::Utc::now();
                    tx.stage_update(CatalogEntity::Product(existing));
                }
                None => {
                    let mut product = Product::new(fixture.identifier, fixture.family);
                    for value in fixture.values {
                        product.set_value(value);
                    }
                    tx.stage_insert(CatalogEntity::Product(product));
                }
            }
        }

        if tx.is_empty() {
            return Ok(0);
        }
        Ok(tx.commit()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "attributes": [
            {"code": "name", "localizable": true},
            {"code": "weight"}
        ],
        "channels": [{"code": "ecommerce", "locales": ["en_US", "fr_FR"]}],
        "families": [{
            "code": "shoes",
            "attributes": ["name", "weight"],
            "requirements": [{"channel": "ecommerce", "attributes": ["name"]}]
        }],
        "products": [{
            "identifier": "sku-1",
            "family": "shoes",
            "values": [{
                "attribute": "name",
                "locale": "en_US",
                "data": {"type": "text", "data": "Sneaker"}
            }]
        }]
    }"#;

    #[test]
    fn parses_a_full_fixture() {
        let fixture = CatalogFixture::parse(FIXTURE).unwrap();

        assert_eq!(fixture.attributes.len(), 2);
        assert!(fixture.attributes[0].localizable);
        assert!(!fixture.attributes[1].localizable);
        assert_eq!(fixture.channels[0].locales.len(), 2);
        assert_eq!(fixture.families[0].requirements.len(), 1);
        assert_eq!(fixture.products[0].values.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let fixture = CatalogFixture::parse(r#"{"products": []}"#).unwrap();
        assert!(fixture.attributes.is_empty());
        assert!(fixture.families.is_empty());
    }

    #[test]
    fn reimport_updates_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledCatalogStore::open(dir.path()).unwrap();

        CatalogFixture::parse(FIXTURE)
            .unwrap()
            .import_into(&store)
            .unwrap();
        let first = store
            .product_by_identifier(&"sku-1".into())
            .unwrap()
            .unwrap();

        CatalogFixture::parse(FIXTURE)
            .unwrap()
            .import_into(&store)
            .unwrap();
        let second = store
            .product_by_identifier(&"sku-1".into())
            .unwrap()
            .unwrap();

        assert_eq!(first.key, second.key);
        assert_eq!(second.values.len(), 1);
        // Both imports snapshot the product.
        let versions = store.versions_for("product", "sku-1").unwrap();
        assert_eq!(versions.len(), 2);
    }
}

use crate::query::execute_query;
use async_trait::async_trait;
use engine_core::error::{QueryError, SinkError, StoreError};
use engine_core::query::cursor::{IdentifierCursor, VecIdentifierCursor};
use engine_core::query::{ProductQuery, ProductQuerySource};
use engine_core::store::{CatalogRead, ResolveProductKeys, SaveCompleteness};
use model::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use model::completeness::result::CompletenessResult;
use model::core::identifiers::{
    AttributeCode, ChannelCode, FamilyCode, LocaleCode, ProductIdentifier, ProductKey,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    products: HashMap<ProductKey, Product>,
    by_identifier: HashMap<ProductIdentifier, ProductKey>,
    families: HashMap<FamilyCode, Family>,
    attributes: HashMap<AttributeCode, Attribute>,
    channels: Vec<Channel>,
    completeness: HashMap<(ProductKey, ChannelCode, LocaleCode), CompletenessResult>,
}

/// In-memory catalog with the same trait surface as the sled store.
/// No versioning, no durability; test and wiring double only.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Inner>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_product(&self, product: Product) {
        let mut inner = self.inner.write().await;
        inner
            .by_identifier
            .insert(product.identifier.clone(), product.key);
        inner.products.insert(product.key, product);
    }

    pub async fn insert_family(&self, family: Family) {
        self.inner
            .write()
            .await
            .families
            .insert(family.code.clone(), family);
    }

    pub async fn insert_attribute(&self, attribute: Attribute) {
        self.inner
            .write()
            .await
            .attributes
            .insert(attribute.code.clone(), attribute);
    }

    pub async fn insert_channel(&self, channel: Channel) {
        self.inner.write().await.channels.push(channel);
    }

    pub async fn completeness_for_product(&self, key: &ProductKey) -> Vec<CompletenessResult> {
        self.inner
            .read()
            .await
            .completeness
            .values()
            .filter(|r| &r.product == key)
            .cloned()
            .collect()
    }

    pub async fn completeness_count(&self) -> usize {
        self.inner.read().await.completeness.len()
    }
}

#[async_trait]
impl CatalogRead for InMemoryCatalogStore {
    async fn products_by_keys(&self, keys: &[ProductKey]) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| inner.products.get(key).cloned())
            .collect())
    }

    async fn family(&self, code: &FamilyCode) -> Result<Option<Family>, StoreError> {
        Ok(self.inner.read().await.families.get(code).cloned())
    }

    async fn channels(&self) -> Result<Vec<Channel>, StoreError> {
        Ok(self.inner.read().await.channels.clone())
    }

    async fn attributes(&self) -> Result<HashMap<AttributeCode, Attribute>, StoreError> {
        Ok(self.inner.read().await.attributes.clone())
    }
}

#[async_trait]
impl ResolveProductKeys for InMemoryCatalogStore {
    async fn from_identifiers(
        &self,
        identifiers: &[ProductIdentifier],
    ) -> Result<HashMap<ProductIdentifier, ProductKey>, StoreError> {
        let inner = self.inner.read().await;
        Ok(identifiers
            .iter()
            .filter_map(|id| inner.by_identifier.get(id).map(|key| (id.clone(), *key)))
            .collect())
    }
}

#[async_trait]
impl SaveCompleteness for InMemoryCatalogStore {
    async fn save_all(&self, results: Vec<CompletenessResult>) -> Result<(), SinkError> {
        let mut inner = self.inner.write().await;
        for result in results {
            inner.completeness.insert(
                (result.product, result.channel.clone(), result.locale.clone()),
                result,
            );
        }
        Ok(())
    }
}

#[async_trait]
impl ProductQuerySource for InMemoryCatalogStore {
    async fn execute(
        &self,
        query: &ProductQuery,
    ) -> Result<Box<dyn IdentifierCursor>, QueryError> {
        let products: Vec<Product> = {
            let inner = self.inner.read().await;
            inner.products.values().cloned().collect()
        };
        let results = execute_query(products, query)?;
        Ok(Box::new(VecIdentifierCursor::new(results)))
    }
}

use crate::error::{SinkError, StoreError};
use async_trait::async_trait;
use model::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use model::completeness::result::CompletenessResult;
use model::core::identifiers::{AttributeCode, FamilyCode, ProductIdentifier, ProductKey};
use std::collections::HashMap;

/// Read access to catalog data needed by the completeness calculator.
#[async_trait]
pub trait CatalogRead: Send + Sync {
    async fn products_by_keys(&self, keys: &[ProductKey]) -> Result<Vec<Product>, StoreError>;

    async fn family(&self, code: &FamilyCode) -> Result<Option<Family>, StoreError>;

    async fn channels(&self) -> Result<Vec<Channel>, StoreError>;

    async fn attributes(&self) -> Result<HashMap<AttributeCode, Attribute>, StoreError>;
}

/// Bulk resolution of external product identifiers to internal keys.
/// Identifiers that no longer exist are absent from the returned map.
#[async_trait]
pub trait ResolveProductKeys: Send + Sync {
    async fn from_identifiers(
        &self,
        identifiers: &[ProductIdentifier],
    ) -> Result<HashMap<ProductIdentifier, ProductKey>, StoreError>;
}

/// Computes completeness for a set of products. Must not mutate shared
/// state; the result is a pure function of current catalog data.
#[async_trait]
pub trait CalculateCompleteness: Send + Sync {
    async fn from_product_keys(
        &self,
        keys: &[ProductKey],
    ) -> Result<Vec<CompletenessResult>, StoreError>;
}

/// Durable sink for completeness results. A call either persists all given
/// results or fails; the pipeline treats any failure as fatal for the run.
#[async_trait]
pub trait SaveCompleteness: Send + Sync {
    async fn save_all(&self, results: Vec<CompletenessResult>) -> Result<(), SinkError>;
}

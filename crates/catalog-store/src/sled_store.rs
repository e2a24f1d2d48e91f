use crate::query::execute_query;
use crate::transaction::{CatalogEntity, CatalogTransaction, PreCommitHook, StagedChange};
use crate::transaction::VersionOnCommit;
use crate::versioning::Version;
use async_trait::async_trait;
use engine_core::error::{QueryError, SinkError, StoreError};
use engine_core::query::cursor::{IdentifierCursor, VecIdentifierCursor};
use engine_core::query::{ProductQuery, ProductQuerySource};
use engine_core::store::{CatalogRead, ResolveProductKeys, SaveCompleteness};
use model::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use model::completeness::result::CompletenessResult;
use model::core::identifiers::{
    AttributeCode, FamilyCode, ProductIdentifier, ProductKey,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Sled-backed catalog store. A single keyspace with prefixes:
///
/// - `prd:{key}` product record
/// - `idx:ident:{identifier}` identifier -> product key index
/// - `fam:{code}`, `att:{code}`, `cha:{code}` structure records
/// - `cmp:{key}:{channel}:{locale}` completeness result
/// - `ver:{kind}:{id}:{seq}` version snapshot, `seq` zero-padded
/// - `vsq:{kind}:{id}` last version sequence
pub struct SledCatalogStore {
    db: sled::Db,
    hooks: Vec<Arc<dyn PreCommitHook>>,
}

fn backend(err: impl ToString) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn decode(err: impl ToString) -> StoreError {
    StoreError::Decode(err.to_string())
}

impl SledCatalogStore {
    /// Opens the store with the default hook list (version snapshots on).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self {
            db,
            hooks: vec![Arc::new(VersionOnCommit)],
        })
    }

    pub fn with_hooks(mut self, hooks: Vec<Arc<dyn PreCommitHook>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn transaction(&self) -> CatalogTransaction<'_> {
        CatalogTransaction::new(self, self.hooks.clone())
    }

    #[inline]
    fn product_key(key: &ProductKey) -> String {
        format!("prd:{key}")
    }

    #[inline]
    fn ident_key(identifier: &ProductIdentifier) -> String {
        format!("idx:ident:{identifier}")
    }

    #[inline]
    fn completeness_key(result: &CompletenessResult) -> String {
        format!(
            "cmp:{}:{}:{}",
            result.product, result.channel, result.locale
        )
    }

    #[inline]
    fn version_key(kind: &str, id: &str, seq: u64) -> String {
        format!("ver:{kind}:{id}:{seq:010}")
    }

    #[inline]
    fn version_seq_key(kind: &str, id: &str) -> String {
        format!("vsq:{kind}:{id}")
    }

    fn get_decoded<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.db.get(key).map_err(backend)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(decode)?)),
            None => Ok(None),
        }
    }

    /// Applies a committed transaction's write set in one atomic batch.
    pub(crate) fn apply(
        &self,
        changes: Vec<StagedChange>,
        effects: crate::transaction::StagedEffects,
    ) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();

        for change in changes {
            match change.entity {
                CatalogEntity::Product(product) => {
                    let bytes = bincode::serialize(&product).map_err(decode)?;
                    batch.insert(Self::product_key(&product.key).as_str(), bytes);
                    let key_bytes = bincode::serialize(&product.key).map_err(decode)?;
                    batch.insert(Self::ident_key(&product.identifier).as_str(), key_bytes);
                }
                CatalogEntity::Family(family) => {
                    let bytes = bincode::serialize(&family).map_err(decode)?;
                    batch.insert(format!("fam:{}", family.code).as_str(), bytes);
                }
                CatalogEntity::Attribute(attribute) => {
                    let bytes = bincode::serialize(&attribute).map_err(decode)?;
                    batch.insert(format!("att:{}", attribute.code).as_str(), bytes);
                }
                CatalogEntity::Channel(channel) => {
                    let bytes = bincode::serialize(&channel).map_err(decode)?;
                    batch.insert(format!("cha:{}", channel.code).as_str(), bytes);
                }
            }
        }

        // Assign version sequence numbers on top of what is already stored,
        // accounting for several snapshots of one resource per commit.
        let mut next_seq: HashMap<(String, String), u64> = HashMap::new();
        for mut version in effects.versions {
            let slot = (version.resource_kind.clone(), version.resource_id.clone());
            let seq = match next_seq.get(&slot) {
                Some(last) => last + 1,
                None => self.last_version_seq(&slot.0, &slot.1)? + 1,
            };
            next_seq.insert(slot, seq);

            version.version = seq;
            let bytes = serde_json::to_vec(&version).map_err(decode)?;
            batch.insert(
                Self::version_key(&version.resource_kind, &version.resource_id, seq).as_str(),
                bytes,
            );
        }
        for ((kind, id), seq) in next_seq {
            let bytes = bincode::serialize(&seq).map_err(decode)?;
            batch.insert(Self::version_seq_key(&kind, &id).as_str(), bytes);
        }

        self.db.apply_batch(batch).map_err(backend)
    }

    fn last_version_seq(&self, kind: &str, id: &str) -> Result<u64, StoreError> {
        Ok(self
            .get_decoded::<u64>(&Self::version_seq_key(kind, id))?
            .unwrap_or(0))
    }

    pub fn product_by_key(&self, key: &ProductKey) -> Result<Option<Product>, StoreError> {
        self.get_decoded(&Self::product_key(key))
    }

    pub fn product_by_identifier(
        &self,
        identifier: &ProductIdentifier,
    ) -> Result<Option<Product>, StoreError> {
        match self.get_decoded::<ProductKey>(&Self::ident_key(identifier))? {
            Some(key) => self.product_by_key(&key),
            None => Ok(None),
        }
    }

    pub fn family_by_code(&self, code: &FamilyCode) -> Result<Option<Family>, StoreError> {
        self.get_decoded(&format!("fam:{code}"))
    }

    pub fn completeness_for_product(
        &self,
        key: &ProductKey,
    ) -> Result<Vec<CompletenessResult>, StoreError> {
        let mut results = Vec::new();
        for item in self.db.scan_prefix(format!("cmp:{key}:")) {
            let (_k, bytes) = item.map_err(backend)?;
            results.push(bincode::deserialize(&bytes).map_err(decode)?);
        }
        Ok(results)
    }

    pub fn versions_for(&self, kind: &str, id: &str) -> Result<Vec<Version>, StoreError> {
        let mut versions = Vec::new();
        for item in self.db.scan_prefix(format!("ver:{kind}:{id}:")) {
            let (_k, bytes) = item.map_err(backend)?;
            versions.push(serde_json::from_slice(&bytes).map_err(decode)?);
        }
        Ok(versions)
    }

    pub(crate) fn scan_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = Vec::new();
        for item in self.db.scan_prefix("prd:") {
            let (_k, bytes) = item.map_err(backend)?;
            products.push(bincode::deserialize(&bytes).map_err(decode)?);
        }
        Ok(products)
    }
}

#[async_trait]
impl CatalogRead for SledCatalogStore {
    async fn products_by_keys(&self, keys: &[ProductKey]) -> Result<Vec<Product>, StoreError> {
        let mut products = Vec::with_capacity(keys.len());
        for key in keys {
            match self.product_by_key(key)? {
                Some(product) => products.push(product),
                None => warn!(product_key = %key, "Product disappeared between resolution and load"),
            }
        }
        Ok(products)
    }

    async fn family(&self, code: &FamilyCode) -> Result<Option<Family>, StoreError> {
        self.family_by_code(code)
    }

    async fn channels(&self) -> Result<Vec<Channel>, StoreError> {
        let mut channels = Vec::new();
        for item in self.db.scan_prefix("cha:") {
            let (_k, bytes) = item.map_err(backend)?;
            channels.push(bincode::deserialize(&bytes).map_err(decode)?);
        }
        Ok(channels)
    }

    async fn attributes(&self) -> Result<HashMap<AttributeCode, Attribute>, StoreError> {
        let mut attributes = HashMap::new();
        for item in self.db.scan_prefix("att:") {
            let (_k, bytes) = item.map_err(backend)?;
            let attribute: Attribute = bincode::deserialize(&bytes).map_err(decode)?;
            attributes.insert(attribute.code.clone(), attribute);
        }
        Ok(attributes)
    }
}

#[async_trait]
impl ResolveProductKeys for SledCatalogStore {
    async fn from_identifiers(
        &self,
        identifiers: &[ProductIdentifier],
    ) -> Result<HashMap<ProductIdentifier, ProductKey>, StoreError> {
        let mut keys = HashMap::with_capacity(identifiers.len());
        for identifier in identifiers {
            if let Some(key) = self.get_decoded::<ProductKey>(&Self::ident_key(identifier))? {
                keys.insert(identifier.clone(), key);
            }
        }
        Ok(keys)
    }
}

#[async_trait]
impl SaveCompleteness for SledCatalogStore {
    async fn save_all(&self, results: Vec<CompletenessResult>) -> Result<(), SinkError> {
        let mut batch = sled::Batch::default();
        for result in &results {
            let bytes = bincode::serialize(result).map_err(|e| SinkError::Save(e.to_string()))?;
            batch.insert(Self::completeness_key(result).as_str(), bytes);
        }
        self.db
            .apply_batch(batch)
            .map_err(|e| SinkError::Save(e.to_string()))
    }
}

#[async_trait]
impl ProductQuerySource for SledCatalogStore {
    async fn execute(
        &self,
        query: &ProductQuery,
    ) -> Result<Box<dyn IdentifierCursor>, QueryError> {
        let products = self
            .scan_products()
            .map_err(|e| QueryError::Execution(e.to_string()))?;
        let results = execute_query(products, query)?;
        Ok(Box::new(VecIdentifierCursor::new(results)))
    }
}

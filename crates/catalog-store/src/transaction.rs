use crate::sled_store::SledCatalogStore;
use crate::versioning::{Version, Versionable};
use chrono::Utc;
use engine_core::error::StoreError;
use model::catalog::{attribute::Attribute, channel::Channel, family::Family, product::Product};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
        }
    }
}

/// A catalog entity staged for writing.
#[derive(Debug, Clone)]
pub enum CatalogEntity {
    Product(Product),
    Family(Family),
    Attribute(Attribute),
    Channel(Channel),
}

impl CatalogEntity {
    /// The tagged-interface check: an entity is snapshotted on commit iff
    /// it exposes the [`Versionable`] capability.
    pub fn as_versionable(&self) -> Option<&dyn Versionable> {
        match self {
            CatalogEntity::Product(p) => Some(p),
            CatalogEntity::Family(f) => Some(f),
            CatalogEntity::Attribute(a) => Some(a),
            CatalogEntity::Channel(c) => Some(c),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StagedChange {
    pub kind: ChangeKind,
    pub entity: CatalogEntity,
}

/// Snapshots staged by hooks, written in the same commit as the changes
/// that caused them.
#[derive(Debug, Default)]
pub struct StagedEffects {
    pub versions: Vec<Version>,
}

/// Invoked for every staged change right before commit. Hooks run in
/// registration order and may stage additional records into the commit.
pub trait PreCommitHook: Send + Sync {
    fn before_commit(
        &self,
        change: &StagedChange,
        effects: &mut StagedEffects,
    ) -> Result<(), StoreError>;
}

/// Stages a version snapshot for every versionable staged entity.
pub struct VersionOnCommit;

impl PreCommitHook for VersionOnCommit {
    fn before_commit(
        &self,
        change: &StagedChange,
        effects: &mut StagedEffects,
    ) -> Result<(), StoreError> {
        let Some(versionable) = change.entity.as_versionable() else {
            return Ok(());
        };

        effects.versions.push(Version {
            resource_kind: versionable.resource_kind().to_string(),
            resource_id: versionable.resource_id(),
            // Sequence is assigned at commit time, once per resource.
            version: 0,
            change: change.kind.as_str().to_string(),
            data: versionable.versioned_data(),
            logged_at: Utc::now(),
        });
        Ok(())
    }
}

/// Staged-write wrapper over the catalog store. Changes accumulate in
/// memory; `commit` runs the pre-commit hooks over every change and then
/// applies everything, including hook effects, as one atomic batch.
pub struct CatalogTransaction<'a> {
    store: &'a SledCatalogStore,
    hooks: Vec<Arc<dyn PreCommitHook>>,
    changes: Vec<StagedChange>,
}

impl<'a> CatalogTransaction<'a> {
    pub(crate) fn new(store: &'a SledCatalogStore, hooks: Vec<Arc<dyn PreCommitHook>>) -> Self {
        Self {
            store,
            hooks,
            changes: Vec::new(),
        }
    }

    pub fn stage_insert(&mut self, entity: CatalogEntity) {
        self.changes.push(StagedChange {
            kind: ChangeKind::Insert,
            entity,
        });
    }

    pub fn stage_update(&mut self, entity: CatalogEntity) {
        self.changes.push(StagedChange {
            kind: ChangeKind::Update,
            entity,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Runs the hooks and applies the whole write set atomically.
    /// Returns the number of entity writes committed.
    pub fn commit(self) -> Result<usize, StoreError> {
        let mut effects = StagedEffects::default();
        for change in &self.changes {
            for hook in &self.hooks {
                hook.before_commit(change, &mut effects)?;
            }
        }

        let committed = self.changes.len();
        debug!(
            changes = committed,
            versions = effects.versions.len(),
            "Committing catalog transaction"
        );
        self.store.apply(self.changes, effects)?;
        Ok(committed)
    }
}

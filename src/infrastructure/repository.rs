//! Adjustment repositories: in-memory and TOML file
//!
//! Both keep aggregates in insertion order and replace an aggregate on save.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::application::{ApplicationResult, IoResultExt, TomlResultExt};
use crate::domain::{
    AddedUnit, AdjustmentAggregate, AdjustmentId, GroupingIdentity, ModifiedUnit,
    ProgramIdentity, RemovedUnit,
};
use crate::infrastructure::traits::{AdjustmentFilter, AdjustmentRepository, FileSystem};

/// Replace the aggregate with the same id, or append it.
fn upsert(aggregates: &mut Vec<AdjustmentAggregate>, aggregate: &AdjustmentAggregate) {
    match aggregates.iter_mut().find(|a| a.id() == aggregate.id()) {
        Some(existing) => *existing = aggregate.clone(),
        None => aggregates.push(aggregate.clone()),
    }
}

fn find_pair<'a>(
    aggregates: &'a [AdjustmentAggregate],
    program: &ProgramIdentity,
    grouping: &GroupingIdentity,
) -> Option<&'a AdjustmentAggregate> {
    aggregates
        .iter()
        .find(|a| a.program() == program && a.grouping() == grouping)
}

// ============================================================
// IN-MEMORY
// ============================================================

/// Process-local store, used by tests and as a scratch store.
#[derive(Debug, Default)]
pub struct InMemoryAdjustmentRepository {
    aggregates: Mutex<Vec<AdjustmentAggregate>>,
}

impl InMemoryAdjustmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `aggregates`.
    pub fn with_aggregates(aggregates: Vec<AdjustmentAggregate>) -> Self {
        Self {
            aggregates: Mutex::new(aggregates),
        }
    }

    /// Snapshot of every stored aggregate.
    pub fn all(&self) -> Vec<AdjustmentAggregate> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AdjustmentAggregate>> {
        self.aggregates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AdjustmentRepository for InMemoryAdjustmentRepository {
    fn get(&self, id: &AdjustmentId) -> ApplicationResult<Option<AdjustmentAggregate>> {
        Ok(self.lock().iter().find(|a| a.id() == *id).cloned())
    }

    fn find(
        &self,
        program: &ProgramIdentity,
        grouping: &GroupingIdentity,
    ) -> ApplicationResult<Option<AdjustmentAggregate>> {
        Ok(find_pair(&self.lock(), program, grouping).cloned())
    }

    fn search(&self, filter: &AdjustmentFilter) -> ApplicationResult<Vec<AdjustmentAggregate>> {
        Ok(self
            .lock()
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn save(&self, aggregate: &AdjustmentAggregate) -> ApplicationResult<()> {
        upsert(&mut self.lock(), aggregate);
        Ok(())
    }

    fn delete(&self, id: &AdjustmentId) -> ApplicationResult<()> {
        self.lock().retain(|a| a.id() != *id);
        Ok(())
    }

    fn delete_many(&self, ids: &[AdjustmentId]) -> ApplicationResult<()> {
        self.lock().retain(|a| !ids.contains(&a.id()));
        Ok(())
    }
}

// ============================================================
// TOML FILE
// ============================================================

/// Persisted form of one aggregate: the three adjustment lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAdjustment {
    id: AdjustmentId,
    program: ProgramIdentity,
    grouping: GroupingIdentity,
    #[serde(default)]
    added: Vec<AddedUnit>,
    #[serde(default)]
    removed: Vec<RemovedUnit>,
    #[serde(default)]
    modified: Vec<ModifiedUnit>,
}

impl From<&AdjustmentAggregate> for StoredAdjustment {
    fn from(aggregate: &AdjustmentAggregate) -> Self {
        Self {
            id: aggregate.id(),
            program: aggregate.program().clone(),
            grouping: aggregate.grouping().clone(),
            added: aggregate.added_units(),
            removed: aggregate.removed_units(),
            modified: aggregate.modified_units(),
        }
    }
}

impl From<StoredAdjustment> for AdjustmentAggregate {
    fn from(stored: StoredAdjustment) -> Self {
        AdjustmentAggregate::from_parts(
            stored.id,
            stored.program,
            stored.grouping,
            stored.added,
            stored.removed,
            stored.modified,
        )
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    adjustments: Vec<StoredAdjustment>,
}

/// Store kept in a single TOML document, rewritten on every change.
pub struct TomlAdjustmentRepository {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl TomlAdjustmentRepository {
    /// File name of the store inside the data directory.
    pub const FILE_NAME: &'static str = "adjustments.toml";

    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    /// Store located in `data_dir`.
    pub fn in_dir(fs: Arc<dyn FileSystem>, data_dir: &Path) -> Self {
        Self::new(fs, data_dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ApplicationResult<Vec<AdjustmentAggregate>> {
        if !self.fs.exists(&self.path) {
            trace!("no store at {}", self.path.display());
            return Ok(Vec::new());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read adjustment store", &self.path)?;
        let document: StoreDocument =
            toml::from_str(&content).with_toml_context("parse adjustment store", &self.path)?;
        Ok(document
            .adjustments
            .into_iter()
            .map(AdjustmentAggregate::from)
            .collect())
    }

    fn store(&self, aggregates: &[AdjustmentAggregate]) -> ApplicationResult<()> {
        let document = StoreDocument {
            adjustments: aggregates.iter().map(StoredAdjustment::from).collect(),
        };
        let content =
            toml::to_string(&document).with_toml_context("serialize adjustment store", &self.path)?;

        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create store directory", &self.path)?;
        let tmp = self.path.with_extension("toml.tmp");
        self.fs
            .write(&tmp, &content)
            .with_path_context("write adjustment store", &tmp)?;
        self.fs
            .rename(&tmp, &self.path)
            .with_path_context("replace adjustment store", &self.path)?;
        debug!("stored {} aggregate(s) in {}", aggregates.len(), self.path.display());
        Ok(())
    }
}

impl AdjustmentRepository for TomlAdjustmentRepository {
    fn get(&self, id: &AdjustmentId) -> ApplicationResult<Option<AdjustmentAggregate>> {
        Ok(self.load()?.into_iter().find(|a| a.id() == *id))
    }

    fn find(
        &self,
        program: &ProgramIdentity,
        grouping: &GroupingIdentity,
    ) -> ApplicationResult<Option<AdjustmentAggregate>> {
        Ok(find_pair(&self.load()?, program, grouping).cloned())
    }

    fn search(&self, filter: &AdjustmentFilter) -> ApplicationResult<Vec<AdjustmentAggregate>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect())
    }

    fn save(&self, aggregate: &AdjustmentAggregate) -> ApplicationResult<()> {
        let mut aggregates = self.load()?;
        upsert(&mut aggregates, aggregate);
        self.store(&aggregates)
    }

    fn delete(&self, id: &AdjustmentId) -> ApplicationResult<()> {
        self.delete_many(std::slice::from_ref(id))
    }

    fn delete_many(&self, ids: &[AdjustmentId]) -> ApplicationResult<()> {
        let mut aggregates = self.load()?;
        let before = aggregates.len();
        aggregates.retain(|a| !ids.contains(&a.id()));
        if aggregates.len() == before {
            return Ok(());
        }
        self.store(&aggregates)
    }
}

//! I/O boundary traits for testability
//!
//! These traits abstract the adjustment store, the catalog and the filesystem,
//! allowing services to be tested with in-memory implementations.

use std::io;
use std::path::Path;

use crate::application::ApplicationResult;
use crate::domain::{
    AdjustmentAggregate, AdjustmentId, AdjustmentKind, CatalogUnit, DomainError, FormationTree,
    GroupingIdentity, GroupingNode, ProgramIdentity, TeachingUnitIdentity,
};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Rename/move a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Criteria for [`AdjustmentRepository::search`]. Unset fields match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentFilter {
    pub program: ProgramIdentity,
    pub grouping: Option<GroupingIdentity>,
    pub unit: Option<TeachingUnitIdentity>,
    pub kind: Option<AdjustmentKind>,
}

impl AdjustmentFilter {
    /// All aggregates of a program.
    pub fn program(program: &ProgramIdentity) -> Self {
        Self {
            program: program.clone(),
            grouping: None,
            unit: None,
            kind: None,
        }
    }

    pub fn grouping(mut self, grouping: &GroupingIdentity) -> Self {
        self.grouping = Some(grouping.clone());
        self
    }

    /// Only aggregates holding an adjustment of `kind` for `unit`.
    pub fn unit(mut self, unit: &TeachingUnitIdentity, kind: AdjustmentKind) -> Self {
        self.unit = Some(unit.clone());
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, aggregate: &AdjustmentAggregate) -> bool {
        if aggregate.program() != &self.program {
            return false;
        }
        if let Some(grouping) = &self.grouping {
            if aggregate.grouping() != grouping {
                return false;
            }
        }
        match (&self.unit, self.kind) {
            (Some(unit), Some(kind)) => aggregate.contains(kind, unit),
            (Some(unit), None) => aggregate.adjustment_for(unit).is_some(),
            (None, _) => true,
        }
    }
}

/// Store of adjustment aggregates.
///
/// At most one aggregate exists per (program, grouping) pair.
pub trait AdjustmentRepository: Send + Sync {
    /// Aggregate by internal id.
    fn get(&self, id: &AdjustmentId) -> ApplicationResult<Option<AdjustmentAggregate>>;

    /// Aggregate of one grouping of one program.
    fn find(
        &self,
        program: &ProgramIdentity,
        grouping: &GroupingIdentity,
    ) -> ApplicationResult<Option<AdjustmentAggregate>>;

    /// Aggregates matching `filter`, in storage order.
    fn search(&self, filter: &AdjustmentFilter) -> ApplicationResult<Vec<AdjustmentAggregate>>;

    /// Insert or replace an aggregate (keyed by its id).
    fn save(&self, aggregate: &AdjustmentAggregate) -> ApplicationResult<()>;

    /// Delete one aggregate; deleting an unknown id is a no-op.
    fn delete(&self, id: &AdjustmentId) -> ApplicationResult<()>;

    /// Delete several aggregates at once.
    fn delete_many(&self, ids: &[AdjustmentId]) -> ApplicationResult<()>;

    /// Existing aggregate for the pair, or a new empty one (not yet saved).
    fn get_or_create(
        &self,
        program: &ProgramIdentity,
        grouping: &GroupingIdentity,
    ) -> ApplicationResult<AdjustmentAggregate> {
        Ok(self
            .find(program, grouping)?
            .unwrap_or_else(|| AdjustmentAggregate::new(program.clone(), grouping.clone())))
    }
}

/// Read-only access to the curriculum catalog.
pub trait CatalogTranslator: Send + Sync {
    /// Whole catalog tree of a program.
    fn get_formation(&self, program: &ProgramIdentity) -> ApplicationResult<FormationTree>;

    /// Catalog subtree of one grouping of a program.
    fn get_grouping_content(
        &self,
        program: &ProgramIdentity,
        grouping_code: &str,
    ) -> ApplicationResult<GroupingNode> {
        let formation = self.get_formation(program)?;
        formation
            .root
            .find_grouping(grouping_code)
            .cloned()
            .ok_or_else(|| {
                DomainError::GroupingNotFound {
                    program: program.clone(),
                    grouping: grouping_code.to_string(),
                }
                .into()
            })
    }

    /// Catalog records of the given units; unknown units are left out.
    fn search_units(&self, units: &[TeachingUnitIdentity]) -> ApplicationResult<Vec<CatalogUnit>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

//! Catalog translators: in-memory and loaded from a TOML catalog file

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt, TomlResultExt};
use crate::domain::{
    normalize_code, CatalogUnit, ContentNode, DomainError, FormationTree, GroupingNode,
    ProgramIdentity, TeachingUnitIdentity,
};
use crate::infrastructure::traits::{CatalogTranslator, FileSystem};

/// Catalog held in memory.
///
/// Units are indexed from the explicit unit list and from every formation tree.
/// Program, grouping and unit codes are normalized on construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    formations: Vec<FormationTree>,
    units: HashMap<TeachingUnitIdentity, CatalogUnit>,
}

impl InMemoryCatalog {
    pub fn new(mut formations: Vec<FormationTree>, units: Vec<CatalogUnit>) -> Self {
        let mut index = HashMap::new();
        for formation in &mut formations {
            formation.program.code = normalize_code(&formation.program.code);
            normalize_tree(&mut formation.root);
            index_tree(&formation.root, &mut index);
        }
        for mut unit in units {
            unit.code = normalize_code(&unit.code);
            index.insert(unit.identity(), unit);
        }
        Self {
            formations,
            units: index,
        }
    }

    /// Load a catalog file (`[[formations]]` and `[[units]]` tables).
    pub fn from_toml_file(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Self> {
        let content = fs
            .read_to_string(path)
            .with_path_context("read catalog", path)?;
        let file: CatalogFile =
            toml::from_str(&content).with_toml_context("parse catalog", path)?;
        debug!(
            "catalog {}: {} formation(s), {} extra unit(s)",
            path.display(),
            file.formations.len(),
            file.units.len()
        );
        Ok(Self::new(file.formations, file.units))
    }
}

fn normalize_tree(node: &mut GroupingNode) {
    node.code = normalize_code(&node.code);
    for child in &mut node.children {
        match child {
            ContentNode::Unit(unit) => unit.code = normalize_code(&unit.code),
            ContentNode::Grouping(grouping) => normalize_tree(grouping),
        }
    }
}

fn index_tree(node: &GroupingNode, index: &mut HashMap<TeachingUnitIdentity, CatalogUnit>) {
    for child in &node.children {
        match child {
            ContentNode::Unit(unit) => {
                index.entry(unit.identity()).or_insert_with(|| unit.clone());
            }
            ContentNode::Grouping(grouping) => index_tree(grouping, index),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    formations: Vec<FormationTree>,
    #[serde(default)]
    units: Vec<CatalogUnit>,
}

impl CatalogTranslator for InMemoryCatalog {
    fn get_formation(&self, program: &ProgramIdentity) -> ApplicationResult<FormationTree> {
        self.formations
            .iter()
            .find(|f| &f.program == program)
            .cloned()
            .ok_or_else(|| DomainError::ProgramNotFound(program.clone()).into())
    }

    fn search_units(&self, units: &[TeachingUnitIdentity]) -> ApplicationResult<Vec<CatalogUnit>> {
        Ok(units
            .iter()
            .filter_map(|identity| self.units.get(identity).cloned())
            .collect())
    }
}

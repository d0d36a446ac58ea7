//! Tree merger: splices grouping overlays into the catalog tree.
//!
//! The catalog tree is a strict containment hierarchy a few levels deep, so the
//! walk is a plain depth-first recursion. Overlays are matched to grouping nodes
//! by exact code, at any depth including the root.

use std::collections::HashMap;

use crate::domain::catalog::{CatalogUnit, ContentNode, GroupingNode};
use crate::domain::entities::{Adjustment, AdjustmentAggregate};
use crate::domain::error::DomainError;
use crate::domain::identity::{ElementRef, TeachingUnitIdentity};

/// A unit of the adjusted view, with its effective block.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedUnit {
    /// Catalog data; `unit.block` holds the effective block.
    pub unit: CatalogUnit,
    /// Block from the catalog, before any override.
    pub catalog_block: u8,
    pub added: bool,
    pub modified: bool,
    pub insert_after: Option<ElementRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdjustedNode {
    Grouping(AdjustedGrouping),
    Unit(AdjustedUnit),
}

/// A grouping of the adjusted view.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedGrouping {
    pub code: String,
    pub title: String,
    pub full_title: String,
    pub mandatory: bool,
    pub credits: Option<f64>,
    pub remark: Option<String>,
    pub children: Vec<AdjustedNode>,
}

impl AdjustedGrouping {
    pub fn units(&self) -> impl Iterator<Item = &AdjustedUnit> {
        self.children.iter().filter_map(|child| match child {
            AdjustedNode::Unit(unit) => Some(unit),
            AdjustedNode::Grouping(_) => None,
        })
    }

    pub fn subgroupings(&self) -> impl Iterator<Item = &AdjustedGrouping> {
        self.children.iter().filter_map(|child| match child {
            AdjustedNode::Grouping(grouping) => Some(grouping),
            AdjustedNode::Unit(_) => None,
        })
    }

    pub fn find_grouping(&self, code: &str) -> Option<&AdjustedGrouping> {
        if self.code == code {
            return Some(self);
        }
        self.subgroupings()
            .find_map(|child| child.find_grouping(code))
    }
}

/// Merge `adjustments` into the catalog subtree rooted at `root`.
///
/// `added_units` must hold the catalog records of every added unit; a missing
/// record fails with [`DomainError::UnitNotFound`].
pub fn merge(
    root: &GroupingNode,
    adjustments: &[AdjustmentAggregate],
    added_units: &[CatalogUnit],
) -> Result<AdjustedGrouping, DomainError> {
    let merger = TreeMerger {
        adjustments: adjustments
            .iter()
            .map(|agg| (agg.grouping().code.as_str(), agg))
            .collect(),
        catalog: added_units
            .iter()
            .map(|unit| (unit.identity(), unit))
            .collect(),
    };
    merger.merge_grouping(root)
}

struct TreeMerger<'a> {
    adjustments: HashMap<&'a str, &'a AdjustmentAggregate>,
    catalog: HashMap<TeachingUnitIdentity, &'a CatalogUnit>,
}

impl TreeMerger<'_> {
    fn merge_grouping(&self, node: &GroupingNode) -> Result<AdjustedGrouping, DomainError> {
        let overlay = self.adjustments.get(node.code.as_str()).copied();

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            match child {
                ContentNode::Grouping(grouping) => {
                    children.push(AdjustedNode::Grouping(self.merge_grouping(grouping)?));
                }
                ContentNode::Unit(unit) => {
                    let adjustment = overlay.and_then(|agg| agg.adjustment_for(&unit.identity()));
                    match adjustment {
                        Some(Adjustment::Removed) => {}
                        Some(Adjustment::Modified { block }) => {
                            children.push(AdjustedNode::Unit(adjusted(unit, Some(*block), false, None)));
                        }
                        _ => {
                            children.push(AdjustedNode::Unit(adjusted(unit, None, false, None)));
                        }
                    }
                }
            }
        }

        if let Some(agg) = overlay {
            for added in agg.added_units() {
                let unit = self
                    .catalog
                    .get(&added.unit)
                    .ok_or_else(|| DomainError::UnitNotFound(added.unit.clone()))?;
                children.push(AdjustedNode::Unit(adjusted(
                    unit,
                    added.block,
                    true,
                    added.insert_after,
                )));
            }
        }

        Ok(AdjustedGrouping {
            code: node.code.clone(),
            title: node.title.clone(),
            full_title: node.full_title.clone(),
            mandatory: node.mandatory,
            credits: node.credits,
            remark: node.remark.clone(),
            children,
        })
    }
}

fn adjusted(
    unit: &CatalogUnit,
    block: Option<u8>,
    added: bool,
    insert_after: Option<ElementRef>,
) -> AdjustedUnit {
    let catalog_block = unit.block;
    let mut unit = unit.clone();
    if let Some(block) = block {
        unit.block = block;
    }
    AdjustedUnit {
        modified: block.is_some_and(|b| b != catalog_block),
        unit,
        catalog_block,
        added,
        insert_after,
    }
}

//! Adjustment aggregate: the per-grouping overlay on top of the catalog

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::{BusinessError, DomainError};
use crate::domain::identity::{
    AdjustmentId, ElementRef, GroupingIdentity, ProgramIdentity, TeachingUnitIdentity,
    UnitAdjustmentId,
};

/// Kind of a per-unit adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Added,
    Removed,
    Modified,
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdjustmentKind::Added => "added",
            AdjustmentKind::Removed => "removed",
            AdjustmentKind::Modified => "modified",
        };
        f.write_str(s)
    }
}

impl FromStr for AdjustmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "added" | "add" => Ok(AdjustmentKind::Added),
            "removed" | "remove" => Ok(AdjustmentKind::Removed),
            "modified" | "modify" => Ok(AdjustmentKind::Modified),
            other => Err(format!(
                "unknown adjustment kind '{other}' (expected added, removed or modified)"
            )),
        }
    }
}

/// Tagged state of one unit inside a grouping overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// Not in the catalog content of the grouping, shown as added.
    /// `block` overrides the catalog block of the added unit.
    Added {
        insert_after: Option<ElementRef>,
        block: Option<u8>,
    },
    /// In the catalog content of the grouping, hidden.
    Removed,
    /// In the catalog content of the grouping, shown with another block.
    Modified { block: u8 },
}

impl Adjustment {
    pub fn kind(&self) -> AdjustmentKind {
        match self {
            Adjustment::Added { .. } => AdjustmentKind::Added,
            Adjustment::Removed => AdjustmentKind::Removed,
            Adjustment::Modified { .. } => AdjustmentKind::Modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAdjustment {
    pub id: UnitAdjustmentId,
    pub adjustment: Adjustment,
}

impl UnitAdjustment {
    fn new(adjustment: Adjustment) -> Self {
        Self {
            id: UnitAdjustmentId::generate(),
            adjustment,
        }
    }
}

/// Unit shown as added to a grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedUnit {
    pub id: UnitAdjustmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<u8>,
    pub unit: TeachingUnitIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<ElementRef>,
}

/// Catalog unit hidden from a grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedUnit {
    pub id: UnitAdjustmentId,
    pub unit: TeachingUnitIdentity,
}

/// Catalog unit shown with an overridden block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedUnit {
    pub id: UnitAdjustmentId,
    pub block: u8,
    pub unit: TeachingUnitIdentity,
}

/// Overlay of one grouping of one program.
///
/// Entries are keyed by unit so that a unit carries at most one adjustment,
/// and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentAggregate {
    id: AdjustmentId,
    program: ProgramIdentity,
    grouping: GroupingIdentity,
    entries: IndexMap<TeachingUnitIdentity, UnitAdjustment>,
}

impl AdjustmentAggregate {
    /// Create an empty overlay for a grouping.
    pub fn new(program: ProgramIdentity, grouping: GroupingIdentity) -> Self {
        Self {
            id: AdjustmentId::generate(),
            program,
            grouping,
            entries: IndexMap::new(),
        }
    }

    /// Rebuild an aggregate from its persisted lists.
    pub fn from_parts(
        id: AdjustmentId,
        program: ProgramIdentity,
        grouping: GroupingIdentity,
        added: Vec<AddedUnit>,
        removed: Vec<RemovedUnit>,
        modified: Vec<ModifiedUnit>,
    ) -> Self {
        let mut entries = IndexMap::new();
        for a in added {
            entries.insert(
                a.unit,
                UnitAdjustment {
                    id: a.id,
                    adjustment: Adjustment::Added {
                        insert_after: a.insert_after,
                        block: a.block,
                    },
                },
            );
        }
        for r in removed {
            entries.insert(
                r.unit,
                UnitAdjustment {
                    id: r.id,
                    adjustment: Adjustment::Removed,
                },
            );
        }
        for m in modified {
            entries.insert(
                m.unit,
                UnitAdjustment {
                    id: m.id,
                    adjustment: Adjustment::Modified { block: m.block },
                },
            );
        }
        Self {
            id,
            program,
            grouping,
            entries,
        }
    }

    pub fn id(&self) -> AdjustmentId {
        self.id
    }

    pub fn program(&self) -> &ProgramIdentity {
        &self.program
    }

    pub fn grouping(&self) -> &GroupingIdentity {
        &self.grouping
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&TeachingUnitIdentity, &UnitAdjustment)> {
        self.entries.iter()
    }

    pub fn adjustment_for(&self, unit: &TeachingUnitIdentity) -> Option<&Adjustment> {
        self.entries.get(unit).map(|entry| &entry.adjustment)
    }

    pub fn contains(&self, kind: AdjustmentKind, unit: &TeachingUnitIdentity) -> bool {
        self.adjustment_for(unit)
            .is_some_and(|adjustment| adjustment.kind() == kind)
    }

    /// Add units to the grouping, in the given order.
    ///
    /// Every conflicting unit is reported; nothing is applied unless the
    /// whole batch is valid.
    pub fn add_units(&mut self, units: &[TeachingUnitIdentity]) -> Result<(), DomainError> {
        self.add_units_after(units, None)
    }

    pub fn add_units_after(
        &mut self,
        units: &[TeachingUnitIdentity],
        insert_after: Option<&ElementRef>,
    ) -> Result<(), DomainError> {
        self.add_units_over(units, insert_after, |_| false)
    }

    /// Add units to a grouping whose catalog content is known.
    ///
    /// `in_content` tells whether a unit belongs to that content. Such a unit
    /// can only be added back after its removal, which cancels the removal.
    pub fn add_units_over(
        &mut self,
        units: &[TeachingUnitIdentity],
        insert_after: Option<&ElementRef>,
        in_content: impl Fn(&TeachingUnitIdentity) -> bool,
    ) -> Result<(), DomainError> {
        self.validate_batch(units, BusinessError::AlreadyAdded, |unit| {
            match self.adjustment_for(unit) {
                Some(Adjustment::Added { .. }) => Some(BusinessError::AlreadyAdded(unit.clone())),
                Some(Adjustment::Removed) => None,
                Some(Adjustment::Modified { .. }) => {
                    Some(BusinessError::AlreadyInGrouping(unit.clone()))
                }
                None if in_content(unit) => Some(BusinessError::AlreadyInGrouping(unit.clone())),
                None => None,
            }
        })?;

        for unit in units {
            if self.contains(AdjustmentKind::Removed, unit) {
                self.entries.shift_remove(unit);
            } else {
                self.entries.insert(
                    unit.clone(),
                    UnitAdjustment::new(Adjustment::Added {
                        insert_after: insert_after.cloned(),
                        block: None,
                    }),
                );
            }
        }
        Ok(())
    }

    /// Remove units from the grouping.
    ///
    /// Removing an added unit cancels the addition instead of recording a removal.
    pub fn remove_units(&mut self, units: &[TeachingUnitIdentity]) -> Result<(), DomainError> {
        self.validate_batch(units, BusinessError::AlreadyRemoved, |unit| {
            self.contains(AdjustmentKind::Removed, unit)
                .then(|| BusinessError::AlreadyRemoved(unit.clone()))
        })?;

        for unit in units {
            match self.adjustment_for(unit) {
                Some(Adjustment::Added { .. }) => {
                    self.entries.shift_remove(unit);
                }
                _ => {
                    self.entries
                        .insert(unit.clone(), UnitAdjustment::new(Adjustment::Removed));
                }
            }
        }
        Ok(())
    }

    /// Show a unit with `new_block` instead of `original_block`.
    ///
    /// Setting the original block back drops the modification; only one
    /// modification per unit is retained. Returns whether the overlay changed.
    pub fn modify_unit_block(
        &mut self,
        unit: &TeachingUnitIdentity,
        original_block: u8,
        new_block: u8,
    ) -> bool {
        let reverted = new_block == original_block;
        match self.entries.get_mut(unit) {
            Some(UnitAdjustment {
                adjustment: Adjustment::Added { block, .. },
                ..
            }) => {
                let target = if reverted { None } else { Some(new_block) };
                let changed = *block != target;
                *block = target;
                changed
            }
            Some(UnitAdjustment {
                adjustment: Adjustment::Modified { block },
                ..
            }) => {
                if reverted {
                    self.entries.shift_remove(unit);
                    true
                } else {
                    let changed = *block != new_block;
                    *block = new_block;
                    changed
                }
            }
            _ if reverted => false,
            // A removed unit modified to another block is shown again.
            _ => {
                self.entries.insert(
                    unit.clone(),
                    UnitAdjustment::new(Adjustment::Modified { block: new_block }),
                );
                true
            }
        }
    }

    /// Drop the adjustment of `kind` recorded for `unit`, if any.
    pub fn cancel_adjustment(&mut self, kind: AdjustmentKind, unit: &TeachingUnitIdentity) -> bool {
        if self.contains(kind, unit) {
            self.entries.shift_remove(unit);
            true
        } else {
            false
        }
    }

    pub fn added_units(&self) -> Vec<AddedUnit> {
        self.entries
            .iter()
            .filter_map(|(unit, entry)| match &entry.adjustment {
                Adjustment::Added {
                    insert_after,
                    block,
                } => Some(AddedUnit {
                    id: entry.id,
                    unit: unit.clone(),
                    insert_after: insert_after.clone(),
                    block: *block,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn removed_units(&self) -> Vec<RemovedUnit> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.adjustment == Adjustment::Removed)
            .map(|(unit, entry)| RemovedUnit {
                id: entry.id,
                unit: unit.clone(),
            })
            .collect()
    }

    pub fn modified_units(&self) -> Vec<ModifiedUnit> {
        self.entries
            .iter()
            .filter_map(|(unit, entry)| match entry.adjustment {
                Adjustment::Modified { block } => Some(ModifiedUnit {
                    id: entry.id,
                    unit: unit.clone(),
                    block,
                }),
                _ => None,
            })
            .collect()
    }

    /// Identities of added units, in insertion order.
    pub fn added_identities(&self) -> Vec<TeachingUnitIdentity> {
        self.added_units().into_iter().map(|a| a.unit).collect()
    }

    /// Collect the violations of a batch, at most one per unit.
    fn validate_batch(
        &self,
        units: &[TeachingUnitIdentity],
        repeated: fn(TeachingUnitIdentity) -> BusinessError,
        conflict: impl Fn(&TeachingUnitIdentity) -> Option<BusinessError>,
    ) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut errors = Vec::new();
        for unit in units {
            let violation = if seen.insert(unit) {
                conflict(unit)
            } else {
                Some(repeated(unit.clone()))
            };
            if let Some(violation) = violation {
                if reported.insert(unit) {
                    errors.push(violation);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Business(errors))
        }
    }
}

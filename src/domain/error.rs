//! Domain-level errors (no external dependencies)

use itertools::Itertools;
use thiserror::Error;

use crate::domain::identity::{GroupingIdentity, ProgramIdentity, TeachingUnitIdentity};

/// One business rule violated by one item of a batch command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    #[error("unit already added: {0}")]
    AlreadyAdded(TeachingUnitIdentity),

    #[error("unit already removed: {0}")]
    AlreadyRemoved(TeachingUnitIdentity),

    /// Unit shown by the catalog content of the grouping.
    #[error("unit already part of the grouping: {0}")]
    AlreadyInGrouping(TeachingUnitIdentity),
}

/// Domain errors represent business logic violations and unknown catalog elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Every violation found in a batch, reported together.
    #[error("{}", .0.iter().join("; "))]
    Business(Vec<BusinessError>),

    #[error("nothing to reinitialize for program {0}")]
    NothingToReinitialize(ProgramIdentity),

    #[error("program not found in catalog: {0}")]
    ProgramNotFound(ProgramIdentity),

    #[error("grouping {grouping} not found in program {program}")]
    GroupingNotFound {
        program: ProgramIdentity,
        grouping: String,
    },

    #[error("teaching unit not found in catalog: {0}")]
    UnitNotFound(TeachingUnitIdentity),

    #[error("teaching unit {unit} is not part of grouping {grouping}")]
    UnitNotInGrouping {
        unit: TeachingUnitIdentity,
        grouping: GroupingIdentity,
    },
}

impl DomainError {
    /// Business violations carried by this error, empty for other variants.
    pub fn business_errors(&self) -> &[BusinessError] {
        match self {
            DomainError::Business(errors) => errors,
            _ => &[],
        }
    }

    /// True for errors caused by an element unknown to the catalog.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::ProgramNotFound(_)
                | DomainError::GroupingNotFound { .. }
                | DomainError::UnitNotFound(_)
                | DomainError::UnitNotInGrouping { .. }
        )
    }
}

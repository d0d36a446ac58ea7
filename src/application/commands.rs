//! Command and query messages accepted by the services

use serde::{Deserialize, Serialize};

use crate::domain::{
    AdjustmentKind, ElementRef, GroupingIdentity, ProgramIdentity, TeachingUnitIdentity,
};

fn units_of(codes: &[String], year: i32) -> Vec<TeachingUnitIdentity> {
    codes
        .iter()
        .map(|code| TeachingUnitIdentity::new(code, year))
        .collect()
}

/// Add units to a grouping of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUnits {
    pub year: i32,
    pub program_code: String,
    /// Grouping receiving the units.
    pub add_to: String,
    pub units: Vec<String>,
    /// Informative placement hint stored with each added unit.
    #[serde(default)]
    pub insert_after: Option<ElementRef>,
}

impl AddUnits {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }

    pub fn grouping(&self) -> GroupingIdentity {
        GroupingIdentity::new(&self.add_to, self.year)
    }

    pub fn unit_identities(&self) -> Vec<TeachingUnitIdentity> {
        units_of(&self.units, self.year)
    }
}

/// Remove units from a grouping of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveUnits {
    pub year: i32,
    pub program_code: String,
    pub remove_from: String,
    pub units: Vec<String>,
}

impl RemoveUnits {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }

    pub fn grouping(&self) -> GroupingIdentity {
        GroupingIdentity::new(&self.remove_from, self.year)
    }

    pub fn unit_identities(&self) -> Vec<TeachingUnitIdentity> {
        units_of(&self.units, self.year)
    }
}

/// New block for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyUnit {
    pub code: String,
    pub year: i32,
    pub block: u8,
}

impl ModifyUnit {
    pub fn identity(&self) -> TeachingUnitIdentity {
        TeachingUnitIdentity::new(&self.code, self.year)
    }
}

/// Change the block of units inside a grouping of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyUnits {
    pub year: i32,
    pub program_code: String,
    pub adjust_in: String,
    pub units: Vec<ModifyUnit>,
}

impl ModifyUnits {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }

    pub fn grouping(&self) -> GroupingIdentity {
        GroupingIdentity::new(&self.adjust_in, self.year)
    }
}

/// Drop one recorded adjustment of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAdjustment {
    pub year: i32,
    pub program_code: String,
    pub grouping: String,
    pub unit: String,
    pub kind: AdjustmentKind,
}

impl CancelAdjustment {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }

    pub fn grouping(&self) -> GroupingIdentity {
        GroupingIdentity::new(&self.grouping, self.year)
    }

    pub fn unit(&self) -> TeachingUnitIdentity {
        TeachingUnitIdentity::new(&self.unit, self.year)
    }
}

/// Drop every adjustment of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinitialize {
    pub year: i32,
    pub program_code: String,
}

impl Reinitialize {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }
}

/// Adjusted content of one grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGroupingContent {
    pub year: i32,
    pub grouping_code: String,
    pub program_code: String,
}

impl GetGroupingContent {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }

    pub fn grouping(&self) -> GroupingIdentity {
        GroupingIdentity::new(&self.grouping_code, self.year)
    }
}

/// Adjusted content of a whole program, nested (course enrollment form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEnrollmentForm {
    pub year: i32,
    pub program_code: String,
}

impl GetEnrollmentForm {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }
}

/// Condensed adjusted program used by enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEnrollmentProgram {
    pub year: i32,
    pub program_code: String,
}

impl GetEnrollmentProgram {
    pub fn program(&self) -> ProgramIdentity {
        ProgramIdentity::new(&self.program_code, self.year)
    }
}

//! Output views built from the adjusted tree

use serde::Serialize;

use crate::domain::{AdjustedGrouping, AdjustedNode, AdjustedUnit, ProgramIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Unit,
    Grouping,
}

/// One row of a grouping's content, display-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentElement {
    pub kind: ElementKind,
    pub code: String,
    pub full_title: String,
    pub block: String,
    pub quarter: String,
    pub credits: String,
    pub volumes: String,
    pub mandatory: bool,
    pub derogation_session: String,
    pub added: bool,
    pub modified: bool,
}

impl From<&AdjustedUnit> for ContentElement {
    fn from(adjusted: &AdjustedUnit) -> Self {
        let unit = &adjusted.unit;
        Self {
            kind: ElementKind::Unit,
            code: unit.code.clone(),
            full_title: unit.full_title.clone(),
            block: unit.block.to_string(),
            quarter: unit.quarter.clone().unwrap_or_default(),
            credits: unit.credits_text(),
            volumes: unit.volumes_text(),
            mandatory: unit.mandatory,
            derogation_session: unit.derogation_session.clone(),
            added: adjusted.added,
            modified: adjusted.modified,
        }
    }
}

impl From<&AdjustedGrouping> for ContentElement {
    fn from(grouping: &AdjustedGrouping) -> Self {
        Self {
            kind: ElementKind::Grouping,
            code: grouping.code.clone(),
            full_title: grouping.full_title.clone(),
            block: String::new(),
            quarter: String::new(),
            credits: grouping.credits.map(|c| c.to_string()).unwrap_or_default(),
            volumes: String::new(),
            mandatory: grouping.mandatory,
            derogation_session: String::new(),
            added: false,
            modified: false,
        }
    }
}

/// Adjusted direct content of one grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingContentView {
    pub code: String,
    pub title: String,
    pub full_title: String,
    pub elements: Vec<ContentElement>,
}

impl From<&AdjustedGrouping> for GroupingContentView {
    fn from(grouping: &AdjustedGrouping) -> Self {
        let elements = grouping
            .children
            .iter()
            .map(|child| match child {
                AdjustedNode::Unit(unit) => ContentElement::from(unit),
                AdjustedNode::Grouping(sub) => ContentElement::from(sub),
            })
            .collect();
        Self {
            code: grouping.code.clone(),
            title: grouping.title.clone(),
            full_title: grouping.full_title.clone(),
            elements,
        }
    }
}

/// Whole adjusted program, nested as in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FullProgramContentView {
    pub program: ProgramIdentity,
    pub title: String,
    pub full_title: String,
    pub root: AdjustedGrouping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentUnitView {
    pub code: String,
    pub title: String,
    pub mandatory: bool,
    pub block: u8,
    pub added: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentGroupingView {
    pub code: String,
    pub full_title: String,
    pub mandatory: bool,
    pub units: Vec<EnrollmentUnitView>,
    pub subprogram: Vec<EnrollmentGroupingView>,
}

impl From<&AdjustedGrouping> for EnrollmentGroupingView {
    fn from(grouping: &AdjustedGrouping) -> Self {
        Self {
            code: grouping.code.clone(),
            full_title: grouping.full_title.clone(),
            mandatory: grouping.mandatory,
            units: grouping
                .units()
                .map(|adjusted| EnrollmentUnitView {
                    code: adjusted.unit.code.clone(),
                    title: adjusted.unit.full_title.clone(),
                    mandatory: adjusted.unit.mandatory,
                    block: adjusted.unit.block,
                    added: adjusted.added,
                })
                .collect(),
            subprogram: grouping.subgroupings().map(Self::from).collect(),
        }
    }
}

/// Condensed adjusted program: groupings and units only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentProgramView {
    pub code: String,
    pub year: i32,
    pub full_title: String,
    pub subprogram: Vec<EnrollmentGroupingView>,
}

//! Catalog content: the read-only curriculum tree supplied by the catalog translator

use serde::{Deserialize, Serialize};

use crate::domain::identity::{ProgramIdentity, TeachingUnitIdentity};

/// A teaching unit as described by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogUnit {
    pub code: String,
    pub year: i32,
    #[serde(default)]
    pub title: String,
    pub full_title: String,
    pub block: u8,
    /// Quarter text, e.g. `Q1`, `Q2`, `Q1 et Q2`.
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub credits_absolute: Option<f64>,
    #[serde(default)]
    pub credits_relative: Option<u32>,
    /// Annual volume of lectures (partim magistral).
    #[serde(default)]
    pub volume_annual_pm: Option<f64>,
    /// Annual volume of practical work (partim pratique).
    #[serde(default)]
    pub volume_annual_pp: Option<f64>,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default)]
    pub derogation_session: String,
}

fn default_true() -> bool {
    true
}

impl CatalogUnit {
    pub fn identity(&self) -> TeachingUnitIdentity {
        TeachingUnitIdentity::new(&self.code, self.year)
    }

    /// Credits as displayed on enrollment forms.
    ///
    /// `relative(absolute)` when both are known and differ, `relative` when they
    /// are equal, otherwise the absolute credits without trailing zeros.
    pub fn credits_text(&self) -> String {
        match (self.credits_relative, self.credits_absolute) {
            (Some(relative), Some(absolute)) if relative > 0 => {
                if f64::from(relative) != absolute {
                    format!("{}({})", relative, absolute)
                } else {
                    relative.to_string()
                }
            }
            (Some(relative), None) if relative > 0 => relative.to_string(),
            (_, Some(absolute)) => absolute.to_string(),
            (_, None) => String::new(),
        }
    }

    /// Volumes as `pm+pp`; zero or missing parts are left out.
    pub fn volumes_text(&self) -> String {
        let pm = self.volume_annual_pm.filter(|v| *v != 0.0);
        let pp = self.volume_annual_pp.filter(|v| *v != 0.0);
        match (pm, pp) {
            (Some(pm), Some(pp)) => format!("{}+{}", pm, pp),
            (Some(pm), None) => pm.to_string(),
            (None, Some(pp)) => pp.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// A grouping node with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingNode {
    pub code: String,
    pub title: String,
    pub full_title: String,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

/// Child of a grouping: a sub-grouping or a teaching unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    Grouping(GroupingNode),
    Unit(CatalogUnit),
}

impl GroupingNode {
    /// Depth-first search for a grouping by code, the node itself included.
    pub fn find_grouping(&self, code: &str) -> Option<&GroupingNode> {
        if self.code == code {
            return Some(self);
        }
        self.subgroupings().find_map(|child| child.find_grouping(code))
    }

    /// Unit directly contained in this grouping.
    pub fn find_unit(&self, code: &str) -> Option<&CatalogUnit> {
        self.units().find(|unit| unit.code == code)
    }

    pub fn units(&self) -> impl Iterator<Item = &CatalogUnit> {
        self.children.iter().filter_map(|child| match child {
            ContentNode::Unit(unit) => Some(unit),
            ContentNode::Grouping(_) => None,
        })
    }

    pub fn subgroupings(&self) -> impl Iterator<Item = &GroupingNode> {
        self.children.iter().filter_map(|child| match child {
            ContentNode::Grouping(grouping) => Some(grouping),
            ContentNode::Unit(_) => None,
        })
    }

    /// Codes of this grouping and of all its descendants.
    pub fn grouping_codes(&self) -> Vec<&str> {
        let mut codes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            codes.push(node.code.as_str());
            stack.extend(node.subgroupings());
        }
        codes
    }
}

/// Whole catalog tree of one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTree {
    pub program: ProgramIdentity,
    /// Short title (acronym-level), e.g. `Bachelier en sciences économiques`.
    #[serde(default)]
    pub title: String,
    pub full_title: String,
    pub root: GroupingNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(code: &str) -> CatalogUnit {
        CatalogUnit {
            code: code.into(),
            year: 2021,
            title: String::new(),
            full_title: code.into(),
            block: 1,
            quarter: None,
            credits_absolute: None,
            credits_relative: None,
            volume_annual_pm: None,
            volume_annual_pp: None,
            mandatory: true,
            derogation_session: String::new(),
        }
    }

    fn grouping(code: &str, children: Vec<ContentNode>) -> GroupingNode {
        GroupingNode {
            code: code.into(),
            title: code.into(),
            full_title: code.into(),
            mandatory: true,
            credits: None,
            remark: None,
            children,
        }
    }

    #[test]
    fn given_nested_tree_when_finding_grouping_then_found_at_any_depth() {
        let tree = grouping(
            "ROOT",
            vec![
                ContentNode::Unit(unit("LUNIT1000")),
                ContentNode::Grouping(grouping(
                    "MID",
                    vec![ContentNode::Grouping(grouping("LEAF", vec![]))],
                )),
            ],
        );

        assert_eq!(tree.find_grouping("ROOT").map(|g| g.code.as_str()), Some("ROOT"));
        assert_eq!(tree.find_grouping("LEAF").map(|g| g.code.as_str()), Some("LEAF"));
        assert!(tree.find_grouping("OTHER").is_none());
        assert!(tree.find_unit("LUNIT1000").is_some());

        let mut codes = tree.grouping_codes();
        codes.sort_unstable();
        assert_eq!(codes, vec!["LEAF", "MID", "ROOT"]);
    }
}

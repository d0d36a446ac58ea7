//! Identities of programs, groupings, teaching units and adjustments

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalize a catalog code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Root curriculum (a "formation") for one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramIdentity {
    pub code: String,
    pub year: i32,
}

impl ProgramIdentity {
    pub fn new(code: &str, year: i32) -> Self {
        Self {
            code: normalize_code(code),
            year,
        }
    }
}

impl fmt::Display for ProgramIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.year)
    }
}

/// One grouping node anywhere in a program tree.
///
/// Codes are unique within a program and year, not across programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupingIdentity {
    pub code: String,
    pub year: i32,
}

impl GroupingIdentity {
    pub fn new(code: &str, year: i32) -> Self {
        Self {
            code: normalize_code(code),
            year,
        }
    }
}

impl fmt::Display for GroupingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.year)
    }
}

/// A teaching unit (course) for one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeachingUnitIdentity {
    pub code: String,
    pub year: i32,
}

impl TeachingUnitIdentity {
    pub fn new(code: &str, year: i32) -> Self {
        Self {
            code: normalize_code(code),
            year,
        }
    }
}

impl fmt::Display for TeachingUnitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.year)
    }
}

/// Internal id of an adjustment aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentId(pub Uuid);

impl AdjustmentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AdjustmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Internal id of one per-unit entry inside an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitAdjustmentId(pub Uuid);

impl UnitAdjustmentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Element an added unit should follow: a unit or a sub-grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum ElementRef {
    Unit(String),
    Grouping(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_untrimmed_lowercase_code_when_building_identity_then_code_is_normalized() {
        let unit = TeachingUnitIdentity::new("  linge1125 ", 2021);
        assert_eq!(unit.code, "LINGE1125");
        assert_eq!(unit.to_string(), "LINGE1125 (2021)");
    }
}

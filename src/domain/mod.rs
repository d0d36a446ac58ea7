//! Domain layer: identities, catalog values, adjustment aggregate and tree merge
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod entities;
pub mod error;
pub mod identity;
pub mod merge;

pub use catalog::{CatalogUnit, ContentNode, FormationTree, GroupingNode};
pub use entities::*;
pub use error::{BusinessError, DomainError};
pub use identity::*;
pub use merge::{merge, AdjustedGrouping, AdjustedNode, AdjustedUnit};

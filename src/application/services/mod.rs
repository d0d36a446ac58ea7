//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (AdjustmentRepository, CatalogTranslator)
//! but are themselves concrete structs, not traits.

mod adjustment;
mod content;

pub use adjustment::AdjustmentService;
pub use content::ContentService;

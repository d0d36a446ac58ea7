//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{AdjustmentService, ContentService};
use crate::config::Settings;
use crate::infrastructure::catalog::InMemoryCatalog;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::repository::TomlAdjustmentRepository;
use crate::infrastructure::traits::{
    AdjustmentRepository, CatalogTranslator, FileSystem, RealFileSystem,
};

/// Container holding the shared dependencies of all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Adjustment store
    pub repository: Arc<dyn AdjustmentRepository>,

    /// Catalog translator
    pub catalog: Arc<dyn CatalogTranslator>,
}

impl ServiceContainer {
    /// Create a container backed by the TOML store in `data_dir` and the
    /// configured catalog file.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

        let catalog_path = settings
            .catalog_file
            .clone()
            .ok_or_else(|| InfraError::Catalog {
                message: "no catalog file configured (set catalog_file or CUROV_CATALOG_FILE)"
                    .to_string(),
            })?;
        if !fs.exists(&catalog_path) {
            return Err(InfraError::Catalog {
                message: format!("catalog file not found: {}", catalog_path.display()),
            });
        }
        let catalog = InMemoryCatalog::from_toml_file(fs.as_ref(), &catalog_path)?;

        fs.create_dir_all(&settings.data_dir)
            .map_err(|e| InfraError::io(format!("create {}", settings.data_dir.display()), e))?;
        let repository = TomlAdjustmentRepository::in_dir(fs.clone(), &settings.data_dir);
        debug!("adjustment store: {}", repository.path().display());

        Ok(Self::with_deps(
            settings,
            fs,
            Arc::new(repository),
            Arc::new(catalog),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        repository: Arc<dyn AdjustmentRepository>,
        catalog: Arc<dyn CatalogTranslator>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            repository,
            catalog,
        }
    }

    pub fn adjustment_service(&self) -> AdjustmentService {
        AdjustmentService::new(self.repository.clone(), self.catalog.clone())
    }

    pub fn content_service(&self) -> ContentService {
        ContentService::new(self.repository.clone(), self.catalog.clone())
    }
}

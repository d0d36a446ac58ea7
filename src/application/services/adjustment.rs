//! Adjustment command handlers
//!
//! Each handler loads (or creates) the overlay of the targeted grouping,
//! mutates it and persists it.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::commands::{
    AddUnits, CancelAdjustment, ModifyUnits, Reinitialize, RemoveUnits,
};
use crate::application::ApplicationResult;
use crate::domain::{
    AdjustmentAggregate, AdjustmentId, AdjustmentKind, DomainError, GroupingNode,
    TeachingUnitIdentity,
};
use crate::infrastructure::traits::{AdjustmentFilter, AdjustmentRepository, CatalogTranslator};

/// Write side of the overlay engine.
pub struct AdjustmentService {
    repo: Arc<dyn AdjustmentRepository>,
    catalog: Arc<dyn CatalogTranslator>,
}

impl AdjustmentService {
    /// Create a new adjustment service.
    pub fn new(repo: Arc<dyn AdjustmentRepository>, catalog: Arc<dyn CatalogTranslator>) -> Self {
        Self { repo, catalog }
    }

    /// Add units to a grouping.
    ///
    /// Fails with every unit of the batch that is already added or already
    /// part of the catalog content of the grouping; nothing is saved then.
    #[instrument(level = "debug", skip(self), fields(program = %cmd.program_code, grouping = %cmd.add_to))]
    pub fn add_units(&self, cmd: &AddUnits) -> ApplicationResult<AdjustmentId> {
        let program = cmd.program();
        let content = self.catalog.get_grouping_content(&program, &cmd.grouping().code)?;
        let mut aggregate = self.repo.get_or_create(&program, &cmd.grouping())?;
        aggregate.add_units_over(&cmd.unit_identities(), cmd.insert_after.as_ref(), |unit| {
            content.find_unit(&unit.code).is_some()
        })?;
        self.repo.save(&aggregate)?;
        info!("added {} unit(s) to {}", cmd.units.len(), aggregate.grouping());
        Ok(aggregate.id())
    }

    /// Remove units from a grouping.
    ///
    /// Fails with every already-removed unit of the batch; nothing is saved then.
    #[instrument(level = "debug", skip(self), fields(program = %cmd.program_code, grouping = %cmd.remove_from))]
    pub fn remove_units(&self, cmd: &RemoveUnits) -> ApplicationResult<AdjustmentId> {
        let mut aggregate = self.repo.get_or_create(&cmd.program(), &cmd.grouping())?;
        aggregate.remove_units(&cmd.unit_identities())?;
        self.repo.save(&aggregate)?;
        info!("removed {} unit(s) from {}", cmd.units.len(), aggregate.grouping());
        Ok(aggregate.id())
    }

    /// Change the block of units in a grouping.
    ///
    /// The original block comes from the catalog content of the grouping, or
    /// from the unit catalog for units added to it.
    #[instrument(level = "debug", skip(self), fields(program = %cmd.program_code, grouping = %cmd.adjust_in))]
    pub fn modify_units(&self, cmd: &ModifyUnits) -> ApplicationResult<AdjustmentId> {
        let program = cmd.program();
        let content = self.catalog.get_grouping_content(&program, &cmd.grouping().code)?;
        let mut aggregate = self.repo.get_or_create(&program, &cmd.grouping())?;

        let mut changed = false;
        for unit in &cmd.units {
            let identity = unit.identity();
            let original = self.original_block(&content, &aggregate, &identity)?;
            debug!("modify {}: block {} -> {}", identity, original, unit.block);
            changed |= aggregate.modify_unit_block(&identity, original, unit.block);
        }

        if changed {
            self.repo.save(&aggregate)?;
        } else {
            debug!("no block change in {}, nothing saved", aggregate.grouping());
        }
        Ok(aggregate.id())
    }

    /// Drop one adjustment of a unit.
    ///
    /// Returns the id of the aggregate it was removed from, `None` when no
    /// adjustment matched.
    #[instrument(level = "debug", skip(self), fields(program = %cmd.program_code, grouping = %cmd.grouping, unit = %cmd.unit))]
    pub fn cancel_adjustment(&self, cmd: &CancelAdjustment) -> ApplicationResult<Option<AdjustmentId>> {
        let unit = cmd.unit();
        let filter = AdjustmentFilter::program(&cmd.program())
            .grouping(&cmd.grouping())
            .unit(&unit, cmd.kind);

        let Some(mut aggregate) = self.repo.search(&filter)?.into_iter().next() else {
            debug!("no {} adjustment found for {}", cmd.kind, unit);
            return Ok(None);
        };

        aggregate.cancel_adjustment(cmd.kind, &unit);
        self.repo.save(&aggregate)?;
        info!("cancelled {} adjustment of {} in {}", cmd.kind, unit, aggregate.grouping());
        Ok(Some(aggregate.id()))
    }

    /// Drop every adjustment of a program.
    ///
    /// Fails when the program has no adjustment. Returns the number of
    /// aggregates deleted.
    #[instrument(level = "debug", skip(self), fields(program = %cmd.program_code))]
    pub fn reinitialize(&self, cmd: &Reinitialize) -> ApplicationResult<usize> {
        let program = cmd.program();
        let aggregates = self.repo.search(&AdjustmentFilter::program(&program))?;
        if aggregates.is_empty() {
            return Err(DomainError::NothingToReinitialize(program).into());
        }

        let ids: Vec<AdjustmentId> = aggregates.iter().map(AdjustmentAggregate::id).collect();
        self.repo.delete_many(&ids)?;
        info!("reinitialized {}: {} grouping(s) reverted", program, ids.len());
        Ok(ids.len())
    }

    fn original_block(
        &self,
        content: &GroupingNode,
        aggregate: &AdjustmentAggregate,
        unit: &TeachingUnitIdentity,
    ) -> ApplicationResult<u8> {
        if let Some(catalog_unit) = content.find_unit(&unit.code) {
            return Ok(catalog_unit.block);
        }
        if aggregate.contains(AdjustmentKind::Added, unit) {
            let records = self.catalog.search_units(std::slice::from_ref(unit))?;
            return records
                .into_iter()
                .find(|record| record.code == unit.code)
                .map(|record| record.block)
                .ok_or_else(|| DomainError::UnitNotFound(unit.clone()).into());
        }
        Err(DomainError::UnitNotInGrouping {
            unit: unit.clone(),
            grouping: aggregate.grouping().clone(),
        }
        .into())
    }
}

//! Adjusted content queries (read side)
//!
//! Fetches the catalog tree and the program's overlays, then merges them.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::commands::{GetEnrollmentForm, GetEnrollmentProgram, GetGroupingContent};
use crate::application::views::{
    EnrollmentGroupingView, EnrollmentProgramView, FullProgramContentView, GroupingContentView,
};
use crate::application::ApplicationResult;
use crate::domain::{merge, AdjustedGrouping, GroupingNode, ProgramIdentity, TeachingUnitIdentity};
use crate::infrastructure::traits::{AdjustmentFilter, AdjustmentRepository, CatalogTranslator};

/// Read side of the overlay engine.
pub struct ContentService {
    repo: Arc<dyn AdjustmentRepository>,
    catalog: Arc<dyn CatalogTranslator>,
}

impl ContentService {
    /// Create a new content service.
    pub fn new(repo: Arc<dyn AdjustmentRepository>, catalog: Arc<dyn CatalogTranslator>) -> Self {
        Self { repo, catalog }
    }

    /// Adjusted direct content of one grouping.
    #[instrument(level = "debug", skip(self))]
    pub fn grouping_content(&self, query: &GetGroupingContent) -> ApplicationResult<GroupingContentView> {
        let program = query.program();
        let content = self
            .catalog
            .get_grouping_content(&program, &query.grouping().code)?;
        let adjusted = self.adjusted_tree(&program, &content)?;
        Ok(GroupingContentView::from(&adjusted))
    }

    /// Whole adjusted program, nested (course enrollment form).
    #[instrument(level = "debug", skip(self))]
    pub fn enrollment_form(&self, query: &GetEnrollmentForm) -> ApplicationResult<FullProgramContentView> {
        let program = query.program();
        let formation = self.catalog.get_formation(&program)?;
        let root = self.adjusted_tree(&program, &formation.root)?;
        Ok(FullProgramContentView {
            program: formation.program,
            title: formation.title,
            full_title: formation.full_title,
            root,
        })
    }

    /// Condensed adjusted program: groupings with their units.
    #[instrument(level = "debug", skip(self))]
    pub fn enrollment_program(&self, query: &GetEnrollmentProgram) -> ApplicationResult<EnrollmentProgramView> {
        let program = query.program();
        let formation = self.catalog.get_formation(&program)?;
        let root = self.adjusted_tree(&program, &formation.root)?;
        Ok(EnrollmentProgramView {
            code: formation.program.code,
            year: formation.program.year,
            full_title: formation.full_title,
            subprogram: vec![EnrollmentGroupingView::from(&root)],
        })
    }

    fn adjusted_tree(
        &self,
        program: &ProgramIdentity,
        root: &GroupingNode,
    ) -> ApplicationResult<AdjustedGrouping> {
        let codes = root.grouping_codes();
        let adjustments: Vec<_> = self
            .repo
            .search(&AdjustmentFilter::program(program))?
            .into_iter()
            .filter(|agg| codes.contains(&agg.grouping().code.as_str()))
            .collect();
        debug!(
            "{} overlay(s) apply below {} in {}",
            adjustments.len(),
            root.code,
            program
        );

        let added: Vec<TeachingUnitIdentity> = adjustments
            .iter()
            .flat_map(|agg| agg.added_identities())
            .collect();
        let added_units = if added.is_empty() {
            Vec::new()
        } else {
            self.catalog.search_units(&added)?
        };

        Ok(merge(root, &adjustments, &added_units)?)
    }
}

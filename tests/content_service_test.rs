//! Tests for ContentService (adjusted views)

use curriculum_overlay::application::commands::{
    AddUnits, GetEnrollmentForm, GetEnrollmentProgram, GetGroupingContent, ModifyUnit,
    ModifyUnits, RemoveUnits,
};
use curriculum_overlay::application::services::{AdjustmentService, ContentService};
use curriculum_overlay::application::views::{ContentElement, ElementKind};
use curriculum_overlay::domain::{
    AdjustmentAggregate, BusinessError, DomainError, ElementRef, GroupingIdentity, ProgramIdentity,
    TeachingUnitIdentity,
};
use curriculum_overlay::infrastructure::InMemoryAdjustmentRepository;
use curriculum_overlay::util::testing::{self, YEAR};
use std::sync::Arc;

fn setup() -> (AdjustmentService, ContentService) {
    testing::init_test_setup();
    let repo = testing::empty_repository();
    let catalog = testing::sample_catalog();
    (
        AdjustmentService::new(repo.clone(), catalog.clone()),
        ContentService::new(repo, catalog),
    )
}

fn grouping_query(program: &str, grouping: &str) -> GetGroupingContent {
    GetGroupingContent {
        year: YEAR,
        grouping_code: grouping.to_string(),
        program_code: program.to_string(),
    }
}

fn add(program: &str, grouping: &str, units: &[&str]) -> AddUnits {
    AddUnits {
        year: YEAR,
        program_code: program.to_string(),
        add_to: grouping.to_string(),
        units: units.iter().map(|u| u.to_string()).collect(),
        insert_after: None,
    }
}

fn codes(elements: &[ContentElement]) -> Vec<&str> {
    elements.iter().map(|e| e.code.as_str()).collect()
}

#[test]
fn given_empty_grouping_when_reading_content_then_title_and_no_elements() {
    let (_, content) = setup();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "MAT2ECGE"))
        .unwrap();

    assert_eq!(view.code, "MAT2ECGE");
    assert_eq!(view.full_title, "Economie et gestion");
    assert!(view.elements.is_empty());
}

#[test]
fn given_no_adjustment_when_reading_content_then_catalog_unit_rendered() {
    let (_, content) = setup();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap();

    assert_eq!(
        view.elements,
        vec![ContentElement {
            kind: ElementKind::Unit,
            code: "LESPO1321".to_string(),
            full_title: "Economic, Political and Social Ethics".to_string(),
            block: "3".to_string(),
            quarter: "Q2".to_string(),
            credits: "3".to_string(),
            volumes: "30".to_string(),
            mandatory: true,
            derogation_session: String::new(),
            added: false,
            modified: false,
        }]
    );
}

#[test]
fn given_added_unit_when_reading_content_then_appended_after_catalog_units() {
    let (adjustments, content) = setup();
    adjustments
        .add_units(&add("LECGE100B", "LECGE100R", &["LSINF1311"]))
        .unwrap();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap();

    assert_eq!(codes(&view.elements), vec!["LESPO1321", "LSINF1311"]);
    let added = &view.elements[1];
    assert!(added.added);
    assert_eq!(added.block, "1");
    assert_eq!(added.full_title, "Human-computer interaction");
    assert_eq!(added.volumes, "30+15");
    assert_eq!(added.credits, "5");
}

#[test]
fn given_removed_unit_when_reading_content_then_unit_is_hidden() {
    let (adjustments, content) = setup();
    adjustments
        .remove_units(&RemoveUnits {
            year: YEAR,
            program_code: "LECGE100B".to_string(),
            remove_from: "LECGE100R".to_string(),
            units: vec!["LESPO1321".to_string()],
        })
        .unwrap();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap();

    assert!(view.elements.is_empty());
}

#[test]
fn given_modified_unit_when_reading_content_then_overridden_block_flagged() {
    let (adjustments, content) = setup();
    adjustments
        .modify_units(&ModifyUnits {
            year: YEAR,
            program_code: "LECGE100B".to_string(),
            adjust_in: "LECGE100R".to_string(),
            units: vec![ModifyUnit {
                code: "LESPO1321".to_string(),
                year: YEAR,
                block: 1,
            }],
        })
        .unwrap();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap();

    assert_eq!(view.elements.len(), 1);
    assert_eq!(view.elements[0].block, "1");
    assert!(view.elements[0].modified);
    assert!(!view.elements[0].added);
}

#[test]
fn given_modified_catalog_unit_when_adding_it_then_rejected_and_listed_once() {
    let (adjustments, content) = setup();
    adjustments
        .modify_units(&ModifyUnits {
            year: YEAR,
            program_code: "LECGE100B".to_string(),
            adjust_in: "LECGE100R".to_string(),
            units: vec![ModifyUnit {
                code: "LESPO1321".to_string(),
                year: YEAR,
                block: 2,
            }],
        })
        .unwrap();

    let err = adjustments
        .add_units(&add("LECGE100B", "LECGE100R", &["LESPO1321"]))
        .unwrap_err();

    assert_eq!(
        err.as_domain().map(DomainError::business_errors),
        Some(&[BusinessError::AlreadyInGrouping(TeachingUnitIdentity::new("LESPO1321", YEAR))][..])
    );
    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap();
    let rows: Vec<_> = view
        .elements
        .iter()
        .map(|e| (e.code.as_str(), e.block.as_str(), e.added, e.modified))
        .collect();
    assert_eq!(rows, vec![("LESPO1321", "2", false, true)]);
}

#[test]
fn given_root_content_when_reading_then_subgroupings_listed_as_rows() {
    let (_, content) = setup();

    let view = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100B"))
        .unwrap();

    assert_eq!(codes(&view.elements), vec!["MAT2ECGE", "LECGE100R"]);
    assert!(view
        .elements
        .iter()
        .all(|e| e.kind == ElementKind::Grouping));
}

#[test]
fn given_adjustments_at_root_and_depth_when_reading_form_then_all_applied() {
    let (adjustments, content) = setup();
    adjustments
        .add_units(&add("LECGE100T", "LECGE100T", &["LINGE1125", "LINGE1122"]))
        .unwrap();
    adjustments
        .add_units(&add("LECGE100T", "LECGE901O", &["LSINF1311"]))
        .unwrap();

    let form = content
        .enrollment_form(&GetEnrollmentForm {
            year: YEAR,
            program_code: "LECGE100T".to_string(),
        })
        .unwrap();

    let root_units: Vec<_> = form.root.units().map(|u| u.unit.code.as_str()).collect();
    assert_eq!(root_units, vec!["LINGE1111", "LINGE1125", "LINGE1122"]);

    let option = form
        .root
        .find_grouping("LECGE901O")
        .expect("nested grouping kept");
    let option_units: Vec<_> = option
        .units()
        .map(|u| (u.unit.code.as_str(), u.added))
        .collect();
    assert_eq!(option_units, vec![("LESPO2236", false), ("LSINF1311", true)]);
    assert_eq!(form.program, ProgramIdentity::new("LECGE100T", YEAR));
}

#[test]
fn given_subgrouping_query_when_overlay_on_parent_then_overlay_not_applied() {
    let (adjustments, content) = setup();
    adjustments
        .add_units(&add("LECGE100T", "LECGE100T", &["LINGE1125"]))
        .unwrap();

    let view = content
        .grouping_content(&grouping_query("LECGE100T", "LECGE900T"))
        .unwrap();

    assert_eq!(codes(&view.elements), vec!["LECGE901O"]);
}

#[test]
fn given_added_unit_when_reading_enrollment_program_then_condensed_view_flags_it() {
    let (adjustments, content) = setup();
    adjustments
        .add_units(&add("LECGE100B", "LECGE100R", &["LSINF1311"]))
        .unwrap();

    let program = content
        .enrollment_program(&GetEnrollmentProgram {
            year: YEAR,
            program_code: "LECGE100B".to_string(),
        })
        .unwrap();

    assert_eq!(program.code, "LECGE100B");
    assert_eq!(program.year, YEAR);
    assert_eq!(program.subprogram.len(), 1);
    let root = &program.subprogram[0];
    assert_eq!(root.code, "LECGE100B");
    let groupings: Vec<_> = root.subprogram.iter().map(|g| g.code.as_str()).collect();
    assert_eq!(groupings, vec!["MAT2ECGE", "LECGE100R"]);
    let units: Vec<_> = root.subprogram[1]
        .units
        .iter()
        .map(|u| (u.code.as_str(), u.block, u.added))
        .collect();
    assert_eq!(units, vec![("LESPO1321", 3, false), ("LSINF1311", 1, true)]);
}

#[test]
fn given_unknown_program_when_reading_form_then_program_not_found() {
    let (_, content) = setup();

    let err = content
        .enrollment_form(&GetEnrollmentForm {
            year: YEAR,
            program_code: "LXXXX100B".to_string(),
        })
        .unwrap_err();

    assert!(err.as_domain().is_some_and(DomainError::is_not_found));
}

#[test]
fn given_added_unit_unknown_to_catalog_when_reading_then_unit_not_found() {
    testing::init_test_setup();
    let mut aggregate = AdjustmentAggregate::new(
        ProgramIdentity::new("LECGE100B", YEAR),
        GroupingIdentity::new("LECGE100R", YEAR),
    );
    aggregate
        .add_units_after(
            &[TeachingUnitIdentity::new("LZZZZ9999", YEAR)],
            Some(&ElementRef::Unit("LESPO1321".to_string())),
        )
        .unwrap();
    let repo = Arc::new(InMemoryAdjustmentRepository::with_aggregates(vec![aggregate]));
    let content = ContentService::new(repo, testing::sample_catalog());

    let err = content
        .grouping_content(&grouping_query("LECGE100B", "LECGE100R"))
        .unwrap_err();

    assert_eq!(
        err.as_domain(),
        Some(&DomainError::UnitNotFound(TeachingUnitIdentity::new(
            "LZZZZ9999",
            YEAR
        )))
    );
}

//! Tests for the adjustment repositories

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use curriculum_overlay::domain::{
    AdjustmentAggregate, AdjustmentKind, ElementRef, GroupingIdentity, ProgramIdentity,
    TeachingUnitIdentity,
};
use curriculum_overlay::infrastructure::traits::{
    AdjustmentFilter, AdjustmentRepository, FileSystem, RealFileSystem,
};
use curriculum_overlay::infrastructure::{InMemoryAdjustmentRepository, TomlAdjustmentRepository};

const YEAR: i32 = 2021;

fn ue(code: &str) -> TeachingUnitIdentity {
    TeachingUnitIdentity::new(code, YEAR)
}

fn program() -> ProgramIdentity {
    ProgramIdentity::new("LECGE100B", YEAR)
}

/// Overlay with one adjustment of each kind.
fn mixed_aggregate(grouping: &str) -> AdjustmentAggregate {
    let mut aggregate =
        AdjustmentAggregate::new(program(), GroupingIdentity::new(grouping, YEAR));
    aggregate
        .add_units_after(
            &[ue("LSINF1311"), ue("LINGE1125")],
            Some(&ElementRef::Unit("LESPO1321".to_string())),
        )
        .unwrap();
    aggregate.remove_units(&[ue("LESPO1113")]).unwrap();
    aggregate.modify_unit_block(&ue("LESPO1321"), 3, 1);
    aggregate.modify_unit_block(&ue("LINGE1125"), 1, 2);
    aggregate
}

fn toml_repo(dir: &TempDir) -> TomlAdjustmentRepository {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    TomlAdjustmentRepository::in_dir(fs, dir.path())
}

#[test]
fn given_saved_aggregate_when_reopening_toml_store_then_aggregate_round_trips() {
    let temp = TempDir::new().unwrap();
    let aggregate = mixed_aggregate("LECGE100R");
    toml_repo(&temp).save(&aggregate).unwrap();

    let reopened = toml_repo(&temp);
    let loaded = reopened
        .find(&program(), aggregate.grouping())
        .unwrap()
        .expect("aggregate persisted");

    assert_eq!(loaded.id(), aggregate.id());
    assert_eq!(loaded.added_units(), aggregate.added_units());
    assert_eq!(loaded.removed_units(), aggregate.removed_units());
    assert_eq!(loaded.modified_units(), aggregate.modified_units());
    assert!(temp.path().join(TomlAdjustmentRepository::FILE_NAME).exists());
}

#[test]
fn given_missing_store_file_when_searching_then_empty() {
    let temp = TempDir::new().unwrap();
    let repo = toml_repo(&temp);

    let found = repo.search(&AdjustmentFilter::program(&program())).unwrap();

    assert!(found.is_empty());
    assert!(!repo.path().exists());
}

#[test]
fn given_saved_aggregate_when_saving_again_then_replaced_not_duplicated() {
    let temp = TempDir::new().unwrap();
    let repo = toml_repo(&temp);
    let mut aggregate = mixed_aggregate("LECGE100R");
    repo.save(&aggregate).unwrap();

    aggregate.cancel_adjustment(AdjustmentKind::Removed, &ue("LESPO1113"));
    repo.save(&aggregate).unwrap();

    let all = repo.search(&AdjustmentFilter::program(&program())).unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].removed_units().is_empty());
}

#[test]
fn given_two_aggregates_when_deleting_many_then_store_is_empty() {
    let temp = TempDir::new().unwrap();
    let repo = toml_repo(&temp);
    let first = mixed_aggregate("LECGE100R");
    let second = mixed_aggregate("MAT2ECGE");
    repo.save(&first).unwrap();
    repo.save(&second).unwrap();

    repo.delete_many(&[first.id(), second.id()]).unwrap();

    assert!(repo.get(&first.id()).unwrap().is_none());
    assert!(repo
        .search(&AdjustmentFilter::program(&program()))
        .unwrap()
        .is_empty());
}

#[test]
fn given_corrupt_store_file_when_loading_then_error_names_the_file() {
    let temp = TempDir::new().unwrap();
    let repo = toml_repo(&temp);
    std::fs::write(repo.path(), "adjustments = 42").unwrap();

    let err = repo
        .search(&AdjustmentFilter::program(&program()))
        .unwrap_err();

    assert!(err.to_string().contains("parse adjustment store"));
}

#[rstest]
#[case::by_program(AdjustmentFilter::program(&program()), 2)]
#[case::by_grouping(
    AdjustmentFilter::program(&program()).grouping(&GroupingIdentity::new("LECGE100R", YEAR)),
    1
)]
#[case::by_added_unit(
    AdjustmentFilter::program(&program()).unit(&ue("LSINF1311"), AdjustmentKind::Added),
    2
)]
#[case::by_kind_mismatch(
    AdjustmentFilter::program(&program()).unit(&ue("LSINF1311"), AdjustmentKind::Removed),
    0
)]
#[case::other_program(AdjustmentFilter::program(&ProgramIdentity::new("LECGE100T", YEAR)), 0)]
fn given_filter_when_searching_in_memory_then_matching_aggregates(
    #[case] filter: AdjustmentFilter,
    #[case] expected: usize,
) {
    let repo = InMemoryAdjustmentRepository::with_aggregates(vec![
        mixed_aggregate("LECGE100R"),
        mixed_aggregate("MAT2ECGE"),
    ]);

    assert_eq!(repo.search(&filter).unwrap().len(), expected);
}

#[test]
fn given_unknown_pair_when_get_or_create_then_new_unsaved_aggregate() {
    let repo = InMemoryAdjustmentRepository::new();
    let grouping = GroupingIdentity::new("LECGE100R", YEAR);

    let aggregate = repo.get_or_create(&program(), &grouping).unwrap();

    assert!(aggregate.is_empty());
    assert_eq!(aggregate.grouping(), &grouping);
    assert!(repo.all().is_empty());
}

#[test]
fn given_saved_aggregate_when_deleting_by_id_then_gone_and_unknown_id_is_noop() {
    let repo = InMemoryAdjustmentRepository::new();
    let aggregate = mixed_aggregate("LECGE100R");
    repo.save(&aggregate).unwrap();

    repo.delete(&aggregate.id()).unwrap();
    repo.delete(&aggregate.id()).unwrap();

    assert!(repo.get(&aggregate.id()).unwrap().is_none());
    assert!(repo.all().is_empty());
}

use std::env;
use std::sync::{Arc, Once};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{
    CatalogUnit, ContentNode, FormationTree, GroupingNode, ProgramIdentity,
};
use crate::infrastructure::{InMemoryAdjustmentRepository, InMemoryCatalog};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

// ============================================================
// Catalog fixtures
// ============================================================

pub const YEAR: i32 = 2021;

/// Unit with credits and volumes, mandatory, no derogation.
pub fn unit(
    code: &str,
    full_title: &str,
    block: u8,
    quarter: &str,
    credits: u32,
    volumes: (f64, f64),
) -> CatalogUnit {
    CatalogUnit {
        code: code.to_string(),
        year: YEAR,
        title: full_title.to_string(),
        full_title: full_title.to_string(),
        block,
        quarter: Some(quarter.to_string()),
        credits_absolute: Some(f64::from(credits)),
        credits_relative: Some(credits),
        volume_annual_pm: Some(volumes.0),
        volume_annual_pp: Some(volumes.1),
        mandatory: true,
        derogation_session: String::new(),
    }
}

pub fn grouping(code: &str, full_title: &str, children: Vec<ContentNode>) -> GroupingNode {
    GroupingNode {
        code: code.to_string(),
        title: full_title.to_string(),
        full_title: full_title.to_string(),
        mandatory: true,
        credits: None,
        remark: None,
        children,
    }
}

pub fn lespo1321() -> CatalogUnit {
    unit("LESPO1321", "Economic, Political and Social Ethics", 3, "Q2", 3, (30.0, 0.0))
}

pub fn lsinf1311() -> CatalogUnit {
    unit("LSINF1311", "Human-computer interaction", 1, "Q1", 5, (30.0, 15.0))
}

/// `LECGE100B` 2021: an empty `MAT2ECGE` and `LECGE100R` holding `LESPO1321`.
pub fn lecge100b() -> FormationTree {
    FormationTree {
        program: ProgramIdentity::new("LECGE100B", YEAR),
        title: "Bachelier en sciences économiques et de gestion".to_string(),
        full_title: "Bachelier en sciences économiques et de gestion".to_string(),
        root: grouping(
            "LECGE100B",
            "Bachelier en sciences économiques et de gestion",
            vec![
                ContentNode::Grouping(grouping("MAT2ECGE", "Economie et gestion", vec![])),
                ContentNode::Grouping(grouping(
                    "LECGE100R",
                    "Formation pluridisciplinaire en sciences humaines",
                    vec![ContentNode::Unit(lespo1321())],
                )),
            ],
        ),
    }
}

/// `LECGE100T` 2021: root with one unit, options nested two levels deep.
pub fn lecge100t() -> FormationTree {
    FormationTree {
        program: ProgramIdentity::new("LECGE100T", YEAR),
        title: "Tronc commun".to_string(),
        full_title: "Tronc commun en sciences économiques".to_string(),
        root: grouping(
            "LECGE100T",
            "Tronc commun en sciences économiques",
            vec![
                ContentNode::Unit(unit(
                    "LINGE1111",
                    "Mathématiques élémentaires",
                    1,
                    "Q1",
                    5,
                    (30.0, 30.0),
                )),
                ContentNode::Grouping(grouping(
                    "LECGE900T",
                    "Options",
                    vec![ContentNode::Grouping(grouping(
                        "LECGE901O",
                        "Option en éthique",
                        vec![ContentNode::Unit(unit(
                            "LESPO2236",
                            "Ethique appliquée",
                            2,
                            "Q1",
                            4,
                            (30.0, 0.0),
                        ))],
                    ))],
                )),
            ],
        ),
    }
}

/// Units known to the catalog outside any formation tree.
pub fn extra_units() -> Vec<CatalogUnit> {
    vec![
        lsinf1311(),
        unit(
            "LESPO1113",
            "Sociologie et anthropologie des mondes contemporains",
            1,
            "Q1",
            5,
            (45.0, 0.0),
        ),
        unit("LINGE1125", "Analyse de données", 1, "Q2", 5, (30.0, 15.0)),
        unit("LINGE1122", "Physique 1", 1, "Q1", 5, (30.0, 30.0)),
    ]
}

pub fn sample_catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::new(
        vec![lecge100b(), lecge100t()],
        extra_units(),
    ))
}

pub fn empty_repository() -> Arc<InMemoryAdjustmentRepository> {
    Arc::new(InMemoryAdjustmentRepository::new())
}

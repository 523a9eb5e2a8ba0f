//! Tests for TaxonomyService session operations

use rstest::{fixture, rstest};

use taxotree::application::{ApplicationError, TaxonomyService, EXAMPLE_SPECIES};
use taxotree::config::{CatalogEntry, DisplayStyle, Settings};
use taxotree::domain::{DisplayOptions, DomainError, InsertOutcome, TaxonLevel, TraversalOrder};

#[fixture]
fn service() -> TaxonomyService {
    taxotree::util::testing::init_test_setup();
    let mut service = TaxonomyService::new();
    service.seed_examples().unwrap();
    service
}

fn path(names: [&str; 5]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn whale_shark() -> CatalogEntry {
    CatalogEntry {
        path: path([
            "Chondrichthyes",
            "Orectolobiformes",
            "Rhincodontidae",
            "Rhincodon",
            "typus",
        ]),
        common_name: "Whale Shark".into(),
        reference_link: "https://en.wikipedia.org/wiki/Whale_shark".into(),
    }
}

// ============================================================
// Session setup
// ============================================================

#[test]
fn given_default_settings_when_building_session_then_examples_are_seeded() {
    let service = TaxonomyService::from_settings(&Settings::default()).unwrap();
    assert_eq!(service.tree().species_count(), EXAMPLE_SPECIES.len());
    assert_eq!(service.tree().len(), 9);
}

#[test]
fn given_catalog_without_seed_when_building_session_then_only_catalog_loaded() {
    let settings = Settings {
        seed_examples: false,
        catalog: vec![whale_shark()],
        ..Settings::default()
    };
    let service = TaxonomyService::from_settings(&settings).unwrap();

    assert_eq!(service.tree().len(), 5);
    assert_eq!(service.find("whale shark").unwrap().name, "typus");
}

#[test]
fn given_catalog_with_foreign_class_when_building_session_then_reports_entry() {
    let mut foreign = whale_shark();
    foreign.path[0] = "Actinopterygii".into();
    let settings = Settings {
        catalog: vec![whale_shark(), foreign],
        ..Settings::default()
    };

    let err = TaxonomyService::from_settings(&settings).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Catalog {
            index: 1,
            source: DomainError::ClassMismatch { .. }
        }
    ));
}

// ============================================================
// Operations
// ============================================================

#[rstest]
fn given_common_name_when_finding_then_returns_lineage(service: TaxonomyService) {
    let found = service.find("great white shark").unwrap();

    assert_eq!(found.level, TaxonLevel::Species);
    assert_eq!(
        found.lineage_display(),
        "Chondrichthyes > Lamniformes > Lamnidae > Carcharodon > carcharias"
    );
    assert_eq!(
        found.reference_link(),
        Some("https://en.wikipedia.org/wiki/Great_white_shark")
    );
}

#[rstest]
#[case("Chondrichthyes", 2)]
#[case("Lamnidae", 1)]
#[case("Tiger Shark", 0)]
fn given_node_when_finding_then_reports_child_count(
    service: TaxonomyService,
    #[case] query: &str,
    #[case] expected: usize,
) {
    assert_eq!(service.find(query).unwrap().children, expected);
}

#[rstest]
fn given_unknown_query_when_finding_then_not_found(service: TaxonomyService) {
    let err = service.find("Megalodon").unwrap_err();
    assert!(matches!(err, ApplicationError::Domain(DomainError::NotFound(_))));
}

#[rstest]
fn given_new_species_when_adding_then_created(mut service: TaxonomyService) {
    let entry = whale_shark();
    let outcome = service
        .add_species(&entry.path, &entry.common_name, &entry.reference_link)
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Created { new_nodes: 4, .. }));
    assert_eq!(service.tree().species_count(), 3);
}

#[rstest]
fn given_query_when_updating_then_snapshot_reflects_change(mut service: TaxonomyService) {
    let updated = service
        .update_species("Tiger Shark", "Tiger", "")
        .unwrap();

    assert_eq!(updated.name, "cuvier");
    assert_eq!(updated.common_name, "Tiger");
    assert_eq!(updated.reference_link(), None);
}

#[rstest]
fn given_genus_when_deleting_then_refused_before_touching_tree(mut service: TaxonomyService) {
    let err = service.delete_species("Carcharodon").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotSpeciesLevel {
            level: TaxonLevel::Genus,
            ..
        })
    ));
    assert_eq!(service.tree().len(), 9);
}

#[rstest]
fn given_species_when_deleting_then_removed(mut service: TaxonomyService) {
    let removed = service.delete_species("tiger shark").unwrap();

    assert_eq!(removed.name(), "cuvier");
    assert!(service.find("Tiger Shark").is_err());
    assert!(service.find("Galeocerdo").is_ok());
}

#[rstest]
fn given_styles_when_rendering_then_both_show_species(service: TaxonomyService) {
    let options = DisplayOptions::default();
    let indented = service.render(DisplayStyle::Indented, options);
    let boxed = service.render(DisplayStyle::Boxed, options);

    assert!(indented.contains("  |--(Order) Lamniformes"));
    assert!(indented.contains("(Species) cuvier [Tiger Shark] (link)"));
    assert!(boxed.contains("(Species) cuvier [Tiger Shark] (link)"));
}

#[test]
fn given_empty_session_when_rendering_then_empty() {
    let service = TaxonomyService::new();
    let options = DisplayOptions::default();
    assert!(service.render(DisplayStyle::Boxed, options).is_empty());
    assert!(service.render(DisplayStyle::Indented, options).is_empty());
}

#[rstest]
fn given_level_order_when_traversing_then_class_first_species_last(service: TaxonomyService) {
    let nodes = service.traverse(TraversalOrder::Level).unwrap();
    let levels: Vec<TaxonLevel> = nodes.iter().map(|node| node.level).collect();

    assert_eq!(levels.first(), Some(&TaxonLevel::Class));
    assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(nodes.last().unwrap().name, "cuvier");
}

#[rstest]
fn given_session_when_closing_then_releases_all_nodes(service: TaxonomyService) {
    assert_eq!(service.close(), 9);
}

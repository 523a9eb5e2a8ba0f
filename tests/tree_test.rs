//! Tests for TaxonomyTree insertion, search, update, deletion and teardown

use rstest::{fixture, rstest};

use taxotree::domain::{
    DomainError, InsertOutcome, NodeId, TaxonLevel, TaxonomyTree, TraversalOrder,
};

const GREAT_WHITE: [&str; 5] = [
    "Chondrichthyes",
    "Lamniformes",
    "Lamnidae",
    "Carcharodon",
    "carcharias",
];
const TIGER: [&str; 5] = [
    "Chondrichthyes",
    "Carcharhiniformes",
    "Carcharhinidae",
    "Galeocerdo",
    "cuvier",
];

#[fixture]
fn sharks() -> TaxonomyTree {
    taxotree::util::testing::init_test_setup();
    let mut tree = TaxonomyTree::new();
    tree.insert_path(&GREAT_WHITE, "Great White Shark", "")
        .unwrap();
    tree.insert_path(&TIGER, "Tiger Shark", "").unwrap();
    tree
}

fn name_of(tree: &TaxonomyTree, id: NodeId) -> &str {
    tree.get(id).unwrap().name()
}

fn children_of<'a>(tree: &'a TaxonomyTree, id: NodeId) -> Vec<&'a str> {
    tree.get(id)
        .unwrap()
        .children()
        .iter()
        .map(|&child| name_of(tree, child))
        .collect()
}

// ============================================================
// End-to-end scenario
// ============================================================

#[rstest]
fn given_two_sharks_when_built_then_root_has_two_singleton_chains(sharks: TaxonomyTree) {
    let root = sharks.root().unwrap();
    assert_eq!(name_of(&sharks, root), "Chondrichthyes");
    assert_eq!(sharks.get(root).unwrap().level(), TaxonLevel::Class);
    assert_eq!(
        children_of(&sharks, root),
        vec!["Lamniformes", "Carcharhiniformes"]
    );

    for &order in sharks.get(root).unwrap().children() {
        let mut current = order;
        for level in [TaxonLevel::Order, TaxonLevel::Family, TaxonLevel::Genus] {
            let node = sharks.get(current).unwrap();
            assert_eq!(node.level(), level);
            assert_eq!(node.children().len(), 1);
            current = node.children()[0];
        }
        assert_eq!(sharks.get(current).unwrap().level(), TaxonLevel::Species);
    }
}

#[rstest]
fn given_two_sharks_when_deleting_tiger_shark_then_only_that_leaf_goes(mut sharks: TaxonomyTree) {
    let cuvier = sharks.search("Tiger Shark").unwrap();
    assert_eq!(name_of(&sharks, cuvier), "cuvier");

    let removed = sharks.delete_species("Tiger Shark").unwrap().unwrap();
    assert_eq!(removed.name(), "cuvier");

    let galeocerdo = sharks.search("Galeocerdo").unwrap();
    assert!(sharks.get(galeocerdo).unwrap().children().is_empty());
    assert!(sharks.search("Carcharhinidae").is_some());
    assert!(sharks.search("Carcharhiniformes").is_some());
    assert!(sharks.search("cuvier").is_none());

    let carcharias = sharks.search("Great White Shark").unwrap();
    let lineage: Vec<&str> = sharks
        .lineage(carcharias)
        .unwrap()
        .into_iter()
        .map(|id| name_of(&sharks, id))
        .collect();
    assert_eq!(lineage, GREAT_WHITE.to_vec());
    assert_eq!(sharks.len(), 8);
}

// ============================================================
// Insertion
// ============================================================

#[rstest]
fn given_same_path_twice_when_inserting_then_no_duplicate_siblings(mut sharks: TaxonomyTree) {
    let before = sharks.len();
    let outcome = sharks
        .insert_path(&GREAT_WHITE, "White Pointer", "https://example.org/white-pointer")
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::Updated { .. }));
    assert_eq!(sharks.len(), before);
    let species = sharks.get(outcome.species()).unwrap();
    assert_eq!(species.common_name(), "White Pointer");
    assert_eq!(species.reference_link(), "https://example.org/white-pointer");
}

#[rstest]
#[case(["Chondrichthyes", "Lamniformes", "Lamnidae", "Isurus", "oxyrinchus"], 2)]
#[case(["Chondrichthyes", "Lamniformes", "Alopiidae", "Alopias", "vulpinus"], 3)]
#[case(["Chondrichthyes", "Orectolobiformes", "Rhincodontidae", "Rhincodon", "typus"], 4)]
fn given_shared_prefix_when_inserting_then_branches_at_first_difference(
    mut sharks: TaxonomyTree,
    #[case] path: [&str; 5],
    #[case] new_nodes: usize,
) {
    let before = sharks.len();
    let outcome = sharks.insert_path(&path, "x", "").unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::Created {
            species: outcome.species(),
            new_nodes
        }
    );
    assert_eq!(sharks.len(), before + new_nodes);
}

#[rstest]
fn given_different_class_when_inserting_then_tree_unchanged(mut sharks: TaxonomyTree) {
    let before = sharks.display();
    let path = ["Mammalia", "Cetacea", "Balaenopteridae", "Balaenoptera", "musculus"];

    let err = sharks.insert_path(&path, "Blue Whale", "").unwrap_err();

    assert!(matches!(err, DomainError::ClassMismatch { .. }));
    assert_eq!(sharks.display(), before);
}

#[rstest]
fn given_root_in_other_case_when_inserting_then_accepted(mut sharks: TaxonomyTree) {
    let path = ["chondrichthyes", "Lamniformes", "Lamnidae", "Isurus", "paucus"];
    assert!(sharks.insert_path(&path, "Longfin Mako", "").is_ok());
    assert_eq!(name_of(&sharks, sharks.root().unwrap()), "Chondrichthyes");
}

// ============================================================
// Search
// ============================================================

#[rstest]
#[case("GREAT white shark", "carcharias")]
#[case("CARCHARIAS", "carcharias")]
#[case("tiger shark", "cuvier")]
#[case("lamnidae", "Lamnidae")]
fn given_any_case_when_searching_then_finds_node(
    sharks: TaxonomyTree,
    #[case] query: &str,
    #[case] expected: &str,
) {
    let id = sharks.search(query).unwrap();
    assert_eq!(name_of(&sharks, id), expected);
}

#[rstest]
fn given_unknown_query_when_searching_then_not_found(sharks: TaxonomyTree) {
    assert!(sharks.search("Megalodon").is_none());
    assert!(TaxonomyTree::new().search("Great White Shark").is_none());
}

#[test]
fn given_name_and_common_name_collision_when_searching_then_preorder_first_wins() {
    let mut tree = TaxonomyTree::new();
    tree.insert_path(&["C", "O", "F", "G", "alpha"], "Mako", "").unwrap();
    tree.insert_path(&["C", "O", "F", "Mako", "beta"], "", "").unwrap();

    let id = tree.search("mako").unwrap();
    assert_eq!(tree.get(id).unwrap().name(), "alpha");
}

// ============================================================
// Update
// ============================================================

#[rstest]
fn given_species_when_updating_then_overwrites_fields(mut sharks: TaxonomyTree) {
    let id = sharks.search("cuvier").unwrap();
    sharks
        .update_species(id, "Tiger", "https://en.wikipedia.org/wiki/Tiger_shark")
        .unwrap();

    let node = sharks.get(id).unwrap();
    assert_eq!(node.common_name(), "Tiger");
    assert!(node.has_reference_link());
    assert_eq!(sharks.search("Tiger Shark"), None);
}

#[rstest]
fn given_order_when_updating_then_not_species_level(mut sharks: TaxonomyTree) {
    let id = sharks.search("Lamniformes").unwrap();
    let err = sharks.update_species(id, "Mackerel sharks", "").unwrap_err();
    assert_eq!(
        err,
        DomainError::NotSpeciesLevel {
            name: "Lamniformes".into(),
            level: TaxonLevel::Order
        }
    );
    assert_eq!(sharks.get(id).unwrap().common_name(), "");
}

// ============================================================
// Deletion
// ============================================================

#[rstest]
fn given_sibling_species_when_deleting_one_then_other_stays(mut sharks: TaxonomyTree) {
    let path = ["Chondrichthyes", "Lamniformes", "Lamnidae", "Carcharodon", "hubbelli"];
    sharks.insert_path(&path, "Hubbell's White Shark", "").unwrap();

    sharks.delete_species("carcharias").unwrap().unwrap();

    let genus = sharks.search("Carcharodon").unwrap();
    assert_eq!(children_of(&sharks, genus), vec!["hubbelli"]);
}

#[rstest]
#[case("Chondrichthyes")]
#[case("Lamnidae")]
#[case("Galeocerdo")]
fn given_interior_name_when_deleting_then_nothing_removed(
    mut sharks: TaxonomyTree,
    #[case] query: &str,
) {
    assert!(sharks.delete_species(query).unwrap().is_none());
    assert_eq!(sharks.len(), 9);
}

#[rstest]
fn given_unknown_species_when_deleting_then_none(mut sharks: TaxonomyTree) {
    assert!(sharks.delete_species("Megalodon").unwrap().is_none());
    assert!(TaxonomyTree::new().delete_species("x").unwrap().is_none());
}

#[test]
fn given_genus_sharing_common_name_when_deleting_then_only_species_matches() {
    let mut tree = TaxonomyTree::new();
    tree.insert_path(&["C", "O", "F", "Tiger", "a"], "", "").unwrap();
    tree.insert_path(&["C", "O", "F", "G", "b"], "Tiger", "").unwrap();

    let removed = tree.delete_species("tiger").unwrap().unwrap();
    assert_eq!(removed.name(), "b");
    assert!(tree.search("a").is_some());
}

// ============================================================
// Traversal and teardown
// ============================================================

#[rstest]
fn given_tree_when_traversing_then_each_order_visits_every_node(sharks: TaxonomyTree) {
    for order in [TraversalOrder::Pre, TraversalOrder::Post, TraversalOrder::Level] {
        assert_eq!(sharks.traverse(order).len(), sharks.len());
    }
    let post = sharks.traverse(TraversalOrder::Post);
    assert_eq!(post.last().copied(), sharks.root());
}

#[rstest]
fn given_tree_when_destroying_then_releases_all_nodes(sharks: TaxonomyTree) {
    let total = sharks.len();
    assert_eq!(sharks.destroy(), total);
}

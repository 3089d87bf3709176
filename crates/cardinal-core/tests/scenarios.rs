//! Known content models with hand-derived classifications.
//!
//! Each test spells out the expected `(required, collection)` flags for every
//! particle, so any change in graph construction or cut-set detection that
//! shifts a classification is caught here.

use cardinal_core::{
    AnalysisConfig, Cardinality, ConnectedComponent, CutSetStrategy, Expression, Graph, parse,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn analyse(model: &str) -> Graph<String> {
    let body = parse(model).unwrap_or_else(|e| panic!("{model:?}: {e}"));
    Graph::new(body)
}

fn analyse_with(model: &str, cut_set: CutSetStrategy) -> Graph<String> {
    let body = parse(model).unwrap_or_else(|e| panic!("{model:?}: {e}"));
    let config = AnalysisConfig {
        cut_set,
        max_positions: None,
    };
    Graph::with_config(body, &config).unwrap_or_else(|e| panic!("{e}"))
}

/// Sorted labels of every particle component, with their flags.
fn summary(graph: &Graph<String>) -> Vec<(Vec<String>, bool, bool)> {
    let mut out: Vec<(Vec<String>, bool, bool)> = graph
        .particle_components()
        .map(|cc| {
            let mut labels: Vec<String> = graph.labels(cc).cloned().collect();
            labels.sort();
            (labels, cc.is_required(), cc.is_collection())
        })
        .collect();
    out.sort();
    out
}

fn names(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Basic scenarios
// ---------------------------------------------------------------------------

#[test]
fn single_mandatory_atom() {
    let graph = analyse("a");
    assert_eq!(summary(&graph), vec![(names(&["a"]), true, false)]);
}

#[test]
fn optional_atom() {
    let graph = analyse("a?");
    assert_eq!(summary(&graph), vec![(names(&["a"]), false, false)]);

    // Source reaches both `a` and the sink directly.
    let successors: Vec<_> = graph.successors(graph.source()).collect();
    assert_eq!(successors.len(), 2);
    assert!(successors.contains(&graph.sink()));
}

#[test]
fn repeated_atom() {
    let graph = analyse("a+");
    assert_eq!(summary(&graph), vec![(names(&["a"]), true, true)]);

    let a = graph.position_of(&"a".to_string()).unwrap_or_else(|| panic!("a interned"));
    assert!(graph.position(a).is_some_and(|p| p.has_self_loop()));
}

#[test]
fn choice_of_two_atoms() {
    // Neither branch alone is a cut-set even though their union is.
    let graph = analyse("a | b");
    assert_eq!(
        summary(&graph),
        vec![(names(&["a"]), false, false), (names(&["b"]), false, false)]
    );
}

#[test]
fn repeated_pair_forms_one_cycle() {
    let graph = analyse("(a, b)+");
    assert_eq!(summary(&graph), vec![(names(&["a", "b"]), true, true)]);
}

// ---------------------------------------------------------------------------
// Larger content models
// ---------------------------------------------------------------------------

#[test]
fn typical_record_type() {
    // id, name, alias*, (email | phone)+, note?
    let graph = analyse("id, name, alias*, (email | phone)+, note?");

    assert_eq!(
        summary(&graph),
        vec![
            (names(&["alias"]), false, true),
            (names(&["email", "phone"]), true, true),
            (names(&["id"]), true, false),
            (names(&["name"]), true, false),
            (names(&["note"]), false, false),
        ]
    );
}

#[test]
fn optional_repeated_group_with_inner_optional() {
    let graph = analyse("(key, value?)*");
    assert_eq!(summary(&graph), vec![(names(&["key", "value"]), false, true)]);
}

#[test]
fn same_particle_in_both_branches_is_required() {
    // (a, b) | (a, c): every path passes through `a`.
    let graph = analyse("(a, b) | (a, c)");
    assert_eq!(
        summary(&graph),
        vec![
            (names(&["a"]), true, false),
            (names(&["b"]), false, false),
            (names(&["c"]), false, false),
        ]
    );
}

#[test]
fn particle_repeated_at_distance_drags_middle_into_cycle() {
    let graph = analyse("a, b, c, a");
    assert_eq!(summary(&graph), vec![(names(&["a", "b", "c"]), true, true)]);
}

#[test]
fn nested_repetition_collapses_into_outer_cycle() {
    // (a+, b)+: a's self-loop sits inside the outer a ⇄ b cycle.
    let graph = analyse("(a+, b)+");
    assert_eq!(summary(&graph), vec![(names(&["a", "b"]), true, true)]);
}

#[test]
fn nullable_body_of_one_or_more() {
    // (a?)+ is equivalent to a*.
    let graph = analyse("(a?)+, b");
    assert_eq!(
        summary(&graph),
        vec![(names(&["a"]), false, true), (names(&["b"]), true, false)]
    );
}

#[test]
fn empty_model_has_no_particle_components() {
    let graph = analyse("()");
    assert!(graph.particle_components().next().is_none());
    assert!(graph.to_string().is_empty());
}

#[test]
fn choice_with_epsilon_branch_is_optional() {
    let graph = analyse("head, (a | ())");
    assert_eq!(
        summary(&graph),
        vec![(names(&["a"]), false, false), (names(&["head"]), true, false)]
    );
}

// ---------------------------------------------------------------------------
// Long content models
// ---------------------------------------------------------------------------

#[test]
fn fifty_thousand_particle_sequence() {
    let body = Expression::sequence_of((0..50_000).map(|i| Expression::atom(format!("p{i}"))));
    let config = AnalysisConfig {
        cut_set: CutSetStrategy::Dominators,
        max_positions: None,
    };
    let graph = Graph::with_config(body, &config).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(graph.position_count(), 50_002);
    assert_eq!(graph.edge_count(), 50_001);
    assert_eq!(graph.particle_components().count(), 50_000);
    assert!(
        graph
            .particle_components()
            .all(|cc| cc.is_required() && !cc.is_collection())
    );
}

#[test]
fn long_written_model_under_default_strategy() {
    let model: Vec<String> = (0..10_000)
        .map(|i| if i % 2 == 0 { format!("p{i}") } else { format!("p{i}?") })
        .collect();
    let graph = analyse(&model.join(", "));

    let required = |name: &str| {
        graph
            .component_of_label(&name.to_string())
            .map(ConnectedComponent::is_required)
    };

    assert_eq!(graph.particle_components().count(), 10_000);
    assert_eq!(required("p0"), Some(true));
    assert_eq!(required("p1"), Some(false));
    assert_eq!(required("p9998"), Some(true));
    assert_eq!(required("p9999"), Some(false));
}

// ---------------------------------------------------------------------------
// Graph-wide invariants on a fixed model
// ---------------------------------------------------------------------------

#[test]
fn sink_component_is_required_and_singular() {
    let graph = analyse("(a | b)*, c?");
    let cc = graph
        .component_of(graph.sink())
        .unwrap_or_else(|| panic!("sink must be assigned"));

    assert_eq!(cc.members(), &[graph.sink()]);
    assert!(cc.is_required());
    assert!(!cc.is_collection());
}

#[test]
fn components_partition_all_positions() {
    let graph = analyse("x, (a, b?)+, (c | d | e)*, f");
    let mut seen: Vec<_> = graph
        .components()
        .iter()
        .flat_map(ConnectedComponent::iter)
        .collect();
    seen.sort_unstable();

    let mut all: Vec<_> = graph.positions().map(|(id, _)| id).collect();
    all.sort_unstable();

    assert_eq!(seen, all);
}

#[test]
fn strategies_agree_on_fixed_models() {
    for model in [
        "a",
        "a?",
        "a+",
        "a | b",
        "(a, b)+",
        "id, name, alias*, (email | phone)+, note?",
        "(a, b) | (a, c)",
        "x, (y | (z, w)+)?, v",
    ] {
        let by_reach = summary(&analyse_with(model, CutSetStrategy::Reachability));
        let by_dom = summary(&analyse_with(model, CutSetStrategy::Dominators));
        assert_eq!(by_reach, by_dom, "strategies disagree on {model:?}");
    }
}

#[test]
fn cardinality_reflects_flags() {
    let graph = analyse("one, opt?, many+, any*");
    let card = |name: &str| {
        graph
            .component_of_label(&name.to_string())
            .map(ConnectedComponent::cardinality)
    };

    assert_eq!(card("one"), Some(Cardinality::One));
    assert_eq!(card("opt"), Some(Cardinality::ZeroOrOne));
    assert_eq!(card("many"), Some(Cardinality::OneOrMore));
    assert_eq!(card("any"), Some(Cardinality::ZeroOrMore));
}

#[test]
fn labels_can_be_any_hashable_type() {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Particle {
        namespace: &'static str,
        local: &'static str,
    }

    let item = Particle {
        namespace: "urn:a",
        local: "item",
    };
    let body = Expression::one_or_more(Expression::atom(item.clone()));
    let graph = Graph::new(body);

    let cc = graph
        .component_of_label(&item)
        .unwrap_or_else(|| panic!("item interned"));
    assert!(cc.is_collection());
    assert_eq!(graph.labels(cc).next().map(|p| p.local), Some("item"));
}

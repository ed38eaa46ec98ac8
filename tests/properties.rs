//! Property tests: hash placement, reducer monotonicity and determinism,
//! membership-edge construction

use std::collections::BTreeSet;

use leet_compass::graph::layout::hash_to_position;
use leet_compass::graph::{
    ids, reduce, FilterState, GraphBuilder, GraphOverlay, GraphStore, NodeKind, PatternGraph,
};
use leet_compass::{Company, Dataset, Difficulty, Pattern, Problem, Subpattern};
use proptest::prelude::*;

const PATTERN_SLUGS: [&str; 3] = ["arrays", "graphs", "database"];
const SUB_POOL: [&str; 5] = ["window", "bfs", "dfs", "joins", "prefix"];
const NAMES: [&str; 4] = ["Two Sum", "Course Schedule", "Number of Islands", "Rank Scores"];

// =============================================================================
// STRATEGIES
// =============================================================================

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

fn arb_problem_shape() -> impl Strategy<Value = (Difficulty, usize, Vec<&'static str>)> {
    let mut tags = SUB_POOL.to_vec();
    tags.push("ghost");
    let max = tags.len();
    (
        arb_difficulty(),
        0..NAMES.len(),
        prop::sample::subsequence(tags, 0..=max),
    )
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    let subs = prop::sample::subsequence(SUB_POOL.to_vec(), 0..=SUB_POOL.len());
    let ids: Vec<u32> = (1..=12).collect();
    (
        prop::collection::vec(subs, PATTERN_SLUGS.len()),
        prop::collection::vec(arb_problem_shape(), 0..12),
        prop::sample::subsequence(ids.clone(), 0..=ids.len()),
        prop::sample::subsequence(ids.clone(), 0..=ids.len()),
    )
        .prop_map(|(pattern_subs, shapes, company_ids, collection_ids)| {
            let patterns = PATTERN_SLUGS
                .iter()
                .zip(pattern_subs)
                .map(|(slug, subs)| {
                    subs.into_iter().fold(Pattern::new(*slug, *slug), |p, sub| {
                        p.with_subpattern(Subpattern::new(sub, sub))
                    })
                })
                .collect();
            let problems = shapes
                .into_iter()
                .enumerate()
                .map(|(i, (difficulty, name, tags))| {
                    let id = i as u32 + 1;
                    tags.into_iter().fold(
                        Problem::new(id, format!("slug-{}", id), NAMES[name], difficulty),
                        |p, tag| p.with_pattern(tag),
                    )
                })
                .collect();

            let mut dataset = Dataset::new(patterns, problems);
            dataset.companies.push(Company::new("Acme", company_ids));
            dataset
                .collections
                .insert("Starter".to_string(), collection_ids.into_iter().collect());
            dataset
        })
}

fn arb_token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "parent:arrays",
        "parent:graphs",
        "parent:database",
        "parent:missing",
        "window",
        "bfs",
        "joins",
        "missing",
    ])
}

fn arb_search() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["1", "2", "sum", "ISLAND", "zzz"])
}

fn arb_company() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Acme", "Initech"])
}

fn arb_collection() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Starter", "Unknown"])
}

fn arb_hover() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "arrays",
        "graphs",
        "database",
        "arrays/window",
        "graphs/bfs",
        "problem-1",
        "problem-3",
        "not-a-node",
    ])
}

fn build(dataset: &Dataset) -> PatternGraph {
    GraphBuilder::default()
        .build(dataset)
        .expect("generated datasets have unique ids")
}

fn visible(overlay: &GraphOverlay) -> BTreeSet<String> {
    overlay
        .nodes
        .iter()
        .filter(|n| !n.hidden)
        .map(|n| n.id.clone())
        .collect()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn hash_placement_deterministic_and_in_range(s in ".{0,40}", scale in 1u32..5000) {
        let first = hash_to_position(&s, scale);
        let second = hash_to_position(&s, scale);
        prop_assert_eq!(first, second);
        prop_assert!(first.0 < scale);
        prop_assert!(first.1 < scale);
    }

    #[test]
    fn narrowing_difficulties_never_grows_visible_set(
        dataset in arb_dataset(),
        keep in prop::sample::subsequence(Difficulty::ALL.to_vec(), 0..=3),
    ) {
        let graph = build(&dataset);
        let wide = visible(&reduce(&graph, &FilterState::default()));
        let narrow = visible(&reduce(&graph, &FilterState::default().with_difficulties(keep)));
        prop_assert!(narrow.is_subset(&wide));
    }

    #[test]
    fn narrowing_single_dimension_never_grows_visible_set(
        dataset in arb_dataset(),
        token in arb_token(),
        search in arb_search(),
        company in arb_company(),
        collection in arb_collection(),
    ) {
        let graph = build(&dataset);
        let base = FilterState::default();
        let wide = visible(&reduce(&graph, &base));

        let narrowed = [
            base.clone().with_pattern(token),
            base.clone().with_search(search),
            base.clone().with_company(company),
            base.clone().with_collection(collection),
            base.clone().with_show_patterns(false),
        ];
        for filter in &narrowed {
            let narrow = visible(&reduce(&graph, filter));
            prop_assert!(narrow.is_subset(&wide), "filter {:?} grew the visible set", filter);
        }
    }

    #[test]
    fn reducer_is_idempotent(
        dataset in arb_dataset(),
        token in arb_token(),
        hover in arb_hover(),
        show in any::<bool>(),
    ) {
        let graph = build(&dataset);
        let filter = FilterState::default()
            .with_pattern(token)
            .with_show_patterns(show)
            .with_hover(hover);
        let first = reduce(&graph, &filter);
        let second = reduce(&graph, &filter);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn hover_never_changes_visibility(
        dataset in arb_dataset(),
        token in arb_token(),
        hover in arb_hover(),
    ) {
        let graph = build(&dataset);
        let filter = FilterState::default().with_pattern(token);
        let plain = reduce(&graph, &filter);
        let hovered = reduce(&graph, &filter.clone().with_hover(hover));
        prop_assert_eq!(visible(&plain), visible(&hovered));
        prop_assert_eq!(plain.visible_problems, hovered.visible_problems);
    }

    #[test]
    fn edges_hidden_iff_an_endpoint_is_hidden(
        dataset in arb_dataset(),
        token in arb_token(),
        search in arb_search(),
    ) {
        let graph = build(&dataset);
        let overlay = reduce(&graph, &FilterState::default().with_pattern(token).with_search(search));
        for (edge, edge_overlay) in graph.model.edges().iter().zip(&overlay.edges) {
            let expected = overlay.nodes[edge.source].hidden || overlay.nodes[edge.target].hidden;
            prop_assert_eq!(edge_overlay.hidden, expected);
        }
    }

    #[test]
    fn membership_edge_iff_slug_resolves(dataset in arb_dataset()) {
        let graph = build(&dataset);
        let sub_nodes: Vec<&str> = graph
            .model
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Subpattern)
            .map(|n| n.id.as_str())
            .collect();

        for problem in &dataset.problems {
            let problem_node = ids::problem_id(problem.id);
            for &sub_node in &sub_nodes {
                let (_, sub_slug) = sub_node.split_once('/').unwrap();
                let expected = problem.patterns.iter().any(|p| p == sub_slug)
                    && graph.patterns.resolve(sub_slug) == Some(sub_node);
                prop_assert_eq!(
                    graph.model.has_edge(&problem_node, sub_node),
                    expected,
                    "{} -- {}",
                    problem_node,
                    sub_node
                );
            }
        }
    }
}

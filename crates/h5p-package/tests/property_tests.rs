use std::collections::HashMap;

use h5p_package::{DependencyGraph, Error, LibraryId, LibraryRecord, resolve};
use proptest::prelude::*;

/// Random DAG: `names[i]` may only depend on `names[j]` with `j < i`. The
/// names are shuffled so index order and identifier order are unrelated.
fn arb_dag() -> impl Strategy<Value = (Vec<String>, Vec<(usize, usize)>)> {
    (1usize..14).prop_flat_map(|n| {
        let names = Just((0..n).map(|i| format!("Lib{i:02}")).collect::<Vec<_>>()).prop_shuffle();
        let edges = prop::collection::vec((0..n, 0..n), 0..(n * 2))
            .prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .collect::<Vec<_>>()
            });
        (names, edges)
    })
}

fn build(names: &[String], edges: &[(usize, usize)]) -> DependencyGraph {
    let ids: Vec<LibraryId> = names
        .iter()
        .map(|n| LibraryId::new(n.as_str(), 1, 0).unwrap())
        .collect();
    let mut deps: HashMap<usize, Vec<LibraryId>> = HashMap::new();
    for &(dep, lib) in edges {
        deps.entry(lib).or_default().push(ids[dep].clone());
    }

    let mut graph = DependencyGraph::new();
    for (i, id) in ids.iter().enumerate() {
        graph.insert(LibraryRecord::new(
            id.clone(),
            vec![],
            vec![],
            deps.remove(&i).unwrap_or_default(),
        ));
    }
    graph
}

proptest! {
    #[test]
    fn resolved_order_satisfies_every_edge((names, edges) in arb_dag()) {
        let graph = build(&names, &edges);
        let order = resolve(&graph).unwrap();

        prop_assert_eq!(order.len(), graph.len());
        let index: HashMap<&LibraryId, usize> =
            order.iter().enumerate().map(|(i, id)| (id, i)).collect();
        prop_assert_eq!(index.len(), order.len());
        for (dep, lib) in graph.edges() {
            prop_assert!(index[dep] < index[lib]);
        }
    }

    #[test]
    fn any_back_edge_is_reported_as_cycle(
        (names, edges) in arb_dag().prop_filter("needs an edge", |(_, e)| !e.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let (dep, lib) = edges[pick.index(edges.len())];
        let mut with_cycle = edges.clone();
        with_cycle.push((lib, dep));

        let graph = build(&names, &with_cycle);
        match resolve(&graph) {
            Err(Error::CyclicDependency { cycle }) => {
                prop_assert!(!cycle.is_empty());
                for (i, member) in cycle.iter().enumerate() {
                    let next = &cycle[(i + 1) % cycle.len()];
                    prop_assert!(graph.dependencies_of(next).contains(member));
                }
            }
            other => prop_assert!(false, "expected cycle, got {:?}", other),
        }
    }
}

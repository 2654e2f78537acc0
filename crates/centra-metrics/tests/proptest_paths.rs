use std::collections::HashMap;

use centra_core::{NodeId, SocialGraph};
use centra_metrics::betweenness::betweenness_centrality;
use centra_metrics::closeness::closeness_centrality;
use centra_metrics::paths::shortest_paths_from;
use petgraph::algo::dijkstra;
use proptest::prelude::*;

fn arb_friendships() -> impl Strategy<Value = SocialGraph> {
    (1_u32..10).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..25).prop_map(move |raw| {
            let edges: Vec<(NodeId, NodeId)> = raw
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (NodeId(a), NodeId(b)))
                .collect();
            SocialGraph::new((0..n).map(|i| (NodeId(i), format!("u{i}"))), &edges, &[])
                .expect("valid graph")
        })
    })
}

/// Hop distances from `source` computed by petgraph over the same edges.
fn reference_distances(graph: &SocialGraph, source: NodeId) -> HashMap<NodeId, usize> {
    let g = graph.friendship_graph();
    let start = g
        .node_indices()
        .find(|&idx| g[idx] == source)
        .expect("source is in the petgraph view");
    dijkstra(&g, start, None, |_| 1_usize)
        .into_iter()
        .map(|(idx, d)| (g[idx], d))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn paths_are_minimal_and_equal_length(graph in arb_friendships()) {
        for source in graph.ids() {
            let sp = shortest_paths_from(&graph, source).expect("source exists");
            let reference = reference_distances(&graph, source);

            prop_assert_eq!(sp.len(), reference.len());
            prop_assert_eq!(sp.paths_to(source), Some(&[Vec::new()][..]));

            for (target, paths) in sp.iter() {
                let want = reference[&target];
                prop_assert!(!paths.is_empty());
                for path in paths {
                    prop_assert_eq!(path.len(), want);
                    prop_assert_eq!(path.last().copied().unwrap_or(source), target);
                    // Consecutive hops are friendships.
                    let mut prev = source;
                    for &hop in path {
                        let node = graph.node(prev).expect("on path");
                        prop_assert!(node.friends.contains(&hop));
                        prev = hop;
                    }
                }
            }
        }
    }

    #[test]
    fn paths_are_symmetric_in_count(graph in arb_friendships()) {
        for a in graph.ids() {
            let from_a = shortest_paths_from(&graph, a).expect("exists");
            for b in graph.ids() {
                let from_b = shortest_paths_from(&graph, b).expect("exists");
                prop_assert_eq!(from_a.path_count(b), from_b.path_count(a));
            }
        }
    }

    #[test]
    fn scores_are_finite_and_non_negative(graph in arb_friendships()) {
        for (_, score) in betweenness_centrality(&graph).iter() {
            prop_assert!(score >= 0.0 && score.is_finite());
        }
        for (id, score) in closeness_centrality(&graph).iter() {
            prop_assert!(score.is_finite());
            let has_friend = graph.node(id).is_some_and(|n| !n.friends.is_empty());
            prop_assert_eq!(score > 0.0, has_friend);
        }
    }
}

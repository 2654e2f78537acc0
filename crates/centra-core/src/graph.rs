//! Social graph model: users, friendships and endorsements.
//!
//! # Overview
//!
//! A [`SocialGraph`] holds two relations over the same node set:
//!
//! - **Friendships** are undirected. An edge `(i, j)` makes `i` a friend of
//!   `j` and `j` a friend of `i`. They drive betweenness, closeness and
//!   eigenvector centrality.
//! - **Endorsements** are directed. An edge `(i, j)` means "i endorses j".
//!   They drive PageRank and the endorsement ranking only.
//!
//! Nodes are stored in ascending id order and every neighbour set is a
//! `BTreeSet`, so any traversal over the graph visits ids in a canonical
//! order. The graph is validated once at construction and is immutable
//! afterwards; computed scores live in separate maps keyed by [`NodeId`].
//!
//! ## Matrix positions
//!
//! Dense representations (the adjacency matrix, PageRank vectors) index nodes
//! by their *position* in ascending-id order, not by the raw id. Ids do not
//! need to be contiguous. Use [`SocialGraph::position`] to translate.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::error::ErrorCode;
use crate::linalg::{Matrix, make_matrix};

// ---------------------------------------------------------------------------
// Identifiers and records
// ---------------------------------------------------------------------------

/// Unique, non-negative node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A user in the social graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Undirected neighbours.
    pub friends: BTreeSet<NodeId>,
    /// Users this node endorses (outgoing).
    pub endorses: BTreeSet<NodeId>,
    /// Users endorsing this node (incoming).
    pub endorsed_by: BTreeSet<NodeId>,
}

impl Node {
    fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            friends: BTreeSet::new(),
            endorses: BTreeSet::new(),
            endorsed_by: BTreeSet::new(),
        }
    }

    /// Number of friends.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.friends.len()
    }

    /// A node with no outgoing endorsements.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.endorses.is_empty()
    }
}

/// Which relation an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Friendship,
    Endorsement,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Friendship => f.write_str("friendship"),
            Self::Endorsement => f.write_str("endorsement"),
        }
    }
}

/// Graph construction or lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("{kind} edge ({from}, {to}) references unknown node {missing}")]
    UnknownNode {
        kind: EdgeKind,
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("{kind} edge ({node}, {node}) is a self-loop")]
    SelfLoop { kind: EdgeKind, node: NodeId },

    #[error("node {0} is not in the graph")]
    NodeNotFound(NodeId),
}

impl GraphError {
    /// Stable error code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateNode(_) => ErrorCode::DuplicateNode,
            Self::UnknownNode { .. } => ErrorCode::UnknownNode,
            Self::SelfLoop { .. } => ErrorCode::SelfLoop,
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// SocialGraph
// ---------------------------------------------------------------------------

/// Immutable social graph with friendship and endorsement relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialGraph {
    /// Nodes in ascending id order.
    nodes: Vec<Node>,
    /// Node id → position in `nodes`.
    index: HashMap<NodeId, usize>,
}

impl SocialGraph {
    /// Build a graph from users and edge lists.
    ///
    /// Duplicate edges (including `(j, i)` repeating an undirected `(i, j)`)
    /// collapse into one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] when two users share an id,
    /// [`GraphError::UnknownNode`] when an edge references an undeclared id,
    /// and [`GraphError::SelfLoop`] for an edge from a node to itself.
    #[instrument(skip_all)]
    pub fn new<I>(
        users: I,
        friendships: &[(NodeId, NodeId)],
        endorsements: &[(NodeId, NodeId)],
    ) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (NodeId, String)>,
    {
        let mut nodes: Vec<Node> = users
            .into_iter()
            .map(|(id, name)| Node::new(id, name))
            .collect();
        nodes.sort_by_key(|node| node.id);

        if let Some(pair) = nodes.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(GraphError::DuplicateNode(pair[0].id));
        }

        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id, pos))
            .collect();

        for &(a, b) in friendships {
            let (ia, ib) = resolve_edge(&index, EdgeKind::Friendship, a, b)?;
            nodes[ia].friends.insert(b);
            nodes[ib].friends.insert(a);
        }

        for &(source, target) in endorsements {
            let (is, it) = resolve_edge(&index, EdgeKind::Endorsement, source, target)?;
            nodes[is].endorses.insert(target);
            nodes[it].endorsed_by.insert(source);
        }

        let graph = Self { nodes, index };
        debug!(
            nodes = graph.node_count(),
            friendships = graph.friendship_count(),
            endorsements = graph.endorsement_count(),
            "social graph built"
        );
        Ok(graph)
    }

    /// Build a graph from a loaded [`Dataset`].
    ///
    /// # Errors
    ///
    /// See [`SocialGraph::new`].
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, GraphError> {
        Self::new(
            dataset.users.iter().map(|u| (u.id, u.name.clone())),
            &dataset.friendships,
            &dataset.endorsements,
        )
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in ascending id order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// Look up a node by id, failing with [`GraphError::NodeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error when `id` is not a node of this graph.
    pub fn try_node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.node(id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Position of `id` in ascending-id order (row/column of dense matrices).
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Number of distinct undirected friendship edges.
    #[must_use]
    pub fn friendship_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum::<usize>() / 2
    }

    /// Number of distinct directed endorsement edges.
    #[must_use]
    pub fn endorsement_count(&self) -> usize {
        self.nodes.iter().map(|node| node.endorses.len()).sum()
    }

    /// Friendship edges as `(low, high)` pairs in ascending order.
    #[must_use]
    pub fn friendship_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.friends
                    .iter()
                    .filter(move |&&friend| node.id < friend)
                    .map(move |&friend| (node.id, friend))
            })
            .collect()
    }

    /// Nodes with no outgoing endorsements, ascending.
    #[must_use]
    pub fn dangling_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_dangling())
            .map(|node| node.id)
            .collect()
    }

    /// Symmetric 0/1 adjacency matrix of the friendship relation.
    ///
    /// Row and column `i` correspond to the node at position `i`.
    #[must_use]
    pub fn adjacency_matrix(&self) -> Matrix {
        let n = self.node_count();
        make_matrix(n, n, |i, j| {
            if self.nodes[i].friends.contains(&self.nodes[j].id) {
                1.0
            } else {
                0.0
            }
        })
    }

    /// Project the friendship relation into a petgraph `UnGraph`.
    ///
    /// `NodeIndex::new(i)` is the node at position `i`.
    #[must_use]
    pub fn friendship_graph(&self) -> UnGraph<NodeId, ()> {
        let mut graph = UnGraph::<NodeId, ()>::with_capacity(self.node_count(), 0);
        for node in &self.nodes {
            graph.add_node(node.id);
        }
        for (a, b) in self.friendship_edges() {
            if let (Some(ia), Some(ib)) = (self.position(a), self.position(b)) {
                graph.add_edge(NodeIndex::new(ia), NodeIndex::new(ib), ());
            }
        }
        graph
    }

    /// Number of connected components of the friendship relation.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.friendship_graph())
    }
}

fn resolve_edge(
    index: &HashMap<NodeId, usize>,
    kind: EdgeKind,
    from: NodeId,
    to: NodeId,
) -> Result<(usize, usize), GraphError> {
    if from == to {
        return Err(GraphError::SelfLoop { kind, node: from });
    }
    let lookup = |missing: NodeId| {
        index.get(&missing).copied().ok_or(GraphError::UnknownNode {
            kind,
            from,
            to,
            missing,
        })
    };
    Ok((lookup(from)?, lookup(to)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId(raw)
    }

    fn users(ids: &[u32]) -> Vec<(NodeId, String)> {
        ids.iter().map(|&i| (id(i), format!("user-{i}"))).collect()
    }

    fn pairs(edges: &[(u32, u32)]) -> Vec<(NodeId, NodeId)> {
        edges.iter().map(|&(a, b)| (id(a), id(b))).collect()
    }

    #[test]
    fn friendships_are_symmetric() {
        let g = SocialGraph::new(users(&[0, 1, 2]), &pairs(&[(0, 1), (1, 2)]), &[])
            .expect("valid graph");
        let one = g.node(id(1)).expect("node 1");
        assert_eq!(one.friends, BTreeSet::from([id(0), id(2)]));
        assert!(g.node(id(0)).expect("node 0").friends.contains(&id(1)));
        assert_eq!(g.friendship_count(), 2);
    }

    #[test]
    fn endorsements_track_both_directions() {
        let g = SocialGraph::new(users(&[0, 1]), &[], &pairs(&[(0, 1)])).expect("valid graph");
        assert!(g.node(id(0)).expect("0").endorses.contains(&id(1)));
        assert!(g.node(id(1)).expect("1").endorsed_by.contains(&id(0)));
        assert!(g.node(id(1)).expect("1").endorses.is_empty());
        assert_eq!(g.dangling_nodes(), vec![id(1)]);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let g = SocialGraph::new(users(&[0, 1]), &pairs(&[(0, 1), (1, 0), (0, 1)]), &[])
            .expect("valid graph");
        assert_eq!(g.friendship_count(), 1);
        assert_eq!(g.friendship_edges(), vec![(id(0), id(1))]);
    }

    #[test]
    fn nodes_are_sorted_by_id() {
        let g = SocialGraph::new(users(&[7, 2, 5]), &[], &[]).expect("valid graph");
        let ids: Vec<u32> = g.ids().map(|n| n.0).collect();
        assert_eq!(ids, vec![2, 5, 7]);
        assert_eq!(g.position(id(5)), Some(1));
        assert_eq!(g.position(id(3)), None);
    }

    #[test]
    fn duplicate_node_rejected() {
        let err = SocialGraph::new(users(&[1, 1]), &[], &[]).expect_err("must fail");
        assert_eq!(err, GraphError::DuplicateNode(id(1)));
        assert_eq!(err.code(), ErrorCode::DuplicateNode);
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let err = SocialGraph::new(users(&[0]), &pairs(&[(0, 9)]), &[]).expect_err("must fail");
        assert!(matches!(
            err,
            GraphError::UnknownNode {
                kind: EdgeKind::Friendship,
                missing,
                ..
            } if missing == id(9)
        ));
    }

    #[test]
    fn self_loop_rejected() {
        let err = SocialGraph::new(users(&[0]), &[], &pairs(&[(0, 0)])).expect_err("must fail");
        assert_eq!(
            err,
            GraphError::SelfLoop {
                kind: EdgeKind::Endorsement,
                node: id(0)
            }
        );
    }

    #[test]
    fn adjacency_matrix_is_symmetric_with_zero_diagonal() {
        let g = SocialGraph::new(users(&[0, 1, 2]), &pairs(&[(0, 1), (1, 2)]), &[])
            .expect("valid graph");
        let a = g.adjacency_matrix();
        assert_eq!(a.shape(), (3, 3));
        for i in 0..3 {
            assert!(a[(i, i)].abs() < f64::EPSILON);
            for j in 0..3 {
                assert!((a[(i, j)] - a[(j, i)]).abs() < f64::EPSILON);
            }
        }
        assert!((a[(0, 1)] - 1.0).abs() < f64::EPSILON);
        assert!(a[(0, 2)].abs() < f64::EPSILON);
    }

    #[test]
    fn components_counted_on_friendships() {
        let g = SocialGraph::new(users(&[0, 1, 2, 3]), &pairs(&[(0, 1)]), &pairs(&[(2, 3)]))
            .expect("valid graph");
        assert_eq!(g.connected_components(), 3);
    }

    #[test]
    fn try_node_reports_missing() {
        let g = SocialGraph::new(users(&[0]), &[], &[]).expect("valid graph");
        assert_eq!(g.try_node(id(4)), Err(GraphError::NodeNotFound(id(4))));
    }
}

//! Per-node score maps.

use std::collections::BTreeMap;

use centra_core::NodeId;
use serde::Serialize;

/// Scores keyed by node id, iterated in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CentralityScores(BTreeMap<NodeId, f64>);

impl CentralityScores {
    #[must_use]
    pub const fn new(scores: BTreeMap<NodeId, f64>) -> Self {
        Self(scores)
    }

    /// Score for `id`, if the node was scored.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<f64> {
        self.0.get(&id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(id, score)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.0.iter().map(|(&id, &score)| (id, score))
    }

    /// Sum of all scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Highest-scoring node; ties resolve to the lowest id.
    #[must_use]
    pub fn top(&self) -> Option<(NodeId, f64)> {
        self.iter()
            .fold(None, |best: Option<(NodeId, f64)>, (id, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((id, score)),
            })
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<NodeId, f64> {
        self.0
    }
}

impl FromIterator<(NodeId, f64)> for CentralityScores {
    fn from_iter<T: IntoIterator<Item = (NodeId, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

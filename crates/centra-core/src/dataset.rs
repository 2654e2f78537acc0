//! Input datasets: users plus friendship and endorsement edge lists.
//!
//! A dataset is plain data. It is validated only when turned into a
//! [`crate::graph::SocialGraph`]. Files are read from TOML or JSON, chosen by
//! extension:
//!
//! ```toml
//! users = [{ id = 0, name = "Hero" }, { id = 1, name = "Dunn" }]
//! friendships = [[0, 1]]
//! endorsements = [[0, 1], [1, 0]]
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::NodeId;

/// A user record as it appears in a dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: NodeId,
    pub name: String,
}

/// Users and edge lists, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    /// Undirected `(a, b)` pairs.
    #[serde(default)]
    pub friendships: Vec<(NodeId, NodeId)>,
    /// Directed `(endorser, endorsee)` pairs.
    #[serde(default)]
    pub endorsements: Vec<(NodeId, NodeId)>,
}

const BUILTIN_USERS: [(u32, &str); 10] = [
    (0, "Hero"),
    (1, "Dunn"),
    (2, "Sue"),
    (3, "Chi"),
    (4, "Thor"),
    (5, "Clive"),
    (6, "Hicks"),
    (7, "Devin"),
    (8, "Kate"),
    (9, "Klein"),
];

const BUILTIN_FRIENDSHIPS: [(u32, u32); 12] = [
    (0, 1),
    (0, 2),
    (1, 2),
    (1, 3),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 6),
    (5, 7),
    (6, 8),
    (7, 8),
    (8, 9),
];

const BUILTIN_ENDORSEMENTS: [(u32, u32); 15] = [
    (0, 1),
    (1, 0),
    (0, 2),
    (2, 0),
    (1, 2),
    (2, 1),
    (1, 3),
    (2, 3),
    (3, 4),
    (5, 4),
    (5, 6),
    (7, 5),
    (6, 8),
    (8, 7),
    (8, 9),
];

fn to_pairs(edges: &[(u32, u32)]) -> Vec<(NodeId, NodeId)> {
    edges.iter().map(|&(a, b)| (NodeId(a), NodeId(b))).collect()
}

impl Dataset {
    /// The ten-user sample network.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            users: BUILTIN_USERS
                .iter()
                .map(|&(id, name)| UserRecord {
                    id: NodeId(id),
                    name: name.to_string(),
                })
                .collect(),
            friendships: to_pairs(&BUILTIN_FRIENDSHIPS),
            endorsements: to_pairs(&BUILTIN_ENDORSEMENTS),
        }
    }

    /// Parse a TOML dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a valid dataset document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML dataset")
    }

    /// Parse a JSON dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a valid dataset document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("invalid JSON dataset")
    }

    /// Load a dataset from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or fails to parse.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let dataset = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => bail!(
                "Unsupported dataset extension {:?} for {} (expected .toml or .json)",
                other.unwrap_or(""),
                path.display()
            ),
        }
        .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(
            users = dataset.users.len(),
            friendships = dataset.friendships.len(),
            endorsements = dataset.endorsements.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

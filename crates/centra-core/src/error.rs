use std::fmt;

/// Machine-readable error codes shared by every centra crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DatasetParseError,
    DuplicateNode,
    UnknownNode,
    SelfLoop,
    NodeNotFound,
    ShapeMismatch,
    NotConverged,
    DegenerateIteration,
    InvalidParameter,
    DegenerateVariance,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DatasetParseError => "E1002",
            Self::DuplicateNode => "E2001",
            Self::UnknownNode => "E2002",
            Self::SelfLoop => "E2003",
            Self::NodeNotFound => "E2004",
            Self::ShapeMismatch => "E3001",
            Self::NotConverged => "E3002",
            Self::DegenerateIteration => "E3003",
            Self::InvalidParameter => "E4001",
            Self::DegenerateVariance => "E4002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DatasetParseError => "Dataset file parse error",
            Self::DuplicateNode => "Duplicate node id",
            Self::UnknownNode => "Edge references an unknown node",
            Self::SelfLoop => "Edge connects a node to itself",
            Self::NodeNotFound => "Node not found",
            Self::ShapeMismatch => "Incompatible matrix shapes",
            Self::NotConverged => "Power iteration did not converge",
            Self::DegenerateIteration => "Power iteration collapsed to a zero vector",
            Self::InvalidParameter => "Invalid distribution parameter",
            Self::DegenerateVariance => "Zero variance in test statistic",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in centra.toml and retry."),
            Self::DatasetParseError => {
                Some("Datasets need `users`, `friendships` and `endorsements` arrays.")
            }
            Self::DuplicateNode => Some("Give every user a unique id."),
            Self::UnknownNode => Some("Declare every user referenced by an edge in `users`."),
            Self::SelfLoop => Some("Remove edges whose endpoints are the same user."),
            Self::NodeNotFound => Some("Run `centra centrality` to list the known node ids."),
            Self::ShapeMismatch => None,
            Self::NotConverged => {
                Some("Raise `eigenvector.max_iter` or loosen `eigenvector.tolerance`.")
            }
            Self::DegenerateIteration => {
                Some("Eigenvector centrality needs at least one friendship edge.")
            }
            Self::InvalidParameter => None,
            Self::DegenerateVariance => {
                Some("Both groups have 0% or 100% success; the z statistic is undefined.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

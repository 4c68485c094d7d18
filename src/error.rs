use thiserror::Error;

/// Errors raised by the partitioning algorithms.
///
/// These are configuration errors: they are reported before any spanning tree
/// is drawn. Running out of attempts while searching for a balanced cut is not
/// an error and is reported as `Ok(None)` by the bipartitioner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecomError {
    /// The graph (or subgraph) has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// The graph is split into more than one connected component.
    #[error("graph is disconnected ({components} components)")]
    Disconnected { components: usize },

    /// Epsilon must be a positive, finite fraction.
    #[error("epsilon must be positive and finite, got {0}")]
    InvalidEpsilon(f64),

    /// Population target must be positive and finite.
    #[error("population target must be positive and finite, got {0}")]
    InvalidTarget(f64),

    /// The population series sums to zero (or less).
    #[error("total population must be positive, got {0}")]
    ZeroPopulation(f64),

    /// `first_check_division` was requested with an empty division list.
    #[error("first_check_division is set but no divisions were provided")]
    MissingDivisions,

    /// `node_repeats` and `attempts_before_giveup` must both be at least 1.
    #[error("retry budget must be at least 1 (node_repeats={node_repeats}, attempts_before_giveup={attempts})")]
    InvalidRetryBudget { node_repeats: usize, attempts: usize },

    /// Split scores are bit-weighted, so at most 63 divisions can be ranked.
    #[error("at most 63 divisions can be ranked, got {0}")]
    TooManyDivisions(usize),

    /// A numeric node series was requested that the graph does not carry.
    #[error("unknown population series '{0}'")]
    UnknownSeries(String),

    /// A label column was requested that the graph does not carry.
    #[error("unknown label column '{0}'")]
    UnknownColumn(String),

    /// Structural problem with the graph input.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Structural problem with a node-to-district assignment.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Invalid chain or plan settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No balanced part could be carved out while building an initial plan.
    #[error("no balanced cut found for part {part} within the attempt budget")]
    Exhausted { part: u32 },
}

/// Convenience type alias for results using [`RecomError`].
pub type Result<T> = std::result::Result<T, RecomError>;

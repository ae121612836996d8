use crate::adapter::NodeId;
use crate::apply::StrategyKind;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The selection is missing, collapsed or whitespace-only
    #[error("nothing is selected")]
    InvalidSelection,
    #[error("{strategy} strategy failed: {reason}")]
    StrategyFailure { strategy: StrategyKind, reason: String },
    #[error("all highlighting strategies failed")]
    AllStrategiesFailed,
    /// A strategy failed after it had already changed the tree. No further
    /// strategy is attempted on top of the partial result.
    #[error("{strategy} strategy failed after partially modifying the document")]
    PartialMutation { strategy: StrategyKind },
    /// A scheduled highlight could not be materialized when its retrofit came due
    #[error("deferred highlight {id} was lost: {reason}")]
    RetrofitFailed { id: String, reason: String },
    #[error("node {node} is not a highlight wrapper")]
    MalformedHighlight { node: NodeId },
    #[error("an operation on highlight {id} is already in flight")]
    DuplicateOperation { id: String },
    #[error("unknown highlight colour {0:?}")]
    UnknownColor(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed frame message: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to encode frame message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

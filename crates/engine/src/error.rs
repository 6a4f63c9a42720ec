use timeline_core::{CoreError, OperationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("a post is already in flight: {0}")]
    Busy(OperationId),

    #[error("malformed flow return: {0}")]
    MalformedFlowReturn(#[from] serde_json::Error),

    #[error("flow return is not an object")]
    FlowReturnNotObject,

    #[error("flow return has no operation id")]
    MissingOperationId,

    #[error("serialization error: {0}")]
    Serialization(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("empty input")]
    EmptyInput,

    #[error("malformed json: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("unrecognized shape: expected an array or an object with a `value` array, got {0}")]
    UnrecognizedShape(&'static str),

    #[error("comment text is empty")]
    EmptyComment,

    #[error("comment too long: {len} characters (max {max})")]
    CommentTooLong { len: usize, max: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

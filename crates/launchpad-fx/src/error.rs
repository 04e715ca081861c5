use thiserror::Error;

/// Everything that can go wrong while mounting or configuring an effect.
///
/// None of these are fatal to the page: callers log them and fall back to
/// "no animation".
#[derive(Debug, Error)]
pub enum FxError {
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("invalid effect config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("mask buffer has {actual} bytes, expected {expected}")]
    MaskSize { expected: usize, actual: usize },

    #[error("word list is empty")]
    EmptyWordList,

    #[error("host rejected request: {0}")]
    Host(String),

    #[error("effect has already been torn down")]
    TornDown,
}

pub type FxResult<T> = Result<T, FxError>;

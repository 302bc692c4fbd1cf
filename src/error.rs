//! Estimation error taxonomy

use thiserror::Error;

/// Terminal classifications of an estimation request. None of these are
/// transient; the estimator never retries.
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("src and dst are equal")]
    SameToken,

    #[error("pair does not match src/dst")]
    PairMismatch,

    #[error("empty reserves")]
    EmptyReserves,

    #[error("storage read failed: {0}")]
    ReadFailure(String),
}

pub type EstimateResult<T> = Result<T, EstimateError>;

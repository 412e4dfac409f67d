//! Errors raised while converting a mask to GDSII.

use thiserror::Error;

use super::convert::error::{trail, ErrorContext};

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// The exporter rejected a value found at `stack`.
    #[error("{message} (in {})", trail(.stack))]
    Export {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// A coordinate does not fit the GDSII integer range.
    #[error("coordinate out of range: {0}")]
    Coordinate(#[from] std::num::TryFromIntError),
    #[error(transparent)]
    Gds(#[from] gds21::GdsError),
}

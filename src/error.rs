use thiserror::Error;

use crate::packet::Operator;

/// Everything that can go wrong while turning a hex transmission into a packet tree.
///
/// Offsets are bit positions in the expanded stream; `position` in
/// [`DecodeError::InvalidHexDigit`] is a character index into the hex text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated stream: needed {requested} bits at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("invalid hex digit {digit:?} at position {position}")]
    InvalidHexDigit { position: usize, digit: char },

    /// A sub-packet crossed the end of a length-delimited region.
    #[error("sub-packets overrun the {declared}-bit region starting at offset {offset}")]
    MalformedLength { offset: usize, declared: usize },

    #[error("{operator:?} packet at offset {offset} has {found} sub-packets")]
    InvalidArity {
        offset: usize,
        operator: Operator,
        found: usize,
    },

    #[error("packet at offset {offset} is nested deeper than {limit} levels")]
    TooDeep { offset: usize, limit: usize },

    #[error("expected exactly one root packet, found {found}")]
    RootCount { found: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

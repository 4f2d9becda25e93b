use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("frequency table has no symbol with a nonzero count")]
    EmptyFrequencyTable,

    #[error("symbol counts add up past the largest representable weight")]
    WeightOverflow,

    #[error("frequency table has a single symbol and single-symbol codes are rejected")]
    SingleSymbol,

    #[error("corrupt codebook{}: {reason}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Codebook {
        line: Option<usize>,
        reason: CodebookError,
    },

    #[error("bit sequence ends in the middle of a code after {consumed_bits} bits")]
    Truncated { consumed_bits: usize },

    #[error("bit {position} does not lead to any symbol")]
    InvalidBit { position: usize },

    #[error("symbol with ordinal {ordinal} has no code")]
    UnknownSymbol { ordinal: u32 },

    #[error("io error")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn codebook(reason: CodebookError) -> Self {
        Error::Codebook { line: None, reason }
    }

    pub(crate) fn codebook_at(line: usize, reason: CodebookError) -> Self {
        Error::Codebook {
            line: Some(line),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodebookError {
    #[error("codebook has no records")]
    Empty,

    #[error("symbol line has no matching path line")]
    MissingPath,

    #[error("symbol ordinal {0:?} is not a decimal integer")]
    BadOrdinal(String),

    #[error("ordinal {0} is outside the alphabet")]
    UnknownOrdinal(u32),

    #[error("path character {0:?} is neither '0' nor '1'")]
    BadPathChar(char),

    #[error("symbol {0} appears more than once")]
    DuplicateSymbol(u32),

    #[error("path of symbol {symbol} collides with path of symbol {other}")]
    PrefixCollision { symbol: u32, other: u32 },

    #[error("an empty path must be the only record")]
    MixedEmptyPath,

    #[error("an internal node is missing a child")]
    IncompleteTree,
}

/// Why a string could not be parsed into a [`RequestId`].
///
/// [`RequestId`]: crate::RequestId
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseError {
    #[error("missing `GHC-` prefix")]
    InvalidPrefix,
    #[error("expected a 4-digit year, found {found:?}")]
    InvalidYear { found: String },
    #[error("expected a 2-digit month, found {found:?}")]
    InvalidMonth { found: String },
    #[error("expected a sequence of at least 3 digits, found {found:?}")]
    InvalidSequence { found: String },
    #[error("month {month} is outside 1..=12")]
    MonthOutOfRange { month: u8 },
}

//! Error types for zoneinfo parsing and time zone resolution.

use core::fmt;

/// Convenience alias for fallible zoneinfo operations.
pub type ZoneinfoResult<T> = Result<T, ZoneinfoError>;

/// The error type for the zoneinfo engine.
///
/// Every binary-format validation step fails with its own variant so that
/// callers (and tests) can discriminate exactly which check rejected a
/// file. Once a [`Zoneinfo`](crate::Zoneinfo) has been constructed, the
/// only remaining failure is an unknown time zone identifier.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneinfoError {
    /// The file does not start with the `"TZif"` magic bytes.
    BadMagic([u8; 4]),
    /// The version octet is neither `\0` nor `'2'`.
    UnsupportedVersion(u8),
    /// The header declares a non-positive number of local time types.
    InvalidLocalTimeTypeCount(i32),
    /// The header declares a negative `isGmt` flag count.
    InvalidIsGmtCount(i32),
    /// The header declares a negative `isStd` flag count.
    InvalidIsStdCount(i32),
    /// The file contains leap second records, which this engine does not
    /// support.
    UnsupportedLeapCount(i32),
    /// The header declares a negative number of transitions.
    InvalidTransitionCount(i32),
    /// The header declares a non-positive abbreviation data size.
    InvalidAbbreviationDataSize(i32),
    /// A section of the file ended before the declared number of bytes
    /// could be read. The payload names the truncated section.
    ShortRead(&'static str),
    /// A local time type record references an abbreviation index at or
    /// past the end of the abbreviation data.
    AbbreviationIndexOutOfRange { index: u8, size: i32 },
    /// The abbreviation string starting at the given index is not
    /// NUL-terminated within the abbreviation data.
    UnterminatedAbbreviation(u8),
    /// A local time type record carries a UTC offset outside
    /// `[-86399, 86399]` seconds.
    UtcOffsetOutOfRange(i32),
    /// A transition references a local time type index at or past the
    /// declared number of local time types.
    LocalTimeTypeIndexOutOfRange { index: u8, count: i32 },
    /// Transition times are not strictly ascending.
    NonAscendingTransitions { previous: i64, current: i64 },
    /// The requested time zone identifier is not present in the cache.
    UnsupportedId(String),
    /// A civil date-time was constructed from out-of-range fields.
    InvalidDatetime,
}

impl fmt::Display for ZoneinfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic(bytes) => {
                write!(f, "bad magic bytes {bytes:?}, expected \"TZif\"")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported tzfile version byte {version:#04x}")
            }
            Self::InvalidLocalTimeTypeCount(count) => {
                write!(f, "invalid local time type count {count}")
            }
            Self::InvalidIsGmtCount(count) => write!(f, "invalid isGmt flag count {count}"),
            Self::InvalidIsStdCount(count) => write!(f, "invalid isStd flag count {count}"),
            Self::UnsupportedLeapCount(count) => {
                write!(f, "leap second records are unsupported (count {count})")
            }
            Self::InvalidTransitionCount(count) => {
                write!(f, "invalid transition count {count}")
            }
            Self::InvalidAbbreviationDataSize(size) => {
                write!(f, "invalid abbreviation data size {size}")
            }
            Self::ShortRead(section) => {
                write!(f, "short read while decoding the {section} section")
            }
            Self::AbbreviationIndexOutOfRange { index, size } => {
                write!(
                    f,
                    "abbreviation index {index} out of range for data size {size}"
                )
            }
            Self::UnterminatedAbbreviation(index) => {
                write!(f, "abbreviation at index {index} is not NUL-terminated")
            }
            Self::UtcOffsetOutOfRange(offset) => {
                write!(f, "UTC offset {offset}s outside [-86399, 86399]")
            }
            Self::LocalTimeTypeIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "local time type index {index} out of range for count {count}"
                )
            }
            Self::NonAscendingTransitions { previous, current } => {
                write!(
                    f,
                    "transition time {current} does not ascend from {previous}"
                )
            }
            Self::UnsupportedId(identifier) => {
                write!(f, "unsupported time zone identifier \"{identifier}\"")
            }
            Self::InvalidDatetime => write!(f, "civil date-time fields out of range"),
        }
    }
}

impl std::error::Error for ZoneinfoError {}

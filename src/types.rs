//! Core zoneinfo value types.

use crate::error::{ZoneinfoError, ZoneinfoResult};

/// One UTC-offset / DST-flag / abbreviation triple.
///
/// A descriptor describes local time throughout the interval between two
/// transitions. A handful of descriptors is typically shared by a long
/// transition table (every "EST" interval of `America/New_York`
/// references the same descriptor), so [`Zoneinfo`](crate::Zoneinfo)
/// stores descriptors once and transitions reference them by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTimeDescriptor {
    utc_offset_seconds: i32,
    is_dst: bool,
    description: String,
}

impl LocalTimeDescriptor {
    /// The smallest representable UTC offset, one second short of a day.
    pub const MIN_UTC_OFFSET_SECONDS: i32 = -86_399;
    /// The largest representable UTC offset, one second short of a day.
    pub const MAX_UTC_OFFSET_SECONDS: i32 = 86_399;

    /// Create a descriptor, validating the offset range.
    pub fn new(
        utc_offset_seconds: i32,
        is_dst: bool,
        description: impl Into<String>,
    ) -> ZoneinfoResult<Self> {
        if !(Self::MIN_UTC_OFFSET_SECONDS..=Self::MAX_UTC_OFFSET_SECONDS)
            .contains(&utc_offset_seconds)
        {
            return Err(ZoneinfoError::UtcOffsetOutOfRange(utc_offset_seconds));
        }
        Ok(Self {
            utc_offset_seconds,
            is_dst,
            description: description.into(),
        })
    }

    pub fn utc_offset_seconds(&self) -> i32 {
        self.utc_offset_seconds
    }

    pub fn is_dst(&self) -> bool {
        self.is_dst
    }

    /// The time zone abbreviation, e.g. `"EST"`.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Classification of a wall-clock value against a time zone.
///
/// Near a daylight-saving transition some local clock readings occur
/// twice (fall-back) and some never occur (spring-forward); everywhere
/// else a reading maps to exactly one UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimeValidity {
    /// The local time maps to exactly one UTC instant.
    ValidUnique,
    /// The local time occurred under both the pre- and post-transition
    /// offset of a fall-back transition.
    ValidAmbiguous,
    /// The local time was skipped by a spring-forward transition.
    Invalid,
}

/// Caller preference for disambiguating local times.
///
/// The policy only matters when a local time is ambiguous or invalid;
/// unique local times resolve identically under every policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DstPolicy {
    /// Prefer the daylight-saving interpretation.
    Dst,
    /// Prefer the standard-time interpretation.
    Standard,
    /// Ambiguous times take the later (post-transition) offset; invalid
    /// times are treated as if the pre-transition offset still applied.
    #[default]
    Unspecified,
}

/// The maximal half-open UTC interval throughout which one descriptor
/// applies.
///
/// `utc_end_time` is [`i64::MAX`] when the period extends past the last
/// recorded transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTimePeriod {
    descriptor: LocalTimeDescriptor,
    utc_start_time: i64,
    utc_end_time: i64,
}

impl LocalTimePeriod {
    pub(crate) fn new(
        descriptor: LocalTimeDescriptor,
        utc_start_time: i64,
        utc_end_time: i64,
    ) -> Self {
        debug_assert!(utc_start_time < utc_end_time);
        Self {
            descriptor,
            utc_start_time,
            utc_end_time,
        }
    }

    pub fn descriptor(&self) -> &LocalTimeDescriptor {
        &self.descriptor
    }

    pub fn utc_start_time(&self) -> i64 {
        self.utc_start_time
    }

    pub fn utc_end_time(&self) -> i64 {
        self.utc_end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_offset_range() {
        assert!(LocalTimeDescriptor::new(-86_400, false, "X").is_err());
        assert!(LocalTimeDescriptor::new(86_400, false, "X").is_err());
        assert_eq!(
            LocalTimeDescriptor::new(90_000, true, "X"),
            Err(ZoneinfoError::UtcOffsetOutOfRange(90_000))
        );

        let est = LocalTimeDescriptor::new(-18_000, false, "EST").unwrap();
        assert_eq!(est.utc_offset_seconds(), -18_000);
        assert!(!est.is_dst());
        assert_eq!(est.description(), "EST");

        assert!(LocalTimeDescriptor::new(-86_399, false, "").is_ok());
        assert!(LocalTimeDescriptor::new(86_399, true, "").is_ok());
    }
}

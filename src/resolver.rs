//! Orchestration of the user-facing time zone operations.
//!
//! Each operation is a pure function of `(identifier, time, policy,
//! cache)`: look the zone up, run the transition search, and convert.
//! All failures are returned as [`ZoneinfoError`] values; the helpers in
//! [`ZoneinfoUtil`] are total once a well-formed zone is in hand.

use crate::cache::ZoneinfoCache;
use crate::datetime::{Datetime, OffsetDatetime};
use crate::error::{ZoneinfoError, ZoneinfoResult};
use crate::types::{DstPolicy, LocalTimePeriod, LocalTimeValidity};
use crate::util::ZoneinfoUtil;
use crate::zoneinfo::Zoneinfo;

/// The user-facing time zone operations.
///
/// Every operation requires the cache to publish well-formed zones: a
/// sentinel transition at [`i64::MIN`] and a strictly ascending table.
/// Zones produced by [`ZoneinfoBinaryReader`](crate::ZoneinfoBinaryReader)
/// always are; publishing a hand-built zone without its sentinel is a
/// programmer error and may panic, like an out-of-range index into
/// [`Zoneinfo::descriptor_of`].
#[derive(Debug)]
pub struct TimeZoneResolver;

impl TimeZoneResolver {
    /// Convert a UTC instant to the local time in the named zone.
    pub fn convert_utc_to_local_time(
        cache: &impl ZoneinfoCache,
        identifier: &str,
        utc_seconds: i64,
    ) -> ZoneinfoResult<OffsetDatetime> {
        let zone = lookup(cache, identifier)?;
        let (local, _) = ZoneinfoUtil::convert_utc_to_local_time(utc_seconds, zone);
        Ok(local)
    }

    /// Resolve a naive local time against the named zone under the given
    /// DST policy.
    ///
    /// The returned local value is canonical: for an ambiguous or
    /// invalid input it reflects the UTC instant the policy selected and
    /// may therefore differ from the input wall-clock value (an invalid
    /// 02:30 resolves to, say, 03:30 on the other side of the gap). The
    /// validity classification of the *input* is returned alongside.
    pub fn resolve_local_time(
        cache: &impl ZoneinfoCache,
        local_time: Datetime,
        identifier: &str,
        policy: DstPolicy,
    ) -> ZoneinfoResult<(OffsetDatetime, LocalTimeValidity)> {
        let zone = lookup(cache, identifier)?;
        Ok(resolve_in_zone(local_time, zone, policy))
    }

    /// The maximal half-open UTC interval, containing the given UTC
    /// instant, throughout which a single descriptor applies.
    pub fn load_local_time_period_for_utc(
        cache: &impl ZoneinfoCache,
        identifier: &str,
        utc_seconds: i64,
    ) -> ZoneinfoResult<LocalTimePeriod> {
        let zone = lookup(cache, identifier)?;
        let index = zone.find_transition_for_utc_time(utc_seconds);
        Ok(period_of(zone, index))
    }

    /// The local-time period in effect at a naive local time, resolved
    /// under the given DST policy.
    pub fn load_local_time_period(
        cache: &impl ZoneinfoCache,
        local_time: Datetime,
        identifier: &str,
        policy: DstPolicy,
    ) -> ZoneinfoResult<LocalTimePeriod> {
        let zone = lookup(cache, identifier)?;
        let (resolved, _) = resolve_in_zone(local_time, zone, policy);
        let index = zone.find_transition_for_utc_time(resolved.as_utc_seconds());
        Ok(period_of(zone, index))
    }
}

fn lookup<'c>(cache: &'c impl ZoneinfoCache, identifier: &str) -> ZoneinfoResult<&'c Zoneinfo> {
    cache
        .get_zoneinfo(identifier)
        .ok_or_else(|| ZoneinfoError::UnsupportedId(identifier.to_owned()))
}

fn resolve_in_zone(
    local_time: Datetime,
    zone: &Zoneinfo,
    policy: DstPolicy,
) -> (OffsetDatetime, LocalTimeValidity) {
    let relevant = ZoneinfoUtil::load_relevant_transitions(local_time, zone);

    let offset = match policy {
        DstPolicy::Dst | DstPolicy::Standard => ZoneinfoUtil::select_utc_offset(
            relevant.first(),
            relevant.second(),
            zone,
            matches!(policy, DstPolicy::Dst),
        ),
        DstPolicy::Unspecified => {
            let index = match relevant.validity() {
                // Unique: first == second, the choice is moot.
                // Ambiguous: prefer the later, post-transition offset.
                LocalTimeValidity::ValidUnique | LocalTimeValidity::ValidAmbiguous => {
                    relevant.second()
                }
                // Gap: treat the input as if the old offset still
                // applied.
                LocalTimeValidity::Invalid => relevant.first(),
            };
            zone.descriptor_of(index).utc_offset_seconds()
        }
    };

    // The candidate instant under the selected offset decides which
    // bounding transition actually describes it; that transition's
    // offset produces the canonical local value.
    let utc_seconds = local_time.as_epoch_seconds().saturating_sub(i64::from(offset));
    let second_time = zone.transitions()[relevant.second()].utc_time();
    let index = if utc_seconds >= second_time {
        relevant.second()
    } else {
        relevant.first()
    };
    let final_offset = zone.descriptor_of(index).utc_offset_seconds();
    let local = Datetime::from_epoch_seconds(utc_seconds.saturating_add(i64::from(final_offset)));
    (
        OffsetDatetime::new(local, final_offset),
        relevant.validity(),
    )
}

fn period_of(zone: &Zoneinfo, index: usize) -> LocalTimePeriod {
    let transitions = zone.transitions();
    let utc_start_time = transitions[index].utc_time();
    let utc_end_time = transitions
        .get(index + 1)
        .map_or(i64::MAX, |next| next.utc_time());
    LocalTimePeriod::new(zone.descriptor_of(index).clone(), utc_start_time, utc_end_time)
}

//! Stateless algorithms over a [`Zoneinfo`]: locating the transitions
//! relevant to a candidate local time and classifying its validity.

use crate::datetime::{Datetime, OffsetDatetime};
use crate::types::LocalTimeValidity;
use crate::zoneinfo::Zoneinfo;

/// The transition(s) that could plausibly describe a candidate local
/// time, as indices into the zone's transition table.
///
/// For a unique local time `first == second`; for an ambiguous one they
/// are the earlier and later matching transitions; for an invalid (gap)
/// local time they bound the gap and serve as policy-driven fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevantTransitions {
    first: usize,
    second: usize,
    validity: LocalTimeValidity,
}

impl RelevantTransitions {
    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn validity(&self) -> LocalTimeValidity {
        self.validity
    }
}

/// Stateless transition-search and classification algorithms.
#[derive(Debug)]
pub struct ZoneinfoUtil;

impl ZoneinfoUtil {
    /// Whether the zone satisfies the invariants the algorithms below
    /// depend on: a sentinel first transition at [`i64::MIN`], strictly
    /// ascending transition times, and in-range descriptor indices.
    ///
    /// Used as a `debug_assert!` precondition, not a recoverable check.
    pub fn is_well_formed(zone: &Zoneinfo) -> bool {
        zone.is_well_formed()
    }

    /// Convert a UTC instant to the local time in `zone`, returning the
    /// local value and the index of the owning transition.
    ///
    /// Total over the whole `i64` instant domain: within an offset's
    /// reach of [`i64::MIN`]/[`i64::MAX`] the local value saturates
    /// instead of wrapping.
    pub fn convert_utc_to_local_time(utc_seconds: i64, zone: &Zoneinfo) -> (OffsetDatetime, usize) {
        debug_assert!(Self::is_well_formed(zone));
        let index = zone.find_transition_for_utc_time(utc_seconds);
        let offset = zone.descriptor_of(index).utc_offset_seconds();
        let local = Datetime::from_epoch_seconds(utc_seconds.saturating_add(i64::from(offset)));
        (OffsetDatetime::new(local, offset), index)
    }

    /// Determine which transition(s) could describe `local_time` and
    /// classify the local time as unique, ambiguous, or invalid.
    ///
    /// The local time is first treated as if it were UTC to locate an
    /// anchor transition; because every UTC offset is under a day, the
    /// transitions describing the local time must lie in the anchor's
    /// immediate neighborhood. Each neighbor whose half-open interval
    /// contains the local time (under that neighbor's own offset) is a
    /// match: one match is a unique local time, two matches a fall-back
    /// ambiguity, zero a spring-forward gap.
    ///
    /// Total over well-formed zones: the sentinel guarantees an anchor
    /// for every input.
    pub fn load_relevant_transitions(local_time: Datetime, zone: &Zoneinfo) -> RelevantTransitions {
        debug_assert!(Self::is_well_formed(zone));

        let local_seconds = local_time.as_epoch_seconds();
        let transitions = zone.transitions();
        let anchor = zone.find_transition_for_utc_time(local_seconds);
        let window_start = anchor.saturating_sub(1);
        let window_end = (anchor + 1).min(transitions.len() - 1);

        let describes = |index: usize| {
            let candidate_utc =
                local_seconds - i64::from(zone.descriptor_of(index).utc_offset_seconds());
            candidate_utc >= transitions[index].utc_time()
                && transitions
                    .get(index + 1)
                    .is_none_or(|next| candidate_utc < next.utc_time())
        };

        let mut matches = [0usize; 2];
        let mut match_count = 0;
        for index in window_start..=window_end {
            if describes(index) {
                if match_count < 2 {
                    matches[match_count] = index;
                }
                match_count += 1;
            }
        }

        match match_count {
            1 => RelevantTransitions {
                first: matches[0],
                second: matches[0],
                validity: LocalTimeValidity::ValidUnique,
            },
            // Two (or, for pathological sub-day transition spacing, more)
            // descriptors claim the local time: fall-back ambiguity
            // between the earliest pair.
            2.. => RelevantTransitions {
                first: matches[0],
                second: matches[1],
                validity: LocalTimeValidity::ValidAmbiguous,
            },
            // No descriptor claims the local time: it was skipped by a
            // spring-forward transition. Identify the bounding pair.
            _ => {
                for index in window_start..window_end {
                    let boundary = transitions[index + 1].utc_time();
                    let under_old =
                        local_seconds - i64::from(zone.descriptor_of(index).utc_offset_seconds());
                    let under_new = local_seconds
                        - i64::from(zone.descriptor_of(index + 1).utc_offset_seconds());
                    if under_old >= boundary && under_new < boundary {
                        return RelevantTransitions {
                            first: index,
                            second: index + 1,
                            validity: LocalTimeValidity::Invalid,
                        };
                    }
                }
                // Unreachable for transition tables spaced further apart
                // than a day; kept deterministic rather than asserted.
                RelevantTransitions {
                    first: window_start,
                    second: anchor,
                    validity: LocalTimeValidity::Invalid,
                }
            }
        }
    }

    /// Tie-break the offset choice between `first` and `second` when the
    /// caller has asked for a DST-on (`select_dst == true`) or DST-off
    /// interpretation.
    ///
    /// When neither bounding descriptor matches the requested DST-ness
    /// (possible in the gap case), the nearest other matching transition
    /// anywhere in the zone is searched in a fixed historical order:
    /// the transition after `second`, up to two transitions before
    /// `first`, then a backward scan of the whole table. Genuinely
    /// unresolvable requests log a warning and fall back to `second`'s
    /// offset; this never fails.
    pub fn select_utc_offset(
        first: usize,
        second: usize,
        zone: &Zoneinfo,
        select_dst: bool,
    ) -> i32 {
        debug_assert!(Self::is_well_formed(zone));
        debug_assert!(first <= second && second < zone.transitions().len());

        let offset_of = |index: usize| zone.descriptor_of(index).utc_offset_seconds();
        let matches = |index: usize| zone.descriptor_of(index).is_dst() == select_dst;

        if first != second && matches(first) && matches(second) {
            log::warn!(
                "local time in zone \"{}\" is ambiguous even under the requested DST \
                 preference; selecting the later transition",
                zone.identifier()
            );
            return offset_of(second);
        }
        if matches(first) {
            return offset_of(first);
        }
        if matches(second) {
            return offset_of(second);
        }

        // Gap case with neither bounding descriptor matching. Probe the
        // transition just after the gap, then up to two just before it.
        if second + 1 < zone.transitions().len() && matches(second + 1) {
            return offset_of(second + 1);
        }
        for step_back in 1..=2 {
            if let Some(index) = first.checked_sub(step_back) {
                if matches(index) {
                    return offset_of(index);
                }
            }
        }
        // Last resort: scan the whole table backwards for any transition
        // with the requested DST-ness.
        if let Some(index) = (0..zone.transitions().len()).rev().find(|&index| matches(index)) {
            return offset_of(index);
        }

        log::warn!(
            "zone \"{}\" has no transition matching the requested DST preference; \
             falling back to the later bounding transition",
            zone.identifier()
        );
        offset_of(second)
    }
}

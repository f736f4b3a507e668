//! The in-memory time zone value and its transition table.

use crate::types::LocalTimeDescriptor;

/// A UTC instant at which a zone's effective descriptor changes.
///
/// The descriptor is held by index into the owning
/// [`Zoneinfo`]'s descriptor table; many transitions typically share one
/// descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    utc_time: i64,
    descriptor_index: usize,
}

impl Transition {
    /// The instant, in epoch seconds, at which this transition takes
    /// effect.
    pub fn utc_time(&self) -> i64 {
        self.utc_time
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }
}

/// A parsed time zone: an identifier plus an ordered transition table.
///
/// The table is strictly ascending by UTC time, and a well-formed zone
/// starts with a sentinel transition at [`i64::MIN`] so that every
/// representable instant has an owning transition. A `Zoneinfo` is
/// immutable once built and may be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zoneinfo {
    identifier: String,
    descriptors: Vec<LocalTimeDescriptor>,
    transitions: Vec<Transition>,
}

impl Zoneinfo {
    /// Create an empty zone for the given identifier.
    ///
    /// The result is not well-formed until a first transition at
    /// [`i64::MIN`] has been added; [`ZoneinfoBinaryReader`] seeds that
    /// sentinel automatically.
    ///
    /// [`ZoneinfoBinaryReader`]: crate::ZoneinfoBinaryReader
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            descriptors: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn descriptors(&self) -> &[LocalTimeDescriptor] {
        &self.descriptors
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The descriptor in effect from the given transition onward.
    ///
    /// # Panics
    ///
    /// Panics if `transition_index` is out of range; indices returned by
    /// the query methods of this type are always in range.
    pub fn descriptor_of(&self, transition_index: usize) -> &LocalTimeDescriptor {
        let transition = &self.transitions[transition_index];
        &self.descriptors[transition.descriptor_index]
    }

    /// Append a descriptor, returning its index.
    pub fn add_descriptor(&mut self, descriptor: LocalTimeDescriptor) -> usize {
        self.descriptors.push(descriptor);
        self.descriptors.len() - 1
    }

    /// Append a transition.
    ///
    /// The caller must keep the table strictly ascending and reference an
    /// existing descriptor; the binary reader validates both before
    /// calling, so violations here are programmer errors.
    pub fn add_transition(&mut self, utc_time: i64, descriptor_index: usize) {
        debug_assert!(descriptor_index < self.descriptors.len());
        debug_assert!(self
            .transitions
            .last()
            .is_none_or(|last| last.utc_time < utc_time));
        self.transitions.push(Transition {
            utc_time,
            descriptor_index,
        });
    }

    /// The index of the transition in effect at `utc_time`, i.e. the
    /// latest transition whose instant is at or before `utc_time`.
    ///
    /// Binary search over the ascending table; the sentinel guarantees a
    /// result for every representable instant.
    pub fn find_transition_for_utc_time(&self, utc_time: i64) -> usize {
        debug_assert!(!self.transitions.is_empty());
        self.transitions
            .partition_point(|transition| transition.utc_time <= utc_time)
            .saturating_sub(1)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        let Some(first) = self.transitions.first() else {
            return false;
        };
        first.utc_time == i64::MIN
            && self
                .transitions
                .windows(2)
                .all(|pair| pair[0].utc_time < pair[1].utc_time)
            && self
                .transitions
                .iter()
                .all(|transition| transition.descriptor_index < self.descriptors.len())
    }
}

//! The identifier-to-zone lookup seam consumed by the resolver.

use std::io::Read;

use hashbrown::HashMap;

use crate::error::ZoneinfoResult;
use crate::reader::ZoneinfoBinaryReader;
use crate::zoneinfo::Zoneinfo;

/// Keyed lookup of parsed time zones.
///
/// The resolver treats the cache as an external collaborator: once a
/// [`Zoneinfo`] is published through this interface it must remain
/// immutable and live at least as long as any resolver call using it.
/// Published zones must be well-formed (a sentinel transition at
/// [`i64::MIN`], strictly ascending table); zones from
/// [`ZoneinfoBinaryReader`] always are, while a hand-built zone lacking
/// its sentinel may make resolver queries panic. Implementations own
/// any locking around the mapping; the engine itself takes none.
pub trait ZoneinfoCache {
    /// Look up a zone by identifier, e.g. `"America/New_York"`.
    fn get_zoneinfo(&self, identifier: &str) -> Option<&Zoneinfo>;
}

/// A ready-made in-memory [`ZoneinfoCache`].
#[derive(Debug, Default)]
pub struct ZoneinfoMap {
    zones: HashMap<String, Zoneinfo>,
}

impl ZoneinfoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parsed zone under its identifier, returning any zone it
    /// replaced.
    pub fn insert(&mut self, zone: Zoneinfo) -> Option<Zoneinfo> {
        self.zones.insert(zone.identifier().to_owned(), zone)
    }

    /// Parse a binary tzfile from `reader` and insert it under
    /// `identifier`.
    pub fn load<R: Read>(&mut self, identifier: &str, reader: &mut R) -> ZoneinfoResult<()> {
        let (zone, _) = ZoneinfoBinaryReader::read(identifier, reader)?;
        self.insert(zone);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl ZoneinfoCache for ZoneinfoMap {
    fn get_zoneinfo(&self, identifier: &str) -> Option<&Zoneinfo> {
        self.zones.get(identifier)
    }
}

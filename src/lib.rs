//! Binary zoneinfo ("tzfile") parsing and DST-aware local time
//! resolution.
//!
//! This crate decodes the classic version-1 tzfile format into an
//! immutable, ordered transition model ([`Zoneinfo`]) and resolves local
//! or UTC times against it. The hard part of the domain is that local
//! civil time is not a function of UTC: near a daylight-saving
//! transition some wall-clock readings occur twice (fall-back,
//! *ambiguous*) and some never occur (spring-forward, *invalid*). Every
//! query here produces a deterministic, documented answer for both
//! cases, steered by an optional caller [`DstPolicy`].
//!
//! ```
//! use zoneinfo_tz::{
//!     Datetime, DstPolicy, LocalTimeDescriptor, LocalTimeValidity, TimeZoneResolver, Zoneinfo,
//!     ZoneinfoMap,
//! };
//!
//! // America/New_York around the 2017 DST transitions.
//! let mut zone = Zoneinfo::new("America/New_York");
//! zone.add_descriptor(LocalTimeDescriptor::new(-18_000, false, "EST").unwrap());
//! zone.add_descriptor(LocalTimeDescriptor::new(-14_400, true, "EDT").unwrap());
//! zone.add_transition(i64::MIN, 0);
//! zone.add_transition(1_489_302_000, 1);
//! zone.add_transition(1_509_861_600, 0);
//!
//! let mut cache = ZoneinfoMap::new();
//! cache.insert(zone);
//!
//! // 01:30 on the fall-back morning happened twice.
//! let ambiguous = Datetime::new(2017, 11, 5, 1, 30, 0).unwrap();
//! let (resolved, validity) = TimeZoneResolver::resolve_local_time(
//!     &cache,
//!     ambiguous,
//!     "America/New_York",
//!     DstPolicy::Unspecified,
//! )
//! .unwrap();
//! assert_eq!(validity, LocalTimeValidity::ValidAmbiguous);
//! assert_eq!(resolved.offset_seconds(), -18_000); // the later, EST reading
//! ```
//!
//! Zones are typically not built by hand as above but parsed from the
//! binary database with [`ZoneinfoBinaryReader`] and published through a
//! [`ZoneinfoCache`]. Leap-second files and the 64-bit version-2 payload
//! are out of scope; version-2 files are accepted but only their 32-bit
//! block is read.

pub mod cache;
pub mod datetime;
pub mod error;
pub mod reader;
pub mod resolver;
pub mod types;
pub mod util;
pub mod zoneinfo;

pub use cache::{ZoneinfoCache, ZoneinfoMap};
pub use datetime::{Datetime, IsoDate, IsoTime, OffsetDatetime};
pub use error::{ZoneinfoError, ZoneinfoResult};
pub use reader::{ZoneinfoBinaryHeader, ZoneinfoBinaryReader};
pub use resolver::TimeZoneResolver;
pub use types::{DstPolicy, LocalTimeDescriptor, LocalTimePeriod, LocalTimeValidity};
pub use util::{RelevantTransitions, ZoneinfoUtil};
pub use zoneinfo::{Transition, Zoneinfo};

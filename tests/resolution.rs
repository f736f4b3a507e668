//! End-to-end resolution tests: parse a binary zone image, publish it
//! through a cache, and exercise the four public resolver operations.

use zoneinfo_tz::{
    Datetime, DstPolicy, LocalTimeDescriptor, LocalTimeValidity, TimeZoneResolver, Zoneinfo,
    ZoneinfoBinaryReader, ZoneinfoCache, ZoneinfoError, ZoneinfoMap,
};

const SPRING_FORWARD: i64 = 1_489_302_000; // 2017-03-12T07:00:00Z
const FALL_BACK: i64 = 1_509_861_600; // 2017-11-05T06:00:00Z
const EST: i32 = -18_000;
const EDT: i32 = -14_400;

/// A version-1 tzfile image equivalent to `America/New_York` restricted
/// to the 2017 transitions.
fn new_york_image() -> Vec<u8> {
    let mut image = Vec::new();
    image.extend_from_slice(b"TZif");
    image.push(0);
    image.extend_from_slice(&[0u8; 15]);
    for count in [2i32, 2, 0, 2, 2, 8] {
        image.extend_from_slice(&count.to_be_bytes());
    }
    image.extend_from_slice(&(SPRING_FORWARD as i32).to_be_bytes());
    image.extend_from_slice(&(FALL_BACK as i32).to_be_bytes());
    image.extend_from_slice(&[1, 0]); // to EDT, back to EST
    image.extend_from_slice(&EST.to_be_bytes());
    image.extend_from_slice(&[0, 0]); // standard time, abbreviation "EST"
    image.extend_from_slice(&EDT.to_be_bytes());
    image.extend_from_slice(&[1, 4]); // daylight time, abbreviation "EDT"
    image.extend_from_slice(b"EST\0EDT\0");
    image.extend_from_slice(&[0u8; 4]); // isGmt and isStd flags
    image
}

fn new_york_cache() -> ZoneinfoMap {
    let mut cache = ZoneinfoMap::new();
    cache
        .load("America/New_York", &mut new_york_image().as_slice())
        .unwrap();
    cache
}

fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Datetime {
    Datetime::new(year, month, day, hour, minute, second).unwrap()
}

#[test]
fn parsed_zone_matches_direct_construction() {
    let (parsed, _) =
        ZoneinfoBinaryReader::read_bytes("America/New_York", &new_york_image()).unwrap();

    let mut built = Zoneinfo::new("America/New_York");
    built.add_descriptor(LocalTimeDescriptor::new(EST, false, "EST").unwrap());
    built.add_descriptor(LocalTimeDescriptor::new(EDT, true, "EDT").unwrap());
    built.add_transition(i64::MIN, 0);
    built.add_transition(SPRING_FORWARD, 1);
    built.add_transition(FALL_BACK, 0);

    assert_eq!(parsed, built);

    let cache = new_york_cache();
    assert_eq!(cache.get_zoneinfo("America/New_York"), Some(&built));
}

#[test]
fn utc_to_local_conversion() {
    let cache = new_york_cache();

    let winter = TimeZoneResolver::convert_utc_to_local_time(
        &cache,
        "America/New_York",
        local(2017, 1, 15, 17, 0, 0).as_epoch_seconds(),
    )
    .unwrap();
    assert_eq!(winter.datetime(), local(2017, 1, 15, 12, 0, 0));
    assert_eq!(winter.offset_seconds(), EST);
    assert_eq!(winter.offset_minutes(), -300);

    let summer = TimeZoneResolver::convert_utc_to_local_time(
        &cache,
        "America/New_York",
        local(2017, 7, 4, 16, 0, 0).as_epoch_seconds(),
    )
    .unwrap();
    assert_eq!(summer.datetime(), local(2017, 7, 4, 12, 0, 0));
    assert_eq!(summer.offset_seconds(), EDT);
}

#[test]
fn extreme_instants_resolve_without_wrapping() {
    let cache = new_york_cache();

    let earliest =
        TimeZoneResolver::convert_utc_to_local_time(&cache, "America/New_York", i64::MIN).unwrap();
    assert_eq!(earliest.offset_seconds(), EST);
    assert_eq!(earliest.datetime().date.year, i32::MIN);

    let latest =
        TimeZoneResolver::convert_utc_to_local_time(&cache, "America/New_York", i64::MAX).unwrap();
    assert_eq!(latest.offset_seconds(), EST);

    let period =
        TimeZoneResolver::load_local_time_period_for_utc(&cache, "America/New_York", i64::MAX)
            .unwrap();
    assert_eq!(period.utc_end_time(), i64::MAX);
    assert_eq!(period.descriptor().description(), "EST");
}

#[test]
fn unique_times_round_trip() {
    let cache = new_york_cache();

    // A dense sample spanning both transitions; skip local times inside
    // the fold or the gap, which by construction cannot round-trip to a
    // unique instant.
    for utc_seconds in (SPRING_FORWARD - 90_000..SPRING_FORWARD + 90_000)
        .chain(FALL_BACK - 90_000..FALL_BACK + 90_000)
        .step_by(977)
    {
        let local_time =
            TimeZoneResolver::convert_utc_to_local_time(&cache, "America/New_York", utc_seconds)
                .unwrap();
        let (resolved, validity) = TimeZoneResolver::resolve_local_time(
            &cache,
            local_time.datetime(),
            "America/New_York",
            DstPolicy::Unspecified,
        )
        .unwrap();
        if validity == LocalTimeValidity::ValidUnique {
            assert_eq!(resolved.as_utc_seconds(), utc_seconds);
            assert_eq!(resolved.datetime(), local_time.datetime());
            assert_eq!(resolved.offset_seconds(), local_time.offset_seconds());
        } else {
            // Only the repeated fall-back hour is not unique, and it
            // still round-trips to one of its two instants.
            assert_eq!(validity, LocalTimeValidity::ValidAmbiguous);
            assert!((FALL_BACK - 3_600..FALL_BACK + 3_600).contains(&utc_seconds));
            assert_eq!(resolved.datetime(), local_time.datetime());
        }
    }
}

#[test]
fn fall_back_ambiguity_policies() {
    let cache = new_york_cache();
    let repeated = local(2017, 11, 5, 1, 30, 0);

    // Unspecified prefers the later, post-transition (EST) reading.
    let (resolved, validity) = TimeZoneResolver::resolve_local_time(
        &cache,
        repeated,
        "America/New_York",
        DstPolicy::Unspecified,
    )
    .unwrap();
    assert_eq!(validity, LocalTimeValidity::ValidAmbiguous);
    assert_eq!(resolved.datetime(), repeated);
    assert_eq!(resolved.offset_seconds(), EST);
    assert_eq!(resolved.as_utc_seconds(), FALL_BACK + 1_800);

    // An explicit policy picks its side of the fold.
    let (resolved, validity) =
        TimeZoneResolver::resolve_local_time(&cache, repeated, "America/New_York", DstPolicy::Dst)
            .unwrap();
    assert_eq!(validity, LocalTimeValidity::ValidAmbiguous);
    assert_eq!(resolved.datetime(), repeated);
    assert_eq!(resolved.offset_seconds(), EDT);
    assert_eq!(resolved.as_utc_seconds(), FALL_BACK - 1_800);

    let (resolved, _) = TimeZoneResolver::resolve_local_time(
        &cache,
        repeated,
        "America/New_York",
        DstPolicy::Standard,
    )
    .unwrap();
    assert_eq!(resolved.offset_seconds(), EST);
    assert_eq!(resolved.as_utc_seconds(), FALL_BACK + 1_800);
}

#[test]
fn spring_forward_gap_policies() {
    let cache = new_york_cache();
    let skipped = local(2017, 3, 12, 2, 30, 0);

    // Unspecified treats the input as if the pre-transition (EST)
    // offset still applied: 02:30 EST is 07:30Z, i.e. 03:30 EDT.
    let (resolved, validity) = TimeZoneResolver::resolve_local_time(
        &cache,
        skipped,
        "America/New_York",
        DstPolicy::Unspecified,
    )
    .unwrap();
    assert_eq!(validity, LocalTimeValidity::Invalid);
    assert_eq!(resolved.datetime(), local(2017, 3, 12, 3, 30, 0));
    assert_eq!(resolved.offset_seconds(), EDT);
    assert_eq!(resolved.as_utc_seconds(), SPRING_FORWARD + 1_800);

    // Standard reads the input as 02:30 EST as well.
    let (resolved, validity) = TimeZoneResolver::resolve_local_time(
        &cache,
        skipped,
        "America/New_York",
        DstPolicy::Standard,
    )
    .unwrap();
    assert_eq!(validity, LocalTimeValidity::Invalid);
    assert_eq!(resolved.datetime(), local(2017, 3, 12, 3, 30, 0));
    assert_eq!(resolved.offset_seconds(), EDT);

    // Dst reads the input as 02:30 EDT, which is 06:30Z, i.e. 01:30 EST.
    let (resolved, validity) =
        TimeZoneResolver::resolve_local_time(&cache, skipped, "America/New_York", DstPolicy::Dst)
            .unwrap();
    assert_eq!(validity, LocalTimeValidity::Invalid);
    assert_eq!(resolved.datetime(), local(2017, 3, 12, 1, 30, 0));
    assert_eq!(resolved.offset_seconds(), EST);
    assert_eq!(resolved.as_utc_seconds(), SPRING_FORWARD - 1_800);
}

#[test]
fn local_time_periods() {
    let cache = new_york_cache();

    // Inside the 2017 daylight period.
    let period = TimeZoneResolver::load_local_time_period_for_utc(
        &cache,
        "America/New_York",
        SPRING_FORWARD + 1,
    )
    .unwrap();
    assert_eq!(period.utc_start_time(), SPRING_FORWARD);
    assert_eq!(period.utc_end_time(), FALL_BACK);
    assert_eq!(period.descriptor().description(), "EDT");
    assert!(period.descriptor().is_dst());

    // Past the last transition the period end clamps to the maximum
    // representable instant.
    let period =
        TimeZoneResolver::load_local_time_period_for_utc(&cache, "America/New_York", FALL_BACK)
            .unwrap();
    assert_eq!(period.utc_start_time(), FALL_BACK);
    assert_eq!(period.utc_end_time(), i64::MAX);
    assert_eq!(period.descriptor().description(), "EST");

    // Before the first recorded transition the sentinel period applies.
    let period =
        TimeZoneResolver::load_local_time_period_for_utc(&cache, "America/New_York", 0).unwrap();
    assert_eq!(period.utc_start_time(), i64::MIN);
    assert_eq!(period.utc_end_time(), SPRING_FORWARD);
    assert_eq!(period.descriptor().description(), "EST");

    // Period lookup by local time honors the DST policy for the
    // repeated hour.
    let repeated = local(2017, 11, 5, 1, 30, 0);
    let period = TimeZoneResolver::load_local_time_period(
        &cache,
        repeated,
        "America/New_York",
        DstPolicy::Dst,
    )
    .unwrap();
    assert_eq!(period.descriptor().description(), "EDT");
    let period = TimeZoneResolver::load_local_time_period(
        &cache,
        repeated,
        "America/New_York",
        DstPolicy::Unspecified,
    )
    .unwrap();
    assert_eq!(period.descriptor().description(), "EST");
    assert_eq!(period.utc_start_time(), FALL_BACK);
}

#[test]
fn unknown_identifier_fails_every_operation() {
    let cache = new_york_cache();
    let expected = ZoneinfoError::UnsupportedId("Nonexistent/Zone".to_owned());

    assert_eq!(
        TimeZoneResolver::convert_utc_to_local_time(&cache, "Nonexistent/Zone", 0).unwrap_err(),
        expected
    );
    assert_eq!(
        TimeZoneResolver::resolve_local_time(
            &cache,
            local(2017, 1, 1, 0, 0, 0),
            "Nonexistent/Zone",
            DstPolicy::Unspecified,
        )
        .unwrap_err(),
        expected
    );
    assert_eq!(
        TimeZoneResolver::load_local_time_period_for_utc(&cache, "Nonexistent/Zone", 0)
            .unwrap_err(),
        expected
    );
    assert_eq!(
        TimeZoneResolver::load_local_time_period(
            &cache,
            local(2017, 1, 1, 0, 0, 0),
            "Nonexistent/Zone",
            DstPolicy::Unspecified,
        )
        .unwrap_err(),
        expected
    );
}

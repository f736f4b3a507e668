//! Binary "tzfile" decoding.
//!
//! Only the classic version-1 payload (32-bit transition times) is
//! decoded. Files carrying the `'2'` version tag are accepted, but their
//! 64-bit block and footer are simply never read; the stream is consumed
//! exactly through the version-1 sections.

use std::io::Read;

use crate::error::{ZoneinfoError, ZoneinfoResult};
use crate::types::LocalTimeDescriptor;
use crate::zoneinfo::Zoneinfo;

const MAGIC: [u8; 4] = *b"TZif";
const HEADER_SIZE: usize = 44;
const LOCAL_TIME_TYPE_RECORD_SIZE: usize = 6;

/// Validated metadata describing the sections that follow the fixed
/// 44-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneinfoBinaryHeader {
    version: u8,
    num_is_gmt: i32,
    num_is_std: i32,
    num_leaps: i32,
    num_transitions: i32,
    num_local_time_types: i32,
    abbrev_data_size: i32,
}

impl ZoneinfoBinaryHeader {
    /// Decode and validate a raw 44-byte header.
    fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> ZoneinfoResult<Self> {
        if bytes[0..4] != MAGIC {
            let mut magic = [0u8; 4];
            magic.copy_from_slice(&bytes[0..4]);
            return Err(ZoneinfoError::BadMagic(magic));
        }
        let version = bytes[4];
        if version != 0 && version != b'2' {
            return Err(ZoneinfoError::UnsupportedVersion(version));
        }
        // Bytes 5..20 are reserved and ignored.
        let num_is_gmt = be_i32(&bytes[20..24]);
        let num_is_std = be_i32(&bytes[24..28]);
        let num_leaps = be_i32(&bytes[28..32]);
        let num_transitions = be_i32(&bytes[32..36]);
        let num_local_time_types = be_i32(&bytes[36..40]);
        let abbrev_data_size = be_i32(&bytes[40..44]);

        if num_local_time_types <= 0 {
            return Err(ZoneinfoError::InvalidLocalTimeTypeCount(
                num_local_time_types,
            ));
        }
        if num_is_gmt < 0 {
            return Err(ZoneinfoError::InvalidIsGmtCount(num_is_gmt));
        }
        if num_is_std < 0 {
            return Err(ZoneinfoError::InvalidIsStdCount(num_is_std));
        }
        if num_leaps != 0 {
            return Err(ZoneinfoError::UnsupportedLeapCount(num_leaps));
        }
        if num_transitions < 0 {
            return Err(ZoneinfoError::InvalidTransitionCount(num_transitions));
        }
        if abbrev_data_size <= 0 {
            return Err(ZoneinfoError::InvalidAbbreviationDataSize(abbrev_data_size));
        }
        // Hand-written files in the wild sometimes carry flag counts that
        // disagree with the local time type count; tolerated with a
        // diagnostic rather than rejected.
        if (num_is_gmt != 0 && num_is_gmt != num_local_time_types)
            || (num_is_std != 0 && num_is_std != num_local_time_types)
        {
            log::warn!(
                "isGmt/isStd counts ({num_is_gmt}/{num_is_std}) do not match \
                 local time type count {num_local_time_types}"
            );
        }

        Ok(Self {
            version,
            num_is_gmt,
            num_is_std,
            num_leaps,
            num_transitions,
            num_local_time_types,
            abbrev_data_size,
        })
    }

    /// The version tag: `0` for v1 files, `b'2'` for v2 files.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn num_is_gmt(&self) -> i32 {
        self.num_is_gmt
    }

    pub fn num_is_std(&self) -> i32 {
        self.num_is_std
    }

    /// Always zero for supported files.
    pub fn num_leaps(&self) -> i32 {
        self.num_leaps
    }

    pub fn num_transitions(&self) -> i32 {
        self.num_transitions
    }

    pub fn num_local_time_types(&self) -> i32 {
        self.num_local_time_types
    }

    pub fn abbrev_data_size(&self) -> i32 {
        self.abbrev_data_size
    }
}

/// Decoder from a raw byte stream to a [`Zoneinfo`].
#[derive(Debug)]
pub struct ZoneinfoBinaryReader;

impl ZoneinfoBinaryReader {
    /// Decode a version-1 tzfile from `reader`, producing a zone tagged
    /// with `identifier`.
    ///
    /// Validation failures each map to a distinct
    /// [`ZoneinfoError`] variant and no partial zone is returned. On
    /// success the stream has been consumed exactly through the parsed
    /// sections; callers wanting trailing-data detection can inspect the
    /// reader afterwards.
    pub fn read<R: Read>(
        identifier: &str,
        reader: &mut R,
    ) -> ZoneinfoResult<(Zoneinfo, ZoneinfoBinaryHeader)> {
        let mut raw_header = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut raw_header)
            .map_err(|_| ZoneinfoError::ShortRead("header"))?;
        let header = ZoneinfoBinaryHeader::from_bytes(&raw_header)?;

        let num_transitions = header.num_transitions as usize;
        let num_local_time_types = header.num_local_time_types as usize;
        let abbrev_data_size = header.abbrev_data_size as usize;

        let raw_transition_times = read_section(reader, num_transitions * 4, "transition times")?;
        let type_indices = read_section(reader, num_transitions, "local time type indices")?;
        let raw_local_time_types = read_section(
            reader,
            num_local_time_types * LOCAL_TIME_TYPE_RECORD_SIZE,
            "local time types",
        )?;
        let abbrev_data = read_section(reader, abbrev_data_size, "abbreviation data")?;
        // The leap section is zero-length for supported files. The flag
        // arrays are decoded only for stream-position accounting; their
        // contents matter to the v2 footer, not to transition lookup.
        let _ = read_section(reader, header.num_is_gmt as usize, "isGmt flags")?;
        let _ = read_section(reader, header.num_is_std as usize, "isStd flags")?;

        let mut zone = Zoneinfo::new(identifier);
        for record in raw_local_time_types.chunks_exact(LOCAL_TIME_TYPE_RECORD_SIZE) {
            zone.add_descriptor(decode_local_time_type(record, &header, &abbrev_data)?);
        }

        // Sentinel first: every representable instant resolves, even
        // before the first recorded transition.
        zone.add_transition(i64::MIN, 0);
        let mut previous_time: Option<i64> = None;
        for (raw_time, &type_index) in raw_transition_times.chunks_exact(4).zip(&type_indices) {
            let utc_time = i64::from(be_i32(raw_time));
            if usize::from(type_index) >= num_local_time_types {
                return Err(ZoneinfoError::LocalTimeTypeIndexOutOfRange {
                    index: type_index,
                    count: header.num_local_time_types,
                });
            }
            if let Some(previous) = previous_time {
                if previous >= utc_time {
                    return Err(ZoneinfoError::NonAscendingTransitions {
                        previous,
                        current: utc_time,
                    });
                }
            }
            previous_time = Some(utc_time);
            zone.add_transition(utc_time, usize::from(type_index));
        }

        debug_assert!(zone.is_well_formed());
        Ok((zone, header))
    }

    /// Decode a version-1 tzfile held in memory.
    pub fn read_bytes(
        identifier: &str,
        mut bytes: &[u8],
    ) -> ZoneinfoResult<(Zoneinfo, ZoneinfoBinaryHeader)> {
        Self::read(identifier, &mut bytes)
    }
}

fn decode_local_time_type(
    record: &[u8],
    header: &ZoneinfoBinaryHeader,
    abbrev_data: &[u8],
) -> ZoneinfoResult<LocalTimeDescriptor> {
    let utc_offset = be_i32(&record[0..4]);
    let is_dst = record[4] != 0;
    let abbrev_index = record[5];
    if usize::from(abbrev_index) >= abbrev_data.len() {
        return Err(ZoneinfoError::AbbreviationIndexOutOfRange {
            index: abbrev_index,
            size: header.abbrev_data_size,
        });
    }
    if !(LocalTimeDescriptor::MIN_UTC_OFFSET_SECONDS..=LocalTimeDescriptor::MAX_UTC_OFFSET_SECONDS)
        .contains(&utc_offset)
    {
        return Err(ZoneinfoError::UtcOffsetOutOfRange(utc_offset));
    }
    let remainder = &abbrev_data[usize::from(abbrev_index)..];
    let terminator = remainder
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(ZoneinfoError::UnterminatedAbbreviation(abbrev_index))?;
    let description = String::from_utf8_lossy(&remainder[..terminator]).into_owned();
    LocalTimeDescriptor::new(utc_offset, is_dst, description)
}

// A hostile header can declare multi-gigabyte sections; reading in
// bounded chunks keeps a truncated-but-huge file failing cheaply
// instead of allocating the declared size up front.
const SECTION_CHUNK_SIZE: usize = 64 * 1024;

fn read_section<R: Read>(
    reader: &mut R,
    len: usize,
    section: &'static str,
) -> ZoneinfoResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(len.min(SECTION_CHUNK_SIZE));
    let mut remaining = len;
    while remaining > 0 {
        let chunk = remaining.min(SECTION_CHUNK_SIZE);
        let start = buffer.len();
        buffer.resize(start + chunk, 0);
        reader
            .read_exact(&mut buffer[start..])
            .map_err(|_| ZoneinfoError::ShortRead(section))?;
        remaining -= chunk;
    }
    Ok(buffer)
}

fn be_i32(bytes: &[u8]) -> i32 {
    i32::from_be_bytes(bytes[0..4].try_into().expect("caller passes 4 bytes"))
}

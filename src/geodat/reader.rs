//! geoip.dat reader with memory-mapping support.

use flate2::read::GzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::format::*;
use crate::{Error, Result};

/// A decoded geoip.dat database.
///
/// Entries keep the order they have in the file; CIDR records keep the
/// order they have within their entry.
#[derive(Debug, Clone, Default)]
pub struct GeoDatabase {
    entries: Vec<CategoryEntry>,
}

impl GeoDatabase {
    /// Open and decode a geoip.dat file.
    ///
    /// Gzip-compressed files are decompressed transparently.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let db = Self::from_bytes(&mmap)?;
        log::debug!(
            "Loaded {:?}: {} categories, {} bytes",
            path,
            db.len(),
            mmap.len()
        );
        Ok(db)
    }

    /// Decode a database from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.starts_with(&GZIP_MAGIC) {
            let mut decoder = GzDecoder::new(data);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            return Self::decode(&decompressed);
        }
        Self::decode(data)
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(data);
        let mut entries = Vec::new();

        while !reader.is_empty() {
            let (field, wire_type) = reader.read_key()?;
            if field == FIELD_LIST_ENTRY && wire_type == WireType::LengthDelimited {
                let (body, base) = reader.read_bytes()?;
                entries.push(decode_entry(body, base)?);
            } else {
                reader.skip(wire_type)?;
            }
        }

        Ok(Self { entries })
    }

    /// Create a database from already decoded entries.
    pub fn from_entries(entries: Vec<CategoryEntry>) -> Self {
        Self { entries }
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Category tags in file order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.country_code.as_str())
    }

    /// Find the first entry whose tag matches case-insensitively.
    pub fn find(&self, category: &str) -> Option<&CategoryEntry> {
        self.entries
            .iter()
            .find(|e| e.country_code.eq_ignore_ascii_case(category))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode_entry(data: &[u8], base: usize) -> Result<CategoryEntry> {
    let mut reader = WireReader::with_base(data, base);
    let mut entry = CategoryEntry::default();

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_key()?;
        match (field, wire_type) {
            (FIELD_GEOIP_COUNTRY_CODE, WireType::LengthDelimited) => {
                let (bytes, offset) = reader.read_bytes()?;
                entry.country_code = std::str::from_utf8(bytes)
                    .map_err(|_| Error::InvalidUtf8 {
                        field: "country_code",
                        offset,
                    })?
                    .to_string();
            }
            (FIELD_GEOIP_CIDR, WireType::LengthDelimited) => {
                let (body, offset) = reader.read_bytes()?;
                entry.cidrs.push(decode_cidr(body, offset)?);
            }
            (FIELD_GEOIP_REVERSE_MATCH, WireType::Varint) => {
                entry.reverse_match = reader.read_varint()? != 0;
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(entry)
}

fn decode_cidr(data: &[u8], base: usize) -> Result<CidrRecord> {
    let mut reader = WireReader::with_base(data, base);
    let mut record = CidrRecord::default();

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_key()?;
        match (field, wire_type) {
            (FIELD_CIDR_IP, WireType::LengthDelimited) => {
                record.ip = reader.read_bytes()?.0.to_vec();
            }
            (FIELD_CIDR_PREFIX, WireType::Varint) => {
                // uint32 semantics: upper bits are discarded
                record.prefix = reader.read_varint()? as u32;
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(record)
}

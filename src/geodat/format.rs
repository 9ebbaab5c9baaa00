//! geoip.dat wire format constants and structures.

use crate::{Error, Result};

/// Gzip magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Longest valid varint encoding (u64).
pub const MAX_VARINT_LEN: usize = 10;

/// `GeoIPList.entry`
pub const FIELD_LIST_ENTRY: u32 = 1;
/// `GeoIP.country_code`
pub const FIELD_GEOIP_COUNTRY_CODE: u32 = 1;
/// `GeoIP.cidr`
pub const FIELD_GEOIP_CIDR: u32 = 2;
/// `GeoIP.reverse_match`
pub const FIELD_GEOIP_REVERSE_MATCH: u32 = 3;
/// `CIDR.ip`
pub const FIELD_CIDR_IP: u32 = 1;
/// `CIDR.prefix`
pub const FIELD_CIDR_PREFIX: u32 = 2;

/// Protobuf wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireType {
    /// Decode the low three bits of a field key.
    pub fn from_bits(bits: u8, offset: usize) -> Result<Self> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(Error::UnsupportedWireType {
                wire_type: other,
                offset,
            }),
        }
    }

    /// Get the numeric wire type.
    pub fn bits(self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::Fixed32 => 5,
        }
    }
}

/// A single CIDR record: raw address bytes plus prefix length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CidrRecord {
    /// 4 bytes for IPv4, 16 bytes for IPv6. Other lengths appear in the wild
    /// and are skipped on extraction.
    pub ip: Vec<u8>,
    pub prefix: u32,
}

impl CidrRecord {
    pub fn new(ip: impl Into<Vec<u8>>, prefix: u32) -> Self {
        Self {
            ip: ip.into(),
            prefix,
        }
    }
}

/// A category (country code or tag) and its CIDR records, in database order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryEntry {
    pub country_code: String,
    pub cidrs: Vec<CidrRecord>,
    pub reverse_match: bool,
}

impl CategoryEntry {
    pub fn new(country_code: impl Into<String>, cidrs: Vec<CidrRecord>) -> Self {
        Self {
            country_code: country_code.into(),
            cidrs,
            reverse_match: false,
        }
    }

    /// Case-insensitive tag comparison. An empty wanted tag matches everything.
    pub fn matches(&self, category: &str) -> bool {
        category.is_empty() || self.country_code.eq_ignore_ascii_case(category)
    }
}

/// Cursor over a protobuf message body.
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` in the whole file, for error reporting.
    base: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.offset();
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = *self
                .data
                .get(self.pos)
                .ok_or(Error::Truncated { offset: self.offset() })?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::InvalidVarint { offset: start })
    }

    /// Read a field key, returning `(field number, wire type)`.
    pub fn read_key(&mut self) -> Result<(u32, WireType)> {
        let offset = self.offset();
        let key = self.read_varint()?;
        let wire_type = WireType::from_bits((key & 0x07) as u8, offset)?;
        Ok(((key >> 3) as u32, wire_type))
    }

    /// Read a length-delimited payload, returning it with its absolute offset.
    pub fn read_bytes(&mut self) -> Result<(&'a [u8], usize)> {
        let data = self.data;
        let len = self.read_varint()? as usize;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or(Error::Truncated {
                offset: self.base + data.len(),
            })?;
        self.pos = end;
        Ok((&data[start..end], self.base + start))
    }

    /// Skip over a field value of the given wire type.
    pub fn skip(&mut self, wire_type: WireType) -> Result<()> {
        let fixed = match wire_type {
            WireType::Varint => {
                self.read_varint()?;
                return Ok(());
            }
            WireType::LengthDelimited => {
                self.read_bytes()?;
                return Ok(());
            }
            WireType::Fixed64 => 8,
            WireType::Fixed32 => 4,
        };
        if self.pos + fixed > self.data.len() {
            return Err(Error::Truncated {
                offset: self.base + self.data.len(),
            });
        }
        self.pos += fixed;
        Ok(())
    }
}

/// Append a varint to `out`.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Append a field key to `out`.
pub fn encode_key(field: u32, wire_type: WireType, out: &mut Vec<u8>) {
    encode_varint((u64::from(field) << 3) | u64::from(wire_type.bits()), out);
}

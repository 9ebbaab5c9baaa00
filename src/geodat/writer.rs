//! geoip.dat encoder.

use super::format::*;

/// Encodes category entries into the geoip.dat wire format.
pub struct GeoDatWriter;

impl GeoDatWriter {
    /// Encode a full `GeoIPList`.
    pub fn encode(entries: &[CategoryEntry]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut body = Vec::new();
        for entry in entries {
            body.clear();
            encode_entry(entry, &mut body);
            encode_key(FIELD_LIST_ENTRY, WireType::LengthDelimited, &mut out);
            encode_varint(body.len() as u64, &mut out);
            out.extend_from_slice(&body);
        }
        out
    }
}

fn encode_entry(entry: &CategoryEntry, out: &mut Vec<u8>) {
    encode_key(FIELD_GEOIP_COUNTRY_CODE, WireType::LengthDelimited, out);
    encode_varint(entry.country_code.len() as u64, out);
    out.extend_from_slice(entry.country_code.as_bytes());

    let mut body = Vec::new();
    for cidr in &entry.cidrs {
        body.clear();
        encode_key(FIELD_CIDR_IP, WireType::LengthDelimited, &mut body);
        encode_varint(cidr.ip.len() as u64, &mut body);
        body.extend_from_slice(&cidr.ip);
        // proto3 omits zero scalars
        if cidr.prefix != 0 {
            encode_key(FIELD_CIDR_PREFIX, WireType::Varint, &mut body);
            encode_varint(u64::from(cidr.prefix), &mut body);
        }

        encode_key(FIELD_GEOIP_CIDR, WireType::LengthDelimited, out);
        encode_varint(body.len() as u64, out);
        out.extend_from_slice(&body);
    }

    if entry.reverse_match {
        encode_key(FIELD_GEOIP_REVERSE_MATCH, WireType::Varint, out);
        encode_varint(1, out);
    }
}

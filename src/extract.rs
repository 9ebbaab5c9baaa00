//! Category extraction: geoip.dat records to newline-delimited CIDR text.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::io::Write;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::geodat::{CidrRecord, GeoDatabase};
use crate::Result;

/// Extract every CIDR of the matching categories as `address/prefix` lines.
///
/// `category` is compared case-insensitively; an empty category selects
/// every entry. Lines keep database order. The final newline is stripped, so
/// an empty selection yields an empty buffer.
///
/// # Examples
/// ```
/// use geoip2cidr::geodat::{CategoryEntry, CidrRecord, GeoDatabase};
///
/// let db = GeoDatabase::from_entries(vec![CategoryEntry::new(
///     "CN",
///     vec![CidrRecord::new([1, 2, 3, 0], 24)],
/// )]);
/// let text = geoip2cidr::extract(&db, "cn").unwrap();
/// assert_eq!(text, b"1.2.3.0/24");
/// ```
pub fn extract(db: &GeoDatabase, category: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut skipped = 0usize;

    for entry in db.entries().iter().filter(|e| e.matches(category)) {
        for record in &entry.cidrs {
            match render_record(record) {
                Some(net) => writeln!(out, "{}", net)?,
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} records with unsupported address length or prefix", skipped);
    }

    if out.last() == Some(&b'\n') {
        out.pop();
    }
    Ok(out)
}

/// Open a database file and extract a category from it.
pub fn extract_file(path: &Path, category: &str) -> Result<Vec<u8>> {
    let db = GeoDatabase::open(path)?;
    extract(&db, category)
}

/// Convert a raw record into a network, keeping host bits as stored.
///
/// 4-byte addresses use a 32-bit mask width and 16-byte addresses a 128-bit
/// one. IPv4-mapped IPv6 addresses with a prefix of at least 96 collapse to
/// their IPv4 form. Any other address length, or a prefix wider than the
/// mask, yields `None`.
pub fn render_record(record: &CidrRecord) -> Option<IpNet> {
    let prefix = u8::try_from(record.prefix).ok()?;

    match record.ip.len() {
        4 => {
            let octets: [u8; 4] = record.ip.as_slice().try_into().ok()?;
            Ipv4Net::new(Ipv4Addr::from(octets), prefix)
                .ok()
                .map(IpNet::V4)
        }
        16 => {
            let octets: [u8; 16] = record.ip.as_slice().try_into().ok()?;
            let addr = Ipv6Addr::from(octets);
            if prefix >= 96 {
                if let Some(v4) = addr.to_ipv4_mapped() {
                    return Ipv4Net::new(v4, prefix - 96).ok().map(IpNet::V4);
                }
            }
            Ipv6Net::new(addr, prefix).ok().map(IpNet::V6)
        }
        _ => None,
    }
}

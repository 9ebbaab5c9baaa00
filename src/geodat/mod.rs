//! v2ray geoip.dat database decoding.
//!
//! The file is a protobuf-encoded `GeoIPList`:
//!
//! ```text
//! message CIDR      { bytes ip = 1; uint32 prefix = 2; }
//! message GeoIP     { string country_code = 1; repeated CIDR cidr = 2; bool reverse_match = 3; }
//! message GeoIPList { repeated GeoIP entry = 1; }
//! ```
//!
//! Only the wire format subset needed for these messages is implemented.
//! Unknown fields are skipped.

mod format;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use format::*;
pub use reader::GeoDatabase;
pub use writer::GeoDatWriter;

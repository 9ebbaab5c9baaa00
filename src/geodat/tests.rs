//! Tests for geoip.dat decoding.

use super::format::*;
use super::reader::GeoDatabase;
use super::writer::GeoDatWriter;
use crate::Error;

fn sample_entries() -> Vec<CategoryEntry> {
    vec![
        CategoryEntry::new(
            "CN",
            vec![
                CidrRecord::new([1, 0, 1, 0], 24),
                CidrRecord::new([36, 0, 0, 0], 10),
            ],
        ),
        CategoryEntry::new(
            "PRIVATE",
            vec![
                CidrRecord::new([10, 0, 0, 0], 8),
                CidrRecord::new(
                    [0xfc, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                    7,
                ),
            ],
        ),
    ]
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_hand_encoded_message() {
    #[rustfmt::skip]
    let data = [
        0x0a, 0x0e,                   // entry, 14 bytes
        0x0a, 0x02, b'C', b'N',       //   country_code "CN"
        0x12, 0x08,                   //   cidr, 8 bytes
        0x0a, 0x04, 1, 2, 3, 0,       //     ip
        0x10, 0x18,                   //     prefix 24
    ];

    let db = GeoDatabase::from_bytes(&data).unwrap();
    assert_eq!(db.len(), 1);
    let entry = &db.entries()[0];
    assert_eq!(entry.country_code, "CN");
    assert_eq!(entry.cidrs, vec![CidrRecord::new([1, 2, 3, 0], 24)]);
    assert!(!entry.reverse_match);
}

#[test]
fn test_encode_decode_preserves_order() {
    let entries = sample_entries();
    let data = GeoDatWriter::encode(&entries);
    let db = GeoDatabase::from_bytes(&data).unwrap();

    assert_eq!(db.entries(), entries.as_slice());
    assert_eq!(db.categories().collect::<Vec<_>>(), vec!["CN", "PRIVATE"]);
}

#[test]
fn test_zero_prefix_is_omitted_and_decoded_as_zero() {
    let entries = vec![CategoryEntry::new("ANY", vec![CidrRecord::new([0, 0, 0, 0], 0)])];
    let data = GeoDatWriter::encode(&entries);
    let db = GeoDatabase::from_bytes(&data).unwrap();
    assert_eq!(db.entries()[0].cidrs[0].prefix, 0);
}

#[test]
fn test_reverse_match_flag() {
    let mut entry = CategoryEntry::new("NOTCN", vec![CidrRecord::new([1, 1, 1, 0], 24)]);
    entry.reverse_match = true;
    let data = GeoDatWriter::encode(&[entry]);
    let db = GeoDatabase::from_bytes(&data).unwrap();
    assert!(db.entries()[0].reverse_match);
}

#[test]
fn test_unknown_fields_are_skipped() {
    let mut data = Vec::new();
    // Unknown top-level varint, fixed32 and fixed64 fields.
    encode_key(7, WireType::Varint, &mut data);
    encode_varint(12345, &mut data);
    encode_key(8, WireType::Fixed32, &mut data);
    data.extend_from_slice(&[0; 4]);
    encode_key(9, WireType::Fixed64, &mut data);
    data.extend_from_slice(&[0; 8]);
    data.extend_from_slice(&GeoDatWriter::encode(&sample_entries()));

    let db = GeoDatabase::from_bytes(&data).unwrap();
    assert_eq!(db.len(), 2);
}

#[test]
fn test_empty_buffer_is_empty_database() {
    let db = GeoDatabase::from_bytes(&[]).unwrap();
    assert!(db.is_empty());
    assert_eq!(db.len(), 0);
}

#[test]
fn test_truncated_entry_fails() {
    let mut data = GeoDatWriter::encode(&sample_entries());
    data.truncate(data.len() - 3);
    let err = GeoDatabase::from_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::Truncated { .. }));
}

#[test]
fn test_invalid_country_code_utf8() {
    #[rustfmt::skip]
    let data = [
        0x0a, 0x04,
        0x0a, 0x02, 0xff, 0xfe,
    ];
    let err = GeoDatabase::from_bytes(&data).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidUtf8 {
            field: "country_code",
            offset: 4
        }
    ));
}

#[test]
fn test_find_is_case_insensitive() {
    let db = GeoDatabase::from_entries(sample_entries());
    assert_eq!(db.find("private").unwrap().cidrs.len(), 2);
    assert_eq!(db.find("cn").unwrap().country_code, "CN");
    assert!(db.find("us").is_none());
}

// ============================================================================
// File loading
// ============================================================================

#[test]
fn test_open_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&GeoDatWriter::encode(&sample_entries()))
        .unwrap();
    file.flush().unwrap();

    let db = GeoDatabase::open(file.path()).unwrap();
    assert_eq!(db.entries(), sample_entries().as_slice());
}

#[test]
fn test_open_gzip_file() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&GeoDatWriter::encode(&sample_entries()))
        .unwrap();
    let compressed = encoder.finish().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&compressed).unwrap();
    file.flush().unwrap();

    let db = GeoDatabase::open(file.path()).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db.entries()[1].country_code, "PRIVATE");
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = GeoDatabase::open(&dir.path().join("missing.dat")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

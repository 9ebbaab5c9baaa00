//! Error types for geoip2cidr.

use thiserror::Error;

/// Error type for geoip2cidr operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database ended in the middle of a field
    #[error("truncated database: unexpected end of data at offset {offset}")]
    Truncated { offset: usize },

    /// Varint longer than 10 bytes
    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: usize },

    /// Wire type the decoder cannot skip (groups, reserved values)
    #[error("unsupported wire type {wire_type} at offset {offset}")]
    UnsupportedWireType { wire_type: u8, offset: usize },

    /// Country code that is not valid UTF-8
    #[error("invalid UTF-8 in {field} at offset {offset}")]
    InvalidUtf8 { field: &'static str, offset: usize },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// ipset creation failed
    #[error("create ipset [{set}] failed: {reason}")]
    IpSetCreate { set: String, reason: String },

    /// Adding a prefix to an ipset failed
    #[error("add ipset [{set}] {prefix} failed: {reason}")]
    IpSetAdd {
        set: String,
        prefix: String,
        reason: String,
    },
}

/// Result type alias for geoip2cidr operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipset_add_message_names_set_and_prefix() {
        let err = Error::IpSetAdd {
            set: "cn4".to_string(),
            prefix: "1.2.3.0/24".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "add ipset [cn4] 1.2.3.0/24 failed: exit status 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

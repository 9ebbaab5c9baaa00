//! geoip2cidr - Convert v2ray geoip.dat databases into CIDR lists.
//!
//! This crate reads a `geoip.dat` database (a protobuf list of
//! category-tagged CIDR ranges), extracts the ranges of one category as
//! CIDR text, splits them into IPv4 and IPv6 prefixes and hands them to a
//! sink: standard output, files, or kernel ipsets.
//!
//! # Features
//!
//! - **geoip.dat decoding**: memory-mapped, gzip-aware, no schema compiler
//! - **Category extraction**: case-insensitive tag filter, empty tag selects all
//! - **Concurrent classification**: bounded worker pool, deterministic
//!   completion, input order preserved within each family
//! - **Sinks**: print, save to one or two files, load into ipsets
//!
//! # Quick Start
//!
//! ```ignore
//! use geoip2cidr::{extract_file, Classifier};
//! use std::path::Path;
//!
//! let text = extract_file(Path::new("geoip.dat"), "cn")?;
//! let classified = Classifier::new().classify(&text);
//! for net in &classified.v4 {
//!     println!("{}", net);
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. [`GeoDatabase`] decodes the file (fatal on bad format)
//! 2. [`extract`] renders matching records as `address/prefix` lines
//! 3. [`Classifier`] parses the lines and splits them by family; malformed
//!    lines are dropped, never reported as errors
//! 4. a sink consumes the result ([`pipeline::run`] dispatches on [`Mode`])

mod error;

pub mod classify;
pub mod config;
pub mod extract;
pub mod geodat;
pub mod pipeline;
pub mod sink;

// Re-export core types
pub use error::{Error, Result};

pub use classify::{classify, Classified, Classifier};
pub use config::{Config, Mode};
pub use extract::{extract, extract_file};
pub use geodat::GeoDatabase;
pub use pipeline::run;

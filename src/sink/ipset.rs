//! Load prefixes into kernel ipsets.

use ipnet::IpNet;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use crate::classify::Classified;
use crate::{Config, Error, Result};

/// Address family of an ipset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Family name as understood by `ipset create ... family <name>`.
    pub fn name(&self) -> &'static str {
        match self {
            Family::V4 => "inet",
            Family::V6 => "inet6",
        }
    }
}

/// Access to the kernel ipset facility.
pub trait IpSetBackend {
    /// Check that the facility is usable before any work is done.
    fn probe(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Create a `hash:net` set, succeeding if it already exists.
    fn create(&mut self, name: &str, family: Family) -> io::Result<()>;

    /// Add a prefix to a set.
    fn add(&mut self, name: &str, prefix: &IpNet) -> io::Result<()>;
}

/// Backend driving the `ipset(8)` utility.
#[derive(Debug, Clone)]
pub struct IpsetCommand {
    program: PathBuf,
}

impl IpsetCommand {
    /// Use `ipset` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ipset")
    }

    /// Use a specific ipset binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn exec(&self, args: &[&str]) -> io::Result<()> {
        let output = Command::new(&self.program).args(args).output()?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => output.status.to_string(),
            msg => msg.to_string(),
        };
        Err(io::Error::new(io::ErrorKind::Other, message))
    }
}

impl Default for IpsetCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl IpSetBackend for IpsetCommand {
    fn probe(&mut self) -> io::Result<()> {
        self.exec(&["version"])
    }

    fn create(&mut self, name: &str, family: Family) -> io::Result<()> {
        self.exec(&["create", name, "hash:net", "family", family.name(), "-exist"])
    }

    fn add(&mut self, name: &str, prefix: &IpNet) -> io::Result<()> {
        self.exec(&["add", name, &prefix.to_string(), "-exist"])
    }
}

/// Load classified prefixes into the configured sets.
///
/// The IPv4 set is filled first, then the IPv6 set. The first failure aborts
/// the load and names the set, and the prefix for failed adds.
pub fn load_ipsets<B: IpSetBackend + ?Sized>(
    backend: &mut B,
    classified: &Classified,
    config: &Config,
) -> Result<()> {
    if let Some(name) = config.ipset_v4.as_deref().filter(|_| !config.skip_v4) {
        fill(backend, name, Family::V4, classified.v4.iter().map(|n| IpNet::V4(*n)))?;
        log::info!("Loaded {} IPv4 prefixes into ipset {}", classified.v4.len(), name);
    }

    if let Some(name) = config.ipset_v6.as_deref().filter(|_| !config.skip_v6) {
        fill(backend, name, Family::V6, classified.v6.iter().map(|n| IpNet::V6(*n)))?;
        log::info!("Loaded {} IPv6 prefixes into ipset {}", classified.v6.len(), name);
    }

    Ok(())
}

fn fill<B, I>(backend: &mut B, name: &str, family: Family, prefixes: I) -> Result<()>
where
    B: IpSetBackend + ?Sized,
    I: Iterator<Item = IpNet>,
{
    backend
        .create(name, family)
        .map_err(|e| Error::IpSetCreate {
            set: name.to_string(),
            reason: e.to_string(),
        })?;

    for prefix in prefixes {
        backend.add(name, &prefix).map_err(|e| Error::IpSetAdd {
            set: name.to_string(),
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

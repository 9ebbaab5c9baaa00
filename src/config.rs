//! Pipeline configuration.

use std::path::PathBuf;

use crate::{Error, Result};

/// Default database path.
pub const DEFAULT_DATABASE: &str = "./geoip.dat";

/// What to do with the extracted prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Print to the output stream
    #[default]
    Show,
    /// Write to one or two files
    Save,
    /// Load into kernel ipsets
    IpSet,
}

impl Mode {
    /// Get the name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Show => "show",
            Mode::Save => "save",
            Mode::IpSet => "ipset",
        }
    }

    /// Parse a mode from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "show" => Some(Mode::Show),
            "save" => Some(Mode::Save),
            "ipset" => Some(Mode::IpSet),
            _ => None,
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Mode::parse(s).ok_or_else(|| {
            Error::Config(format!(
                "unknown mode `{}`: only `show`, `save` and `ipset` are supported",
                s
            ))
        })
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable configuration for a single pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the geoip.dat file
    pub database: PathBuf,
    /// Category tag; empty selects every category
    pub category: String,
    pub mode: Mode,
    /// Suppress IPv4 output
    pub skip_v4: bool,
    /// Suppress IPv6 output
    pub skip_v6: bool,
    /// ipset name for IPv4 prefixes
    pub ipset_v4: Option<String>,
    /// ipset name for IPv6 prefixes
    pub ipset_v6: Option<String>,
    /// Output file for IPv4 prefixes
    pub save_v4: Option<PathBuf>,
    /// Output file for IPv6 prefixes
    pub save_v6: Option<PathBuf>,
    /// Classifier worker count; defaults to available parallelism
    pub workers: Option<usize>,
}

impl Config {
    /// Create a config reading `database` with default settings.
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether any family is suppressed, i.e. output needs classification.
    pub fn splits_families(&self) -> bool {
        self.skip_v4 || self.skip_v6
    }

    /// Check mode-specific requirements.
    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(Error::Config("database path is empty".to_string()));
        }

        match self.mode {
            Mode::Show => Ok(()),
            Mode::Save => {
                if self.save_v4.is_none() && self.save_v6.is_none() {
                    return Err(Error::Config("save file name invalid".to_string()));
                }
                Ok(())
            }
            Mode::IpSet => {
                if !cfg!(target_os = "linux") {
                    return Err(Error::Config(
                        "ipset is not supported on this OS".to_string(),
                    ));
                }
                match (&self.ipset_v4, &self.ipset_v6) {
                    (None, None) => Err(Error::Config("ipset name invalid".to_string())),
                    (Some(v4), Some(v6)) if v4 == v6 => Err(Error::Config(format!(
                        "ipset name invalid: IPv4 and IPv6 sets are both `{}`",
                        v4
                    ))),
                    _ => Ok(()),
                }
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            category: String::new(),
            mode: Mode::Show,
            skip_v4: false,
            skip_v6: false,
            ipset_v4: None,
            ipset_v6: None,
            save_v4: None,
            save_v6: None,
            workers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("show"), Some(Mode::Show));
        assert_eq!(Mode::parse("SAVE"), Some(Mode::Save));
        assert_eq!(Mode::parse("IpSet"), Some(Mode::IpSet));
        assert_eq!(Mode::parse("print"), None);
        assert!("print".parse::<Mode>().is_err());
        assert_eq!(Mode::IpSet.to_string(), "ipset");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, PathBuf::from("./geoip.dat"));
        assert!(config.category.is_empty());
        assert_eq!(config.mode, Mode::Show);
        assert!(!config.splits_families());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_requires_a_file() {
        let mut config = Config::default().with_mode(Mode::Save);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.save_v6 = Some(PathBuf::from("v6.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let config = Config::new("");
        assert!(config.validate().is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_ipset_names() {
        let mut config = Config::default().with_mode(Mode::IpSet);
        assert!(config.validate().is_err());

        config.ipset_v4 = Some("geo".to_string());
        assert!(config.validate().is_ok());

        config.ipset_v6 = Some("geo".to_string());
        assert!(config.validate().is_err());

        config.ipset_v6 = Some("geo6".to_string());
        assert!(config.validate().is_ok());
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn test_ipset_unsupported_platform() {
        let mut config = Config::default().with_mode(Mode::IpSet);
        config.ipset_v4 = Some("geo".to_string());
        assert!(config.validate().is_err());
    }
}
